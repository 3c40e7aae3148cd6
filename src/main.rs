mod account;
mod cli;
mod error;
mod git;
mod profile;
mod ssh_config;
mod ssh_key;
mod store;
mod validation;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use crate::{
    account::AccountController,
    cli::{Cli, Commands},
    error::AppError,
};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let controller = AccountController::open_default()?;
    match command {
        Commands::Add {
            username,
            email,
            alias,
            ssh_key,
        } => controller.add(username, email, alias, ssh_key),
        Commands::List => controller.list(),
        Commands::Remove { alias } => controller.remove(&alias),
        Commands::RemoveAll => controller.remove_all(),
        Commands::Switch { alias } => controller.switch(&alias),
        Commands::SetDefault { alias } => controller.set_default(&alias),
        Commands::Current => controller.current(),
    }
}
