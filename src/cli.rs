use clap::{Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "git-account", version, about = "Command line utility to manage multiple GitHub accounts")]
pub struct Cli {
    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Adds a new GitHub account; prompts for any value not given as a flag
    Add {
        /// GitHub username
        #[arg(long)]
        username: Option<String>,
        /// GitHub email address
        #[arg(long)]
        email: Option<String>,
        /// Alias for the account, also used as the SSH host token
        #[arg(long)]
        alias: Option<String>,
        /// Path to an existing SSH public key (.pub); generated if omitted
        #[arg(long)]
        ssh_key: Option<String>,
    },
    /// Lists all saved accounts
    List,
    /// Removes a saved account and its SSH config entry
    Remove {
        /// Alias of the account to remove
        alias: String,
    },
    /// Removes all saved accounts and their SSH config entries
    RemoveAll,
    /// Switches the current repository to an account
    Switch {
        /// Alias of the account to switch to
        alias: String,
    },
    /// Sets an account as the global default
    SetDefault {
        /// Alias of the account to set as default
        alias: String,
    },
    /// Shows the current account
    Current,
}
