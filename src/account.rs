use colored::Colorize;
use inquire::Confirm;

use crate::{
    error::AppError,
    git::{self, Scope},
    profile::{Profile, Registry},
    ssh_config::SshConfigEditor,
    ssh_key,
    store::ProfileStore,
    validation::{
        prompt_until_valid, validate_input_alias, validate_input_email, validate_input_username,
    },
};

/// Drives one account operation end-to-end across the registry, the SSH
/// config and Git
///
/// The registry is written before its projections, so an interrupted
/// operation can leave an alias without an SSH block but never an SSH block
/// without an alias.
pub struct AccountController {
    store: ProfileStore,
    ssh_config: SshConfigEditor,
}

impl AccountController {
    pub fn new(store: ProfileStore, ssh_config: SshConfigEditor) -> Self {
        Self { store, ssh_config }
    }

    /// Controller over `~/.git-account/config.json` and `~/.ssh/config`
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(
            ProfileStore::open_default()?,
            SshConfigEditor::open_default()?,
        ))
    }

    /// Saves a new account and appends its SSH routing block
    ///
    /// Values missing from the command line are prompted for.
    pub fn add(
        &self,
        username: Option<String>,
        email: Option<String>,
        alias: Option<String>,
        ssh_key: Option<String>,
    ) -> Result<(), AppError> {
        let registry: Registry = self.store.load()?;

        let username: String = match username {
            Some(name) => {
                validate_input_username(&name, &registry)?;
                name
            }
            None => prompt_until_valid(&format!("{}", "enter your GitHub username:".blue()), |input| {
                validate_input_username(input, &registry)
            })?,
        };

        let email: String = match email {
            Some(email) => {
                validate_input_email(&email, &registry)?;
                email
            }
            None => prompt_until_valid(&format!("{}", "enter your GitHub email:".blue()), |input| {
                validate_input_email(input, &registry)
            })?,
        };

        let alias: String = match alias {
            Some(alias) => {
                validate_input_alias(&alias, &registry)?;
                alias
            }
            None => prompt_until_valid(&format!("{}", "enter an alias for this account:".blue()), |input| {
                validate_input_alias(input, &registry)
            })?,
        };

        let key_path: String = match ssh_key {
            Some(path) => ssh_key::resolve_public_key_path(&path)?,
            None => self.resolve_key_interactively(&alias, &username)?,
        };

        self.store.add_profile(&alias, &username, &email, &key_path)?;
        self.ssh_config.append_block(&alias, &key_path)?;

        println!("{} {}", "account added:".green(), alias);
        Ok(())
    }

    fn resolve_key_interactively(&self, alias: &str, username: &str) -> Result<String, AppError> {
        let has_key: bool = Confirm::new("do you already have an SSH key?")
            .with_default(false)
            .prompt()?;
        if !has_key {
            return ssh_key::generate(alias, username);
        }
        let path: String = prompt_until_valid(
            &format!("{}", "enter your SSH public key path:".blue()),
            |input| ssh_key::resolve_public_key_path(input).map(|_| ()),
        )?;
        ssh_key::resolve_public_key_path(&path)
    }

    /// Deletes an account and its SSH routing block
    pub fn remove(&self, alias: &str) -> Result<(), AppError> {
        self.store.remove_profile(alias)?;
        self.ssh_config.remove_block(alias)?;
        println!("{} {}", "account removed:".green(), alias);
        Ok(())
    }

    /// Deletes every saved account along with the SSH blocks this tool owns
    ///
    /// SSH config entries for hosts outside the registry are left alone.
    pub fn remove_all(&self) -> Result<(), AppError> {
        let aliases: Vec<String> = self.store.aliases()?;
        self.ssh_config.remove_blocks(&aliases)?;
        self.store.remove_all()?;
        println!("{}", "all saved accounts removed".green());
        Ok(())
    }

    /// Makes an account the identity of the current repository
    ///
    /// Rewrites the origin remote to route through the alias, so pushes pick
    /// up the account's key.
    pub fn switch(&self, alias: &str) -> Result<(), AppError> {
        let registry: Registry = self.store.load()?;
        let profile: &Profile = registry
            .get(alias)
            .ok_or_else(|| AppError::ProfileNotFound(alias.to_string()))?;

        if !git::is_inside_repo()? {
            return Err(AppError::NotInGitRepository);
        }

        git::set_identity(profile, Scope::Local)?;
        git::rewrite_remote_origin(alias)?;
        println!("{} {}", "switched to account:".green(), alias);
        Ok(())
    }

    /// Makes an account the global default identity
    pub fn set_default(&self, alias: &str) -> Result<(), AppError> {
        let registry: Registry = self.store.load()?;
        let profile: &Profile = registry
            .get(alias)
            .ok_or_else(|| AppError::ProfileNotFound(alias.to_string()))?;

        git::set_identity(profile, Scope::Global)?;
        println!("{} {}", "default account set to:".green(), alias);
        Ok(())
    }

    /// Shows the username Git currently resolves to
    pub fn current(&self) -> Result<(), AppError> {
        let username: String = git::current_username()?;
        println!("{} {}", "current account:".blue(), username);
        Ok(())
    }

    /// Prints the full registry as pretty JSON
    pub fn list(&self) -> Result<(), AppError> {
        let registry: Registry = self.store.load()?;
        if registry.is_empty() {
            println!("{}", "no saved accounts".red());
            return Ok(());
        }
        let json: String = serde_json::to_string_pretty(&registry)
            .map_err(|e| AppError::ConfigUnwritable(e.into()))?;
        println!("{json}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn controller_in(dir: &TempDir) -> AccountController {
        AccountController::new(
            ProfileStore::new(dir.path().join("config.json")),
            SshConfigEditor::new(dir.path().join("ssh_config")),
        )
    }

    fn pub_key_in(dir: &TempDir, name: &str) -> String {
        let key = dir.path().join(format!("{name}.pub"));
        fs::write(&key, "ssh-rsa AAAA").unwrap();
        key.to_string_lossy().into_owned()
    }

    #[test]
    fn add_writes_registry_entry_and_ssh_block() {
        let dir = TempDir::new().unwrap();
        let controller = controller_in(&dir);
        let key = pub_key_in(&dir, "work");

        controller
            .add(
                Some("octocat".to_string()),
                Some("octo@example.com".to_string()),
                Some("work".to_string()),
                Some(key.clone()),
            )
            .unwrap();

        let registry = controller.store.load().unwrap();
        assert_eq!(registry["work"].username, "octocat");
        let ssh = fs::read_to_string(dir.path().join("ssh_config")).unwrap();
        assert!(ssh.contains("Host work"));
        assert!(ssh.contains(&format!("IdentityFile {key}")));
    }

    #[test]
    fn add_rejects_duplicates_from_arguments() {
        let dir = TempDir::new().unwrap();
        let controller = controller_in(&dir);
        let key = pub_key_in(&dir, "work");
        controller
            .add(
                Some("octocat".to_string()),
                Some("octo@example.com".to_string()),
                Some("work".to_string()),
                Some(key.clone()),
            )
            .unwrap();

        let result = controller.add(
            Some("octocat".to_string()),
            Some("fresh@example.com".to_string()),
            Some("personal".to_string()),
            Some(key),
        );
        assert!(matches!(result, Err(AppError::DuplicateUsername(_))));
        assert_eq!(controller.store.aliases().unwrap(), vec!["work"]);
    }

    #[test]
    fn remove_deletes_registry_entry_and_ssh_block() {
        let dir = TempDir::new().unwrap();
        let controller = controller_in(&dir);
        let key = pub_key_in(&dir, "work");
        controller
            .add(
                Some("octocat".to_string()),
                Some("octo@example.com".to_string()),
                Some("work".to_string()),
                Some(key),
            )
            .unwrap();

        controller.remove("work").unwrap();
        assert!(controller.store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("ssh_config")).unwrap(), "");
    }

    #[test]
    fn remove_unknown_alias_fails_loud() {
        let dir = TempDir::new().unwrap();
        let controller = controller_in(&dir);

        assert!(matches!(
            controller.remove("absent"),
            Err(AppError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn remove_all_spares_foreign_ssh_entries() {
        let dir = TempDir::new().unwrap();
        let controller = controller_in(&dir);
        let foreign = "Host upstream\n\tHostName example.org\n\tUser deploy\n";
        fs::write(dir.path().join("ssh_config"), foreign).unwrap();
        let work_key = pub_key_in(&dir, "work");
        let personal_key = pub_key_in(&dir, "personal");
        controller
            .add(
                Some("octocat".to_string()),
                Some("octo@example.com".to_string()),
                Some("work".to_string()),
                Some(work_key),
            )
            .unwrap();
        controller
            .add(
                Some("hubber".to_string()),
                Some("hubber@example.com".to_string()),
                Some("personal".to_string()),
                Some(personal_key),
            )
            .unwrap();

        controller.remove_all().unwrap();
        assert!(!dir.path().join("config.json").exists());
        assert_eq!(fs::read_to_string(dir.path().join("ssh_config")).unwrap(), foreign);
    }
}
