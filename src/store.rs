use std::{fs, path::PathBuf, sync::LazyLock};

use regex::Regex;

use crate::{
    error::AppError,
    profile::{Profile, Registry},
};

/// Config directory in user's home directory
const CONFIG_DIR: &str = ".git-account";
/// Account registry file inside the config directory
const CONFIG_FILE: &str = "config.json";

/// Permissive email shape, one '@' followed by a dotted domain
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("valid email pattern"));

/// Persistent JSON registry of saved accounts
///
/// The registry file is the sole source of truth; the SSH config and Git
/// settings are projections derived from it.
pub struct ProfileStore {
    config_file: PathBuf,
}

impl ProfileStore {
    /// Creates a store backed by the given registry file
    pub fn new(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    /// Creates a store backed by `~/.git-account/config.json`
    pub fn open_default() -> Result<Self, AppError> {
        let home_dir: PathBuf = dirs::home_dir().ok_or_else(|| {
            AppError::Validation("failed to find the home directory".to_string())
        })?;
        Ok(Self::new(home_dir.join(CONFIG_DIR).join(CONFIG_FILE)))
    }

    /// Loads the registry, creating an empty registry file if none exists
    pub fn load(&self) -> Result<Registry, AppError> {
        if !self.config_file.exists() {
            if let Some(parent) = self.config_file.parent() {
                fs::create_dir_all(parent).map_err(AppError::ConfigUnwritable)?;
            }
            fs::write(&self.config_file, "{}").map_err(AppError::ConfigUnwritable)?;
            return Ok(Registry::new());
        }

        let contents: String =
            fs::read_to_string(&self.config_file).map_err(AppError::ConfigUnreadable)?;
        if contents.trim().is_empty() {
            return Ok(Registry::new());
        }

        serde_json::from_str(&contents).map_err(AppError::ConfigCorrupt)
    }

    /// Saves the full registry, written to a temp file then renamed into place
    pub fn save(&self, registry: &Registry) -> Result<(), AppError> {
        let json: String = serde_json::to_string_pretty(registry)
            .map_err(|e| AppError::ConfigUnwritable(e.into()))?;
        let tmp_file: PathBuf = self.config_file.with_extension("json.tmp");
        fs::write(&tmp_file, json).map_err(AppError::ConfigUnwritable)?;
        fs::rename(&tmp_file, &self.config_file).map_err(AppError::ConfigUnwritable)?;
        Ok(())
    }

    /// Returns all saved usernames
    pub fn usernames(&self) -> Result<Vec<String>, AppError> {
        Ok(self.load()?.values().map(|p| p.username.clone()).collect())
    }

    /// Returns all saved email addresses
    pub fn emails(&self) -> Result<Vec<String>, AppError> {
        Ok(self.load()?.values().map(|p| p.email.clone()).collect())
    }

    /// Returns all saved aliases
    pub fn aliases(&self) -> Result<Vec<String>, AppError> {
        Ok(self.load()?.keys().cloned().collect())
    }

    /// Inserts a new account after checking the uniqueness invariants
    pub fn add_profile(
        &self,
        alias: &str,
        username: &str,
        email: &str,
        ssh_key_path: &str,
    ) -> Result<(), AppError> {
        let mut registry: Registry = self.load()?;

        if registry.contains_key(alias) {
            return Err(AppError::DuplicateAlias(alias.to_string()));
        }
        if registry.values().any(|p| p.username == username) {
            return Err(AppError::DuplicateUsername(username.to_string()));
        }
        if registry.values().any(|p| p.email == email) {
            return Err(AppError::DuplicateEmail(email.to_string()));
        }

        registry.insert(
            alias.to_string(),
            Profile {
                username: username.to_string(),
                email: email.to_string(),
                ssh_key_path: ssh_key_path.to_string(),
            },
        );
        self.save(&registry)
    }

    /// Deletes an account by alias
    pub fn remove_profile(&self, alias: &str) -> Result<Profile, AppError> {
        let mut registry: Registry = self.load()?;
        let removed: Profile = registry
            .shift_remove(alias)
            .ok_or_else(|| AppError::ProfileNotFound(alias.to_string()))?;
        self.save(&registry)?;
        Ok(removed)
    }

    /// Deletes the registry file itself; the next `load` recreates it empty
    pub fn remove_all(&self) -> Result<(), AppError> {
        if self.config_file.exists() {
            fs::remove_file(&self.config_file).map_err(AppError::ConfigUnwritable)?;
        }
        Ok(())
    }
}

/// Checks that an email looks like local@domain.tld
///
/// Intentionally permissive, this mirrors the shape check applied when
/// accounts were first saved rather than full RFC validation.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
