use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error when the account config file exists but is not valid JSON
    #[error("config file is corrupt, not valid JSON: {0}")]
    ConfigCorrupt(#[source] serde_json::Error),
    /// Error reading the account config file
    #[error("could not read config file: {0}")]
    ConfigUnreadable(#[source] std::io::Error),
    /// Error writing the account config file
    #[error("could not write config file: {0}")]
    ConfigUnwritable(#[source] std::io::Error),
    /// Error when a username is already taken by another account
    #[error("username already exists: '{0}'")]
    DuplicateUsername(String),
    /// Error when an email is already taken by another account
    #[error("email already exists: '{0}'")]
    DuplicateEmail(String),
    /// Error when an alias is already taken by another account
    #[error("alias already exists: '{0}'")]
    DuplicateAlias(String),
    /// Error when a specific account alias is not found
    #[error("account not found: '{0}'")]
    ProfileNotFound(String),
    /// Error when an email does not look like local@domain.tld
    #[error("invalid email format: '{0}'")]
    InvalidEmailFormat(String),
    /// Error when an SSH public key path does not exist or is not a .pub file
    #[error("invalid SSH public key path: '{}'", .0.display())]
    InvalidSshKeyPath(PathBuf),
    /// Error reading the SSH client config file
    #[error("could not read ssh config: {0}")]
    SshConfigUnreadable(#[source] std::io::Error),
    /// Error writing the SSH client config file
    #[error("could not write ssh config: {0}")]
    SshConfigUnwritable(#[source] std::io::Error),
    /// Error when the origin remote URL does not end in owner/repo.git
    #[error("could not parse remote origin URL: '{0}'")]
    RemoteUrlUnparseable(String),
    /// Error when an external command exits non-zero
    #[error("'{command}' failed with status {code:?}: {stderr}")]
    ExternalCommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// Error when current directory is not a Git repository
    #[error("not in git repository")]
    NotInGitRepository,
    /// Error during input validation
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when user input fails
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during UTF-8 conversion
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl AppError {
    /// True for errors a user can correct by re-entering input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateUsername(_)
                | AppError::DuplicateEmail(_)
                | AppError::DuplicateAlias(_)
                | AppError::InvalidEmailFormat(_)
                | AppError::InvalidSshKeyPath(_)
                | AppError::Validation(_)
        )
    }
}
