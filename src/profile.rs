use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Registry of all saved accounts, keyed by alias in insertion order
pub type Registry = IndexMap<String, Profile>;

/// Represents one saved GitHub account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// GitHub username (user.name)
    pub username: String,
    /// GitHub email address (user.email)
    pub email: String,
    /// Path to the account's SSH public key
    pub ssh_key_path: String,
}
