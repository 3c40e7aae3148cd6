use colored::Colorize;
use inquire::Text;

use crate::{error::AppError, profile::Registry, store};

/// Maximum length for a GitHub username
const MAX_USERNAME_LENGTH: usize = 39;
/// Maximum length for an email address
const MAX_EMAIL_LENGTH: usize = 100;
/// Maximum length for an account alias
const MAX_ALIAS_LENGTH: usize = 30;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(input.trim()) {
            Ok(_) => break Ok(input.trim().to_string()),
            Err(e) if e.is_input_error() => println!("{}", e.to_string().red()),
            Err(e) => return Err(e),
        }
    }
}

/// Validates a username against format and uniqueness rules
pub fn validate_input_username(name: &str, registry: &Registry) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::Validation("username cannot be empty".to_string()))
    } else if name.len() > MAX_USERNAME_LENGTH {
        Err(AppError::Validation(format!(
            "username too long, max {MAX_USERNAME_LENGTH} characters"
        )))
    } else if registry.values().any(|p| p.username == name) {
        Err(AppError::DuplicateUsername(name.to_string()))
    } else {
        Ok(())
    }
}

/// Validates an email against format and uniqueness rules
pub fn validate_input_email(email: &str, registry: &Registry) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::Validation("email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::Validation(format!(
            "email too long, max {MAX_EMAIL_LENGTH} characters"
        )))
    } else if !store::validate_email(email) {
        Err(AppError::InvalidEmailFormat(email.to_string()))
    } else if registry.values().any(|p| p.email == email) {
        Err(AppError::DuplicateEmail(email.to_string()))
    } else {
        Ok(())
    }
}

/// Validates an alias against format and uniqueness rules
///
/// The alias doubles as the SSH Host token, so it must not contain
/// whitespace.
pub fn validate_input_alias(alias: &str, registry: &Registry) -> Result<(), AppError> {
    if alias.is_empty() {
        Err(AppError::Validation("alias cannot be empty".to_string()))
    } else if alias.chars().any(char::is_whitespace) {
        Err(AppError::Validation(
            "alias cannot contain whitespace".to_string(),
        ))
    } else if alias.len() > MAX_ALIAS_LENGTH {
        Err(AppError::Validation(format!(
            "alias too long, max {MAX_ALIAS_LENGTH} characters"
        )))
    } else if registry.contains_key(alias) {
        Err(AppError::DuplicateAlias(alias.to_string()))
    } else {
        Ok(())
    }
}
