use std::{
    process::{Command, Output},
    sync::LazyLock,
};

use regex::Regex;

use crate::{error::AppError, profile::Profile};

/// Trailing owner/repo segment of a clone URL, https or ssh form
static ORIGIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:/]([^/:]+)/([^/]+)\.git$").expect("valid origin pattern"));

/// Whether Git identity settings apply to one repository or to all of them
#[derive(Clone, Copy, Debug)]
pub enum Scope {
    Local,
    Global,
}

impl Scope {
    fn flag(self) -> &'static str {
        match self {
            Scope::Local => "--local",
            Scope::Global => "--global",
        }
    }
}

/// Runs a Git command with discrete arguments, never through a shell
fn run_git(args: &[&str]) -> Result<Output, AppError> {
    let output: Output = Command::new("git").args(args).output()?;
    if !output.status.success() {
        return Err(AppError::ExternalCommandFailed {
            command: format!("git {}", args.join(" ")),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Sets user.name, user.email and user.signingkey in the chosen scope
///
/// The three settings are applied in order with no rollback; a mid-way
/// failure leaves the earlier ones in place.
pub fn set_identity(profile: &Profile, scope: Scope) -> Result<(), AppError> {
    run_git(&["config", scope.flag(), "user.name", &profile.username])?;
    run_git(&["config", scope.flag(), "user.email", &profile.email])?;
    run_git(&["config", scope.flag(), "user.signingkey", &profile.ssh_key_path])?;
    Ok(())
}

/// Reads the effective user.name, empty when no account is configured
pub fn current_username() -> Result<String, AppError> {
    // an unset user.name exits non-zero with empty output, not an error here
    let output: Output = Command::new("git")
        .args(["config", "--get", "user.name"])
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Checks if current directory is inside a Git work tree
pub fn is_inside_repo() -> Result<bool, AppError> {
    let output: Output = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()?;
    if !output.status.success() {
        return Ok(false);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim() == "true")
}

/// Points the `origin` remote at the alias so SSH routes through its block
///
/// The owner/repo tail of the current URL is kept, only the host part is
/// replaced with the alias.
pub fn rewrite_remote_origin(alias: &str) -> Result<(), AppError> {
    let output: Output = run_git(&["config", "--get", "remote.origin.url"])?;
    let remote_url: String = String::from_utf8(output.stdout)?.trim().to_string();
    let new_url: String = rewrite_origin_url(&remote_url, alias)?;

    run_git(&["remote", "rm", "origin"])?;
    run_git(&["remote", "add", "origin", &new_url])?;
    Ok(())
}

/// Rewrites a clone URL to `git@<alias>:<owner>/<repo>.git`
fn rewrite_origin_url(remote_url: &str, alias: &str) -> Result<String, AppError> {
    let captures = ORIGIN_PATTERN
        .captures(remote_url)
        .ok_or_else(|| AppError::RemoteUrlUnparseable(remote_url.to_string()))?;
    Ok(format!("git@{alias}:{}/{}.git", &captures[1], &captures[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_https_origin() {
        assert_eq!(
            rewrite_origin_url("https://github.com/acme/widgets.git", "work").unwrap(),
            "git@work:acme/widgets.git"
        );
    }

    #[test]
    fn rewrites_ssh_origin() {
        assert_eq!(
            rewrite_origin_url("git@github.com:acme/widgets.git", "personal").unwrap(),
            "git@personal:acme/widgets.git"
        );
    }

    #[test]
    fn rewrites_origin_already_routed_through_an_alias() {
        assert_eq!(
            rewrite_origin_url("git@work:acme/widgets.git", "personal").unwrap(),
            "git@personal:acme/widgets.git"
        );
    }

    #[test]
    fn rejects_url_without_owner_repo_tail() {
        assert!(matches!(
            rewrite_origin_url("https://github.com/acme", "work"),
            Err(AppError::RemoteUrlUnparseable(_))
        ));
        assert!(matches!(
            rewrite_origin_url("", "work"),
            Err(AppError::RemoteUrlUnparseable(_))
        ));
    }
}
