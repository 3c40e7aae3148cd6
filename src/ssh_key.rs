use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use colored::Colorize;

use crate::error::AppError;

/// Validates a user-supplied public key path and returns it expanded
///
/// The path must point at an existing `.pub` file.
pub fn resolve_public_key_path(path: &str) -> Result<String, AppError> {
    let expanded: PathBuf = expand_tilde(path)?;
    if expanded.extension().is_none_or(|ext| ext != "pub") || !expanded.exists() {
        return Err(AppError::InvalidSshKeyPath(expanded));
    }
    Ok(expanded.to_string_lossy().into_owned())
}

/// Generates a fresh key pair for the alias and returns the public key path
///
/// Runs ssh-keygen interactively, loads the key into the agent, and hands the
/// public key to the user for upload to GitHub.
pub fn generate(alias: &str, username: &str) -> Result<String, AppError> {
    let ssh_dir: PathBuf = home_dir()?.join(".ssh");
    ensure_ssh_dir(&ssh_dir)?;

    let key_file: PathBuf = ssh_dir.join(alias);
    println!("{}", "generating new SSH key...".blue());
    let status = Command::new("ssh-keygen")
        .args(["-t", "rsa", "-C", &format!("git-account@{username}")])
        .arg("-f")
        .arg(&key_file)
        .status()?;
    check_status("ssh-keygen", status)?;

    println!("{}", "adding SSH key to the agent...".blue());
    add_to_agent(&key_file)?;

    publish_public_key(&ssh_dir.join(format!("{alias}.pub")))?;
    println!(
        "{}",
        "add the public key to your GitHub account: https://github.com/settings/keys".blue()
    );

    Ok(format!("~/.ssh/{alias}.pub"))
}

fn ensure_ssh_dir(ssh_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(ssh_dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(ssh_dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

fn add_to_agent(key_file: &Path) -> Result<(), AppError> {
    let mut command = Command::new("ssh-add");
    if cfg!(target_os = "macos") {
        command.arg("--apple-use-keychain");
    }
    let status = command.arg(key_file).status()?;
    check_status("ssh-add", status)
}

/// Puts the public key on the clipboard where possible, prints it otherwise
fn publish_public_key(pub_key_file: &Path) -> Result<(), AppError> {
    let key_text: String = fs::read_to_string(pub_key_file)?;
    if copy_to_clipboard(&key_text)? {
        println!("{}", "public SSH key copied to clipboard".green());
    } else {
        println!("{}\n{}", "public SSH key:".blue(), key_text.trim());
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn copy_to_clipboard(text: &str) -> Result<bool, AppError> {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    check_status("pbcopy", child.wait()?)?;
    Ok(true)
}

#[cfg(not(target_os = "macos"))]
fn copy_to_clipboard(_text: &str) -> Result<bool, AppError> {
    Ok(false)
}

fn check_status(command: &str, status: ExitStatus) -> Result<(), AppError> {
    if !status.success() {
        return Err(AppError::ExternalCommandFailed {
            command: command.to_string(),
            code: status.code(),
            stderr: String::new(),
        });
    }
    Ok(())
}

fn expand_tilde(path: &str) -> Result<PathBuf, AppError> {
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

fn home_dir() -> Result<PathBuf, AppError> {
    dirs::home_dir()
        .ok_or_else(|| AppError::Validation("failed to find the home directory".to_string()))
}
