use std::{fs, io::ErrorKind, path::PathBuf};

use crate::error::AppError;

/// Host blocks written by this tool route to github.com
const HOSTING_DOMAIN: &str = "github.com";
/// SSH client config file name inside ~/.ssh
const SSH_CONFIG_FILE: &str = "config";

/// Editor for the per-alias `Host` blocks this tool owns in the SSH
/// client config
///
/// Only blocks whose `Host` token matches a registry alias are ever touched;
/// everything else in the file is preserved byte-for-byte.
pub struct SshConfigEditor {
    config_file: PathBuf,
}

impl SshConfigEditor {
    /// Creates an editor for the given SSH config file
    pub fn new(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    /// Creates an editor for `~/.ssh/config`
    pub fn open_default() -> Result<Self, AppError> {
        let home_dir: PathBuf = dirs::home_dir().ok_or_else(|| {
            AppError::Validation("failed to find the home directory".to_string())
        })?;
        Ok(Self::new(home_dir.join(".ssh").join(SSH_CONFIG_FILE)))
    }

    /// Appends a `Host` block routing the alias to the account's identity file
    ///
    /// Does not deduplicate; the registry's alias uniqueness prevents two
    /// blocks for the same alias.
    pub fn append_block(&self, alias: &str, identity_file: &str) -> Result<(), AppError> {
        let mut contents: String = self.read_contents()?.unwrap_or_default();
        contents.push_str(&format!(
            "\nHost {alias}\n\tHostName {HOSTING_DOMAIN}\n\tUser git\n\tIdentityFile {identity_file}\n"
        ));
        self.write_contents(&contents)
    }

    /// Removes the `Host` block for an alias, if present
    ///
    /// No-op when the config file or the block does not exist.
    pub fn remove_block(&self, alias: &str) -> Result<(), AppError> {
        let Some(contents) = self.read_contents()? else {
            return Ok(());
        };
        if let Some(stripped) = strip_block(&contents, alias) {
            self.write_contents(&stripped)?;
        }
        Ok(())
    }

    /// Removes the `Host` blocks for every given alias in one rewrite
    ///
    /// Blocks for hosts outside the given set are left untouched.
    pub fn remove_blocks(&self, aliases: &[String]) -> Result<(), AppError> {
        let Some(mut contents) = self.read_contents()? else {
            return Ok(());
        };
        let mut changed = false;
        for alias in aliases {
            if let Some(stripped) = strip_block(&contents, alias) {
                contents = stripped;
                changed = true;
            }
        }
        if changed {
            self.write_contents(&contents)?;
        }
        Ok(())
    }

    /// Reads the whole config file, `None` if it does not exist yet
    fn read_contents(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.config_file) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::SshConfigUnreadable(e)),
        }
    }

    /// Writes the whole config file back in one pass
    fn write_contents(&self, contents: &str) -> Result<(), AppError> {
        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent).map_err(AppError::SshConfigUnwritable)?;
        }
        fs::write(&self.config_file, contents).map_err(AppError::SshConfigUnwritable)
    }
}

/// Returns the host token of a `Host <token>` line, if this line opens a stanza
fn host_alias(line: &str) -> Option<&str> {
    let mut tokens = line.trim().split_whitespace();
    if tokens.next()? != "Host" {
        return None;
    }
    tokens.next()
}

/// Returns the contents with the alias's stanza removed, `None` if absent
///
/// The stanza runs from its `Host` line up to, but not including, the next
/// blank line or `Host` line. The blank separator line in front of the stanza
/// is removed with it, so appending a block and removing it again restores the
/// file exactly. The host token must match the alias exactly, a stanza for
/// `work2` is not a stanza for `work`.
fn strip_block(contents: &str, alias: &str) -> Option<String> {
    let mut kept: Vec<&str> = Vec::new();
    let mut suppressing = false;
    let mut removed = false;

    for line in contents.split_inclusive('\n') {
        if suppressing {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("Host ") {
                suppressing = false;
            } else {
                continue;
            }
        }
        if host_alias(line) == Some(alias) {
            if kept.last().is_some_and(|prev| prev.trim().is_empty()) {
                kept.pop();
            }
            suppressing = true;
            removed = true;
            continue;
        }
        kept.push(line);
    }

    removed.then(|| kept.concat())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn editor_in(dir: &TempDir) -> SshConfigEditor {
        SshConfigEditor::new(dir.path().join(SSH_CONFIG_FILE))
    }

    fn read(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join(SSH_CONFIG_FILE)).unwrap()
    }

    #[test]
    fn append_writes_exact_block_shape() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);

        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        assert_eq!(
            read(&dir),
            "\nHost work\n\tHostName github.com\n\tUser git\n\tIdentityFile ~/.ssh/work.pub\n"
        );
    }

    #[test]
    fn append_then_remove_restores_original_contents() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);
        let original = "Host upstream\n\tHostName example.org\n\tUser deploy\n";
        fs::write(dir.path().join(SSH_CONFIG_FILE), original).unwrap();

        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        editor.remove_block("work").unwrap();
        assert_eq!(read(&dir), original);
    }

    #[test]
    fn append_then_remove_on_fresh_file_leaves_it_empty() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);

        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        editor.remove_block("work").unwrap();
        assert_eq!(read(&dir), "");
    }

    #[test]
    fn remove_matches_exact_host_token_not_prefix() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);
        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        editor.append_block("work2", "~/.ssh/work2.pub").unwrap();

        editor.remove_block("work").unwrap();
        assert_eq!(
            read(&dir),
            "\nHost work2\n\tHostName github.com\n\tUser git\n\tIdentityFile ~/.ssh/work2.pub\n"
        );
    }

    #[test]
    fn remove_middle_block_keeps_neighbours_intact() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);
        editor.append_block("a", "~/.ssh/a.pub").unwrap();
        editor.append_block("b", "~/.ssh/b.pub").unwrap();
        editor.append_block("c", "~/.ssh/c.pub").unwrap();

        editor.remove_block("b").unwrap();
        assert_eq!(
            read(&dir),
            "\nHost a\n\tHostName github.com\n\tUser git\n\tIdentityFile ~/.ssh/a.pub\n\
             \nHost c\n\tHostName github.com\n\tUser git\n\tIdentityFile ~/.ssh/c.pub\n"
        );
    }

    #[test]
    fn remove_is_noop_without_file_or_block() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);

        editor.remove_block("work").unwrap();
        assert!(!dir.path().join(SSH_CONFIG_FILE).exists());

        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        let before = read(&dir);
        editor.remove_block("absent").unwrap();
        assert_eq!(read(&dir), before);
    }

    #[test]
    fn remove_blocks_only_touches_owned_aliases() {
        let dir = TempDir::new().unwrap();
        let editor = editor_in(&dir);
        let foreign = "Host upstream\n\tHostName example.org\n\tUser deploy\n";
        fs::write(dir.path().join(SSH_CONFIG_FILE), foreign).unwrap();
        editor.append_block("work", "~/.ssh/work.pub").unwrap();
        editor.append_block("personal", "~/.ssh/personal.pub").unwrap();

        editor
            .remove_blocks(&["work".to_string(), "personal".to_string()])
            .unwrap();
        assert_eq!(read(&dir), foreign);
    }
}
