//! Encryption state classification for candidate files.
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Header prefix every ansible-vault payload starts with.
pub const VAULT_MARKER: &[u8] = b"$ANSIBLE_VAULT;";

/// Upper bound on the first-line peek; a real vault header fits well within it.
const MAX_HEADER_LINE: u64 = 4096;

/// Observed state of one candidate file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionState {
    Encrypted,
    Plaintext,
    Absent,
}

/// Whether `path` currently holds a vault-encrypted payload.
///
/// Absent files are simply not encrypted; non-existence is never an error at
/// this layer. Only the first line is read, never the whole file, and no
/// decryption is attempted.
pub fn is_encrypted(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut first_line = Vec::new();
    BufReader::new(file)
        .take(MAX_HEADER_LINE)
        .read_until(b'\n', &mut first_line)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(first_line.starts_with(VAULT_MARKER))
}

/// Classify `path` for status reporting.
///
/// The state is derived fresh on every call; it is never cached because the
/// executor may have just rewritten the file.
pub fn classify(path: &Path) -> Result<EncryptionState> {
    if !path.is_file() {
        return Ok(EncryptionState::Absent);
    }
    Ok(if is_encrypted(path)? {
        EncryptionState::Encrypted
    } else {
        EncryptionState::Plaintext
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn vault_header_is_detected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vault.yml");
        fs::write(&path, "$ANSIBLE_VAULT;1.1;AES256\n6162636465\n").expect("write");
        assert!(is_encrypted(&path).expect("inspect"));
        assert_eq!(classify(&path).expect("classify"), EncryptionState::Encrypted);
    }

    #[test]
    fn plaintext_yaml_is_not_encrypted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vault.yml");
        fs::write(&path, "---\ndb_password: hunter2\n").expect("write");
        assert!(!is_encrypted(&path).expect("inspect"));
        assert_eq!(classify(&path).expect("classify"), EncryptionState::Plaintext);
    }

    #[test]
    fn marker_must_start_the_first_line() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vault.yml");
        fs::write(&path, "# $ANSIBLE_VAULT;1.1;AES256\n").expect("write");
        assert!(!is_encrypted(&path).expect("inspect"));

        fs::write(&path, "---\n$ANSIBLE_VAULT;1.1;AES256\n").expect("write");
        assert!(!is_encrypted(&path).expect("inspect"));
    }

    #[test]
    fn empty_file_is_plaintext() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vault.yml");
        fs::write(&path, "").expect("write");
        assert!(!is_encrypted(&path).expect("inspect"));
    }

    #[test]
    fn absent_file_is_not_encrypted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing.yml");
        assert!(!is_encrypted(&path).expect("inspect"));
        assert_eq!(classify(&path).expect("classify"), EncryptionState::Absent);
    }

    #[test]
    fn header_without_trailing_newline_is_detected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vault.yml");
        fs::write(&path, "$ANSIBLE_VAULT;1.1;AES256").expect("write");
        assert!(is_encrypted(&path).expect("inspect"));
    }
}
