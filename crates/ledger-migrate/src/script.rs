//! Migration script discovery.
//!
//! Scripts are plain files named `<version>__<description>.<extension>`. The
//! loader lists a directory, parses every file name, reads the contents and
//! returns the scripts sorted by version.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{MigrateError, Result};

/// Separator between version and description.
pub const VERSION_SEPARATOR: &str = "__";

/// A migration script loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// Token before the first `__`; the ledger key.
    pub version: String,
    /// Text between `__` and the first `.` after it.
    pub description: String,
    /// Original file name.
    pub file_name: String,
    /// Raw script bytes.
    pub content: Vec<u8>,
}

impl MigrationScript {
    /// Builds a script from a file name and its contents.
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Result<Self> {
        let file_name = file_name.into();
        let (version, description) = parse_file_name(&file_name)?;
        Ok(Self {
            version,
            description,
            file_name,
            content: content.into(),
        })
    }

    /// Hex-encoded SHA-256 of the script contents.
    #[must_use]
    pub fn hash(&self) -> String {
        content_hash(&self.content)
    }

    /// Script contents as SQL text, exactly as read from disk.
    pub fn sql(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|source| MigrateError::NonUtf8Script {
            file_name: self.file_name.clone(),
            source,
        })
    }
}

/// Hex-encoded SHA-256 of `content`, computed with a fresh hasher.
#[must_use]
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Splits `<version>__<description>.<extension>` into version and description.
pub fn parse_file_name(file_name: &str) -> Result<(String, String)> {
    let malformed = |reason| MigrateError::MalformedFileName {
        file_name: file_name.to_string(),
        reason,
    };

    let (version, rest) = file_name
        .split_once(VERSION_SEPARATOR)
        .ok_or_else(|| malformed("missing '__' separator"))?;
    if version.is_empty() {
        return Err(malformed("empty version"));
    }
    let (description, _extension) = rest
        .split_once('.')
        .ok_or_else(|| malformed("missing extension"))?;
    if description.is_empty() {
        return Err(malformed("empty description"));
    }

    Ok((version.to_string(), description.to_string()))
}

/// Orders versions: all-digit versions first by numeric value, then the rest
/// lexicographically. Ties on value fall back to the literal string.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    fn is_numeric(v: &str) -> bool {
        !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit())
    }

    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a_digits = a.trim_start_matches('0');
            let b_digits = b.trim_start_matches('0');
            a_digits
                .len()
                .cmp(&b_digits.len())
                .then_with(|| a_digits.cmp(b_digits))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Sorts scripts by version and rejects duplicate versions.
pub fn sort_scripts(scripts: &mut [MigrationScript]) -> Result<()> {
    scripts.sort_by(|a, b| compare_versions(&a.version, &b.version));
    if let Some(pair) = scripts.windows(2).find(|w| w[0].version == w[1].version) {
        return Err(MigrateError::DuplicateVersion {
            version: pair[0].version.clone(),
            first: pair[0].file_name.clone(),
            second: pair[1].file_name.clone(),
        });
    }
    Ok(())
}

/// Reads the raw bytes of a script.
pub fn read_content(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| MigrateError::ReadScript {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists the file names of candidate scripts in `dir`, in directory order.
///
/// Sub-directories and dot-files are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MigrateError::MigrationsDirNotFound(dir.to_path_buf()));
    }
    let list_err = |source| MigrateError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if name.starts_with('.') {
            debug!(file_name = %name, "Skipping hidden file");
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            debug!(file_name = %name, "Skipping non-file entry");
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

fn utf8_file_name(path: &Path) -> Result<String> {
    let name = path.file_name().unwrap_or_default();
    name.to_str()
        .map(str::to_string)
        .ok_or_else(|| MigrateError::MalformedFileName {
            file_name: name.to_string_lossy().into_owned(),
            reason: "file name is not valid UTF-8",
        })
}

/// Loads every script in `dir`, sorted by version.
///
/// File names and contents must be valid UTF-8, so nothing is applied from a
/// directory holding a script that could not be run verbatim.
pub fn list_scripts(dir: &Path) -> Result<Vec<MigrationScript>> {
    let mut scripts = Vec::new();
    for path in list_files(dir)? {
        let file_name = utf8_file_name(&path)?;
        let content = read_content(&path)?;
        let script = MigrationScript::new(file_name, content)?;
        script.sql()?;
        scripts.push(script);
    }
    sort_scripts(&mut scripts)?;
    debug!(count = scripts.len(), dir = %dir.display(), "Loaded migration scripts");
    Ok(scripts)
}
