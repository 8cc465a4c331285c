//! Document storage with a one-deep backup.
//!
//! Every save first copies the current primary over the backup, so a write
//! that leaves the primary corrupt still leaves the previous good copy behind.
//! [`load`] tries the primary, then the backup, then falls back to an empty
//! document; it never fails.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::doc::Document;
use crate::persist::{ParseError, Parsed, from_persisted, parse_document, to_persisted};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ParseError),
}

/// Raw access to the primary and backup copies.
///
/// Loads return `None` when a copy is absent or empty.
pub trait DocStorage {
    /// # Errors
    ///
    /// Returns an error if the copy exists but cannot be read.
    fn load_primary(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns an error if the copy exists but cannot be read.
    fn load_backup(&self) -> Result<Option<String>, StorageError>;

    /// Store `contents` as the new primary, first moving the old primary to the backup slot.
    ///
    /// # Errors
    ///
    /// Returns an error if either copy cannot be written.
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// Two JSON files on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    primary: PathBuf,
    backup: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self { primary: primary.into(), backup: backup.into() }
    }

    #[must_use]
    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io { path: path.to_path_buf(), source }),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), StorageError> {
    std::fs::write(path, contents).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })
}

impl DocStorage for FileStorage {
    fn load_primary(&self) -> Result<Option<String>, StorageError> {
        read_optional(&self.primary)
    }

    fn load_backup(&self) -> Result<Option<String>, StorageError> {
        read_optional(&self.backup)
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(current) = read_optional(&self.primary)? {
            write_file(&self.backup, &current)?;
        }
        write_file(&self.primary, contents)
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// In-process storage for tests and embedding hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub primary: Option<String>,
    pub backup: Option<String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn non_empty(copy: Option<&String>) -> Option<String> {
    copy.filter(|raw| !raw.trim().is_empty()).cloned()
}

impl DocStorage for MemoryStorage {
    fn load_primary(&self) -> Result<Option<String>, StorageError> {
        Ok(non_empty(self.primary.as_ref()))
    }

    fn load_backup(&self) -> Result<Option<String>, StorageError> {
        Ok(non_empty(self.backup.as_ref()))
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(current) = non_empty(self.primary.as_ref()) {
            self.backup = Some(current);
        }
        self.primary = Some(contents.to_owned());
        Ok(())
    }
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Which copy a [`Loaded`] document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
    Empty,
}

impl LoadSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Backup => "backup",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub doc: Document,
    pub source: LoadSource,
    /// Order repairs made while parsing.
    pub warnings: Vec<String>,
}

/// Load the newest usable document: primary, then backup, then empty.
#[must_use]
pub fn load(storage: &dyn DocStorage) -> Loaded {
    for source in [LoadSource::Primary, LoadSource::Backup] {
        match read_copy(storage, source) {
            Ok(Some(parsed)) => {
                for warning in &parsed.warnings {
                    warn!(source = source.as_str(), %warning, "repaired stored document");
                }
                let doc = from_persisted(&parsed.doc);
                info!(source = source.as_str(), shapes = doc.len(), "loaded document");
                return Loaded { doc, source, warnings: parsed.warnings };
            }
            Ok(None) => debug!(source = source.as_str(), "no stored copy"),
            Err(e) => warn!(source = source.as_str(), error = %e, "stored copy unusable; skipping"),
        }
    }
    info!("starting with an empty document");
    Loaded { doc: Document::new(), source: LoadSource::Empty, warnings: Vec::new() }
}

fn read_copy(storage: &dyn DocStorage, source: LoadSource) -> Result<Option<Parsed>, StorageError> {
    let raw = match source {
        LoadSource::Primary => storage.load_primary()?,
        LoadSource::Backup => storage.load_backup()?,
        LoadSource::Empty => None,
    };
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(&raw)?;
    Ok(Some(parse_document(&value)?))
}

/// Serialize `doc` and write it as the new primary.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn save(storage: &mut dyn DocStorage, doc: &Document) -> Result<(), StorageError> {
    let raw = serde_json::to_string_pretty(&to_persisted(doc))?;
    storage.write(&raw)?;
    info!(shapes = doc.len(), "saved document");
    Ok(())
}
