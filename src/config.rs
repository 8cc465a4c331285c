//! Editor configuration parsed from environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::consts::DEFAULT_DEVLOG_CAPACITY;

pub const DEFAULT_DOC_PATH: &str = "palette.json";
pub const DEFAULT_FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub doc_path: PathBuf,
    pub backup_path: PathBuf,
    pub devlog_capacity: usize,
    /// Simulated frame length used when replaying scripts.
    pub frame_ms: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let doc_path = PathBuf::from(DEFAULT_DOC_PATH);
        Self {
            backup_path: default_backup_path(&doc_path),
            doc_path,
            devlog_capacity: DEFAULT_DEVLOG_CAPACITY,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PALETTE_DOC_PATH`: default `palette.json`
    /// - `PALETTE_BACKUP_PATH`: default `<doc path>.bak`
    /// - `PALETTE_DEVLOG_CAPACITY`: default 200
    /// - `PALETTE_FRAME_MS`: default 16
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Same as [`EditorConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let doc_path = lookup("PALETTE_DOC_PATH").map_or_else(|| PathBuf::from(DEFAULT_DOC_PATH), PathBuf::from);
        let backup_path = lookup("PALETTE_BACKUP_PATH").map_or_else(|| default_backup_path(&doc_path), PathBuf::from);
        let devlog_capacity = parse_var(&lookup, "PALETTE_DEVLOG_CAPACITY", DEFAULT_DEVLOG_CAPACITY)?;
        let frame_ms = parse_var(&lookup, "PALETTE_FRAME_MS", DEFAULT_FRAME_MS)?;
        if !(frame_ms.is_finite() && frame_ms > 0.0) {
            return Err(ConfigError::Invalid { var: "PALETTE_FRAME_MS", value: frame_ms.to_string() });
        }

        Ok(Self { doc_path, backup_path, devlog_capacity, frame_ms })
    }
}

/// `<doc path>.bak`, keeping the original extension.
#[must_use]
pub fn default_backup_path(doc_path: &Path) -> PathBuf {
    let mut raw = doc_path.as_os_str().to_owned();
    raw.push(".bak");
    PathBuf::from(raw)
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { var, value }),
        },
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
