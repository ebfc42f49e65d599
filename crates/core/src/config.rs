//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core operations. Core code never reads environment variables itself; the binary
//! reads them (after loading any `.env` file) and hands the raw values to the helpers below.

use crate::constants::{DEFAULT_FILENAME_MAX_LENGTH, DEFAULT_PROJECT_DIR};
use crate::{QuireError, QuireResult};
use std::path::{Path, PathBuf};

/// Shortest name part a filename may be truncated to. Anything smaller makes most titles
/// unrecognisable on disk.
const MIN_FILENAME_MAX_LENGTH: usize = 8;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    project_dir: PathBuf,
    filename_max_length: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(project_dir: PathBuf, filename_max_length: usize) -> QuireResult<Self> {
        if filename_max_length < MIN_FILENAME_MAX_LENGTH {
            return Err(QuireError::InvalidInput(format!(
                "filename_max_length must be at least {}, got {}",
                MIN_FILENAME_MAX_LENGTH, filename_max_length
            )));
        }

        Ok(Self {
            project_dir,
            filename_max_length,
        })
    }

    /// Directory that relative scene paths and new scenes are resolved against.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Maximum length, in bytes, of the name part of a scene filename.
    pub fn filename_max_length(&self) -> usize {
        self.filename_max_length
    }

    /// Resolve `path` against the project directory unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from(DEFAULT_PROJECT_DIR),
            filename_max_length: DEFAULT_FILENAME_MAX_LENGTH,
        }
    }
}

/// Resolve the project directory from an optional override value.
///
/// An override must name an existing directory. Without one the current directory is used.
pub fn project_dir_from_env_value(value: Option<String>) -> QuireResult<PathBuf> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if dir.is_dir() {
                Ok(dir)
            } else {
                Err(QuireError::InvalidInput(format!(
                    "QUIRE_PROJECT_DIR is not a directory: {}",
                    dir.display()
                )))
            }
        }
        None => Ok(PathBuf::from(DEFAULT_PROJECT_DIR)),
    }
}

/// Parse the filename length limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default limit.
pub fn filename_max_length_from_env_value(value: Option<String>) -> QuireResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                QuireError::InvalidInput(format!(
                    "QUIRE_FILENAME_MAX_LENGTH must be a positive integer, got {v:?}"
                ))
            })
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_FILENAME_MAX_LENGTH))
}
