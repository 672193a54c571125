//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the rest of the
//! program, so nothing reads process-wide environment variables mid-operation.

use crate::constants::DEFAULT_DATA_FILE;
use crate::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` if `data_file` is empty or names a directory.
    pub fn new(data_file: PathBuf) -> RegistryResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(RegistryError::InvalidInput(
                "data file path cannot be empty".into(),
            ));
        }
        if data_file.is_dir() {
            return Err(RegistryError::InvalidInput(format!(
                "data file path is a directory: {}",
                data_file.display()
            )));
        }

        Ok(Self { data_file })
    }

    /// Snapshot file the registry is loaded from and saved to.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

/// Resolve the data file from an optional override value.
///
/// `None` or a blank value falls back to [`DEFAULT_DATA_FILE`] in the working directory.
pub fn data_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
