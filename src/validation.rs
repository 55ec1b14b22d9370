//! Pre-flight configuration checks.
//!
//! Runs before anything is loaded, exported, created or deleted. Checks are
//! performed in a fixed order and the first failure is returned.

use std::path::Path;

use crate::config::QualificationConfiguration;
use crate::error::{QualificationResult, QualificationRunError};
use crate::services::json::deserialize_from;
use crate::services::{FileSystem, JsonSerializer};

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty()
}

/// Read the configuration document at `path`.
///
/// # Errors
/// - `ConfigurationFileNotFound`: `path` is not an existing file
/// - `ConfigurationUnreadable`: the document is not a valid configuration
pub fn load_configuration(
    fs: &dyn FileSystem,
    serializer: &dyn JsonSerializer,
    path: &Path,
) -> QualificationResult<QualificationConfiguration> {
    if is_blank(path) || !fs.file_exists(path) {
        return Err(QualificationRunError::ConfigurationFileNotFound {
            path: path.to_path_buf(),
        });
    }

    deserialize_from(serializer, path).map_err(|source| QualificationRunError::ConfigurationUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Check that `config` describes a run that can be attempted.
///
/// # Errors
/// - `MissingConfigurationField`: `OutputFolder`, `MappingFile` or `SnapshotFile` is empty
/// - `SnapshotFileNotFound`: `SnapshotFile` is not an existing file
pub fn validate_configuration(
    fs: &dyn FileSystem,
    config: &QualificationConfiguration,
) -> QualificationResult<()> {
    if is_blank(&config.output_folder) {
        return Err(QualificationRunError::missing_field("OutputFolder"));
    }

    if is_blank(&config.mapping_file) {
        return Err(QualificationRunError::missing_field("MappingFile"));
    }

    if is_blank(&config.snapshot_file) {
        return Err(QualificationRunError::missing_field("SnapshotFile"));
    }

    if !fs.file_exists(&config.snapshot_file) {
        return Err(QualificationRunError::SnapshotFileNotFound {
            path: config.snapshot_file.clone(),
        });
    }

    Ok(())
}
