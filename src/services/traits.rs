//! Capability traits consumed by the qualification runner.
//!
//! The runner never touches snapshots, exporters, serializers or the
//! filesystem directly. Each capability is a trait so that:
//! - the binary wires file-backed implementations
//! - tests substitute deterministic recording fakes

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::{DataRepository, Project};
use crate::snapshot::ProjectSnapshot;

/// File extension of spreadsheet exports.
pub const XLSX_EXTENSION: &str = ".xlsx";

/// Errors reported by a capability implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A document parsed but is inconsistent.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An exporter failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl ServiceError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Loads project snapshots and materializes them into projects.
pub trait SnapshotTask: Send + Sync {
    /// Load a project snapshot document from a file.
    ///
    /// # Errors
    /// - `NotFound`: the file does not exist
    /// - `Serialization`: the file is not a valid snapshot document
    fn load_snapshot_from_file(&self, path: &Path) -> Result<ProjectSnapshot, ServiceError>;

    /// Materialize a snapshot into an in-memory project.
    ///
    /// # Errors
    /// - `InvalidDocument`: the snapshot references entities it does not define
    fn load_project_from_snapshot(&self, snapshot: &ProjectSnapshot) -> Result<Project, ServiceError>;
}

/// Which files a simulation export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationExportMode {
    /// Simulation definition as JSON
    Json,
    /// Tabular summary as CSV
    Csv,
    /// Every supported format
    All,
}

impl SimulationExportMode {
    /// Returns true if the mode includes JSON output.
    #[must_use]
    pub const fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::All)
    }

    /// Returns true if the mode includes CSV output.
    #[must_use]
    pub const fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }
}

/// Options handed to the simulation exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRunOptions {
    /// Folder under which one sub-folder per simulation is created.
    pub output_folder: PathBuf,
    pub export_mode: SimulationExportMode,
}

/// Record of one exported simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationExport {
    pub project_name: String,
    pub simulation_name: String,
    /// Folder holding the simulation's exported files.
    pub simulation_folder: PathBuf,
}

/// Exports the simulations of a project.
pub trait ExportSimulationRunner: Send + Sync {
    /// Export every simulation of `project`, one record per simulation in project order.
    ///
    /// # Errors
    /// - `Io` / `ExportFailed`: a simulation could not be written
    fn export_simulations_in(
        &self,
        project: &Project,
        options: &ExportRunOptions,
    ) -> Result<Vec<SimulationExport>, ServiceError>;
}

/// Exports observed data to spreadsheet-like files.
pub trait DataRepositoryTask: Send + Sync {
    /// Extension (with leading dot) of the files written by [`Self::export_to_spreadsheet`].
    fn file_extension(&self) -> &str {
        XLSX_EXTENSION
    }

    /// Write `data` to the file at `path`.
    ///
    /// # Errors
    /// - `Io` / `ExportFailed`: the file could not be written
    fn export_to_spreadsheet(&self, data: &DataRepository, path: &Path) -> Result<(), ServiceError>;
}

/// Reads and writes JSON documents.
///
/// Documents cross the trait as [`serde_json::Value`] to keep it object safe;
/// the typed helpers in [`crate::services::json`] do the conversion.
pub trait JsonSerializer: Send + Sync {
    /// Write a document to `path`.
    ///
    /// # Errors
    /// - `Io`: the file could not be written
    fn serialize(&self, document: &serde_json::Value, path: &Path) -> Result<(), ServiceError>;

    /// Read a document from `path`.
    ///
    /// # Errors
    /// - `NotFound`: the file does not exist
    /// - `Serialization`: the file is not valid JSON
    fn deserialize(&self, path: &Path) -> Result<serde_json::Value, ServiceError>;
}

/// Directory and file primitives.
pub trait FileSystem: Send + Sync {
    /// Returns true if `path` is an existing file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Returns true if `path` is an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents.
    ///
    /// # Errors
    /// Propagates the underlying I/O error.
    fn create_directory(&self, path: &Path) -> io::Result<()>;

    /// Delete `path` and everything below it.
    ///
    /// # Errors
    /// Propagates the underlying I/O error.
    fn delete_directory(&self, path: &Path) -> io::Result<()>;
}
