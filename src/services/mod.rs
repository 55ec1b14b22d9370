//! Collaborator capabilities of the qualification runner.
//!
//! The traits define what the runner needs from the outside world.
//! Default file-backed implementations live alongside them and are what the
//! binary wires together.

mod export;
mod fs;
pub mod json;
mod traits;

pub use export::{CsvDataRepositoryTask, FolderSimulationExporter};
pub use fs::LocalFileSystem;
pub use json::{JsonFileSerializer, JsonSnapshotTask};
pub use traits::{
    DataRepositoryTask, ExportRunOptions, ExportSimulationRunner, FileSystem, JsonSerializer,
    ServiceError, SimulationExport, SimulationExportMode, SnapshotTask, XLSX_EXTENSION,
};
