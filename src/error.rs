//! Error types for the qualification runner.
//!
//! Every error in this crate is fatal to the run that raised it: a
//! qualification run either produces a complete mapping or none at all.
//! Variants only differ in the situation they describe.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::building_block::BuildingBlockType;
use crate::services::ServiceError;

/// The single error kind of a qualification run.
#[derive(Debug, Error)]
pub enum QualificationRunError {
    #[error("Configuration file '{}' does not exist", .path.display())]
    ConfigurationFileNotFound {
        path: PathBuf,
    },

    #[error("Configuration file '{}' could not be read: {source}", .path.display())]
    ConfigurationUnreadable {
        path: PathBuf,
        #[source]
        source: ServiceError,
    },

    #[error("Required configuration field '{field}' is not defined")]
    MissingConfigurationField {
        field: &'static str,
    },

    #[error("Project snapshot file '{}' does not exist", .path.display())]
    SnapshotFileNotFound {
        path: PathBuf,
    },

    #[error("Project snapshot could not be loaded from '{}': {source}", .path.display())]
    SnapshotUnreadable {
        path: PathBuf,
        #[source]
        source: ServiceError,
    },

    #[error("Project '{project}' could not be created from its snapshot: {source}")]
    ProjectMaterialization {
        project: String,
        #[source]
        source: ServiceError,
    },

    #[error("{kind} name '{name}' of project '{project}' cannot be used as an output name")]
    UnsafeOutputName {
        kind: &'static str,
        name: String,
        project: String,
    },

    #[error("Reference snapshot for {kind} '{name}' could not be loaded from '{}': {source}", .path.display())]
    SwapSnapshotUnreadable {
        kind: BuildingBlockType,
        name: String,
        path: PathBuf,
        #[source]
        source: ServiceError,
    },

    #[error("{kind} '{name}' was not found in reference snapshot '{}'", .path.display())]
    BuildingBlockNotFoundInReference {
        kind: BuildingBlockType,
        name: String,
        path: PathBuf,
    },

    #[error("{kind} '{name}' was not found in project '{project}'")]
    BuildingBlockNotFoundInProject {
        kind: BuildingBlockType,
        name: String,
        project: String,
    },

    #[error("Simulation '{simulation}' referenced by plot in section {section_id} was not found in project '{project}'")]
    PlotSimulationNotFound {
        simulation: String,
        section_id: u32,
        project: String,
    },

    #[error("Output directory '{}' could not be prepared: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Simulations of project '{project}' could not be exported: {source}")]
    SimulationExport {
        project: String,
        #[source]
        source: ServiceError,
    },

    #[error("Observed data '{name}' could not be exported to '{}': {source}", .path.display())]
    ObservedDataExport {
        name: String,
        path: PathBuf,
        #[source]
        source: ServiceError,
    },

    #[error("Mapping file '{}' could not be written: {source}", .path.display())]
    MappingWrite {
        path: PathBuf,
        #[source]
        source: ServiceError,
    },
}

impl QualificationRunError {
    /// Creates a missing-field error.
    #[must_use]
    pub const fn missing_field(field: &'static str) -> Self {
        Self::MissingConfigurationField { field }
    }

    /// Returns true if the run failed its pre-flight configuration checks.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationFileNotFound { .. }
                | Self::ConfigurationUnreadable { .. }
                | Self::MissingConfigurationField { .. }
                | Self::SnapshotFileNotFound { .. }
        )
    }

    /// Returns true if a building-block swap could not be applied.
    #[must_use]
    pub const fn is_swap(&self) -> bool {
        matches!(
            self,
            Self::SwapSnapshotUnreadable { .. }
                | Self::BuildingBlockNotFoundInReference { .. }
                | Self::BuildingBlockNotFoundInProject { .. }
        )
    }
}

/// Result type alias for qualification runs.
pub type QualificationResult<T> = Result<T, QualificationRunError>;
