//! # Qualification runner
//!
//! Exports everything a qualification report needs from a project snapshot:
//! every simulation, every piece of observed data, and a mapping that binds
//! each exported artifact and each requested plot to an identifier the
//! report generator understands.
//!
//! ## Core Concepts
//!
//! - **Configuration**: output folder, snapshot, mapping file, swaps and plots of one run
//! - **Snapshot**: serialized project with name-keyed building blocks and simulations
//! - **Swap**: replacement of a building block by its namesake from another snapshot
//! - **Mapping**: the manifest consumed by the report generator
//!
//! ## Usage
//!
//! ```rust,no_run
//! use qualification::{QualificationRunner, RunOptions};
//!
//! let runner = QualificationRunner::default();
//! let report = runner.run_batch(&RunOptions::new("qualification.json"))?;
//! println!("exported {} simulations", report.exported_simulations);
//! # Ok::<(), qualification::QualificationRunError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod building_block;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod paths;
pub mod project;
pub mod runner;
pub mod services;
pub mod snapshot;
pub mod swap;
pub mod validation;

// Re-export primary types at crate root for convenience
pub use building_block::BuildingBlockType;
pub use config::{BuildingBlockSwap, QualificationConfiguration, RunOptions, SimulationPlot};
pub use error::{QualificationResult, QualificationRunError};
pub use mapping::{ObservedDataMapping, PlotMapping, QualificationMapping, SimulationMapping};
pub use project::{BuildingBlock, DataColumn, DataRepository, Project, Simulation};
pub use runner::{QualificationRunner, RunMode, RunReport};
pub use services::{
    DataRepositoryTask, ExportRunOptions, ExportSimulationRunner, FileSystem, JsonSerializer,
    ServiceError, SimulationExport, SimulationExportMode, SnapshotTask,
};
pub use snapshot::{
    BuildingBlockReference, BuildingBlockSnapshot, Chart, Named, NamedCollection, ProjectSnapshot,
    SimulationSnapshot,
};
pub use swap::BuildingBlockSwapper;
