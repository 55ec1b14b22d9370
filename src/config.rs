//! Qualification configuration.
//!
//! The configuration is a JSON document with PascalCase fields. Every field
//! may be absent when parsing; required fields are enforced by
//! [`crate::validation`] so that a missing field is reported as such rather
//! than as a parse error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::building_block::BuildingBlockType;

/// Folder name used for observed data when the configuration leaves it empty.
pub const DEFAULT_OBSERVED_DATA_FOLDER: &str = "ObservedData";

/// Replace a building block of the project with the one of another snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlockSwap {
    pub name: String,

    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,

    /// Snapshot file holding the replacement.
    pub snapshot_file: PathBuf,
}

/// Request to surface the charts of a simulation in a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationPlot {
    pub section_id: u32,
    /// Name of the simulation in the project.
    pub simulation: String,
}

/// Configuration of one qualification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QualificationConfiguration {
    /// Root of everything exported by the run.
    pub output_folder: PathBuf,

    /// Snapshot of the project to qualify.
    pub snapshot_file: PathBuf,

    /// Where the mapping consumed by the report generator is written.
    pub mapping_file: PathBuf,

    pub report_configuration_file: PathBuf,

    pub observed_data_folder: PathBuf,

    pub building_blocks: Vec<BuildingBlockSwap>,

    pub simulation_plots: Vec<SimulationPlot>,
}

impl QualificationConfiguration {
    /// Folder receiving observed-data exports.
    ///
    /// Falls back to `<OutputFolder>/ObservedData` when not configured.
    #[must_use]
    pub fn observed_data_folder(&self) -> PathBuf {
        if self.observed_data_folder.as_os_str().is_empty() {
            self.output_folder.join(DEFAULT_OBSERVED_DATA_FOLDER)
        } else {
            self.observed_data_folder.clone()
        }
    }
}

/// How a batch run was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Path of the configuration document.
    pub configuration_file: PathBuf,

    /// Stop once the configuration, snapshot and swaps are known to be valid.
    pub validate: bool,
}

impl RunOptions {
    #[must_use]
    pub fn new(configuration_file: impl AsRef<Path>) -> Self {
        Self {
            configuration_file: configuration_file.as_ref().to_path_buf(),
            validate: false,
        }
    }

    /// Switch to validation mode.
    #[must_use]
    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_configuration() {
        let json = r#"{
            "OutputFolder": "c:/tests/outputs/",
            "SnapshotFile": "c:/tests/inputs/toto.json",
            "MappingFile": "c:/tests/temp/toto_Mapping.json",
            "ReportConfigurationFile": "c:/tests/outputs/report_config.json",
            "ObservedDataFolder": "c:/tests/outputs/OBS_DATA_FOLDER",
            "BuildingBlocks": [{"Name": "Ind", "Type": "Individual", "SnapshotFile": "ref.json"}],
            "SimulationPlots": [{"SectionId": 2, "Simulation": "S1"}]
        }"#;

        let config: QualificationConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_folder, PathBuf::from("c:/tests/outputs/"));
        assert_eq!(config.building_blocks[0].kind, BuildingBlockType::Individual);
        assert_eq!(config.building_blocks[0].snapshot_file, PathBuf::from("ref.json"));
        assert_eq!(config.simulation_plots[0].section_id, 2);
        assert_eq!(
            config.observed_data_folder(),
            PathBuf::from("c:/tests/outputs/OBS_DATA_FOLDER")
        );
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let config: QualificationConfiguration =
            serde_json::from_str(r#"{"OutputFolder": "out"}"#).unwrap();
        assert!(config.building_blocks.is_empty());
        assert!(config.simulation_plots.is_empty());
        assert!(config.mapping_file.as_os_str().is_empty());
        assert_eq!(config.observed_data_folder(), Path::new("out").join("ObservedData"));
    }

    #[test]
    fn test_unknown_building_block_type_is_rejected() {
        let json = r#"{"BuildingBlocks": [{"Name": "x", "Type": "Organism", "SnapshotFile": "f"}]}"#;
        assert!(serde_json::from_str::<QualificationConfiguration>(json).is_err());
    }

    #[test]
    fn test_run_options_builder() {
        let options = RunOptions::new("config.json").validate_only();
        assert!(options.validate);
        assert_eq!(options.configuration_file, PathBuf::from("config.json"));
    }
}
