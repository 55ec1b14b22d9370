//! Qualification mapping.
//!
//! The mapping binds every exported artifact and every requested plot to an
//! identifier understood by the report generator. Entries keep the order in
//! which they were added; nothing is deduplicated.

use serde::{Deserialize, Serialize};

use crate::snapshot::Chart;

/// Where the export of one simulation was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationMapping {
    pub ref_project: String,
    pub ref_simulation: String,
    /// Simulation folder, relative to the output folder.
    pub path: String,
}

/// Where one observed-data item was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObservedDataMapping {
    pub id: String,
    /// Exported file, relative to the output folder.
    pub path: String,
}

/// A chart to render in a report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlotMapping {
    pub section_id: u32,
    pub ref_project: String,
    pub ref_simulation: String,
    pub plot: Chart,
}

/// The mapping document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QualificationMapping {
    pub simulation_mappings: Vec<SimulationMapping>,
    pub observed_data_mappings: Vec<ObservedDataMapping>,
    pub plots: Vec<PlotMapping>,
}

impl QualificationMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_simulation_mapping(&mut self, mapping: SimulationMapping) {
        self.simulation_mappings.push(mapping);
    }

    pub fn add_observed_data_mapping(&mut self, mapping: ObservedDataMapping) {
        self.observed_data_mappings.push(mapping);
    }

    pub fn add_plot_mapping(&mut self, mapping: PlotMapping) {
        self.plots.push(mapping);
    }

    /// Returns true if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simulation_mappings.is_empty()
            && self.observed_data_mappings.is_empty()
            && self.plots.is_empty()
    }
}
