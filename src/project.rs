//! In-memory project model.
//!
//! A [`Project`] is what a snapshot becomes once materialized: simulations
//! own the building blocks they were built from, so whatever a swap put into
//! the snapshot travels with the simulation into the export.

use serde::{Deserialize, Serialize};

use crate::building_block::BuildingBlockType;
use crate::snapshot::{Chart, Named, NamedCollection};

/// One column of observed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataColumn {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub values: Vec<f64>,
}

impl DataColumn {
    /// Creates a column with the given values.
    #[must_use]
    pub fn new(name: impl Into<String>, unit: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(str::to_string),
            values,
        }
    }

    /// Header label used by tabular exports, e.g. `Time [h]`.
    #[must_use]
    pub fn header(&self) -> String {
        match &self.unit {
            Some(unit) if !unit.is_empty() => format!("{} [{unit}]", self.name),
            _ => self.name.clone(),
        }
    }
}

/// A named table of observed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataRepository {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<DataColumn>,
}

impl DataRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn with_column(mut self, column: DataColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Number of rows, i.e. the length of the longest column.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }
}

impl Named for DataRepository {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A building block resolved into a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlock {
    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,

    pub name: String,

    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A materialized simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Simulation {
    pub name: String,

    #[serde(default)]
    pub building_blocks: Vec<BuildingBlock>,

    #[serde(default)]
    pub charts: Vec<Chart>,

    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Simulation {
    /// Creates a simulation without building blocks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            building_blocks: Vec::new(),
            charts: Vec::new(),
            properties: serde_json::Map::new(),
        }
    }

    /// Returns the building block of the given kind and name used by this simulation.
    #[must_use]
    pub fn building_block(&self, kind: BuildingBlockType, name: &str) -> Option<&BuildingBlock> {
        self.building_blocks
            .iter()
            .find(|bb| bb.kind == kind && bb.name == name)
    }
}

impl Named for Simulation {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A materialized project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub simulations: NamedCollection<Simulation>,
    pub observed_data: NamedCollection<DataRepository>,
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds observed data to the project.
    ///
    /// # Errors
    /// Fails when observed data with the same name already exists.
    pub fn add_observed_data(
        &mut self,
        data: DataRepository,
    ) -> Result<(), crate::snapshot::DuplicateNameError> {
        self.observed_data.push(data)
    }

    /// Adds a simulation to the project.
    ///
    /// # Errors
    /// Fails when a simulation with the same name already exists.
    pub fn add_simulation(
        &mut self,
        simulation: Simulation,
    ) -> Result<(), crate::snapshot::DuplicateNameError> {
        self.simulations.push(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_header_with_unit() {
        let column = DataColumn::new("Time", Some("h"), vec![0.0, 1.0]);
        assert_eq!(column.header(), "Time [h]");
        let column = DataColumn::new("Fraction", None, vec![]);
        assert_eq!(column.header(), "Fraction");
    }

    #[test]
    fn test_row_count_uses_longest_column() {
        let data = DataRepository::new("OBS")
            .with_column(DataColumn::new("Time", Some("h"), vec![0.0, 1.0, 2.0]))
            .with_column(DataColumn::new("Conc", Some("mg/l"), vec![5.0]));
        assert_eq!(data.row_count(), 3);
        assert_eq!(DataRepository::new("empty").row_count(), 0);
    }

    #[test]
    fn test_project_rejects_duplicate_observed_data() {
        let mut project = Project::new("P");
        project.add_observed_data(DataRepository::new("OBS")).unwrap();
        assert!(project.add_observed_data(DataRepository::new("OBS")).is_err());
    }
}
