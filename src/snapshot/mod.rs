//! Project snapshot documents.
//!
//! A snapshot is the serialized form of a project: one collection per
//! building-block kind, the simulations, and the observed data. Beyond names
//! and cross references the content of building blocks and charts is opaque
//! to this crate and is carried through verbatim.

mod collection;

pub use collection::{DuplicateNameError, Named, NamedCollection};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::building_block::BuildingBlockType;
use crate::project::DataRepository;

/// A building block as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlockSnapshot {
    pub name: String,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl BuildingBlockSnapshot {
    /// Creates a building block without properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
        }
    }

    /// Sets a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Named for BuildingBlockSnapshot {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Reference from a simulation to a building block of the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlockReference {
    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,
    pub name: String,
}

impl BuildingBlockReference {
    #[must_use]
    pub fn new(kind: BuildingBlockType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// A chart (analysis) defined on a simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Chart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Chart {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            properties: Map::new(),
        }
    }

    /// Sets a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A simulation as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationSnapshot {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub building_blocks: Vec<BuildingBlockReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub individual_analyses: Vec<Chart>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub population_analyses: Vec<Chart>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl SimulationSnapshot {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            building_blocks: Vec::new(),
            individual_analyses: Vec::new(),
            population_analyses: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Adds a building-block reference.
    #[must_use]
    pub fn using(mut self, kind: BuildingBlockType, name: impl Into<String>) -> Self {
        self.building_blocks.push(BuildingBlockReference::new(kind, name));
        self
    }

    /// All charts of the simulation: individual analyses, then population analyses.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.individual_analyses
            .iter()
            .chain(self.population_analyses.iter())
    }
}

impl Named for SimulationSnapshot {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A complete project snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectSnapshot {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub individuals: NamedCollection<BuildingBlockSnapshot>,
    pub populations: NamedCollection<BuildingBlockSnapshot>,
    pub compounds: NamedCollection<BuildingBlockSnapshot>,
    pub formulations: NamedCollection<BuildingBlockSnapshot>,
    pub protocols: NamedCollection<BuildingBlockSnapshot>,
    pub events: NamedCollection<BuildingBlockSnapshot>,
    pub observer_sets: NamedCollection<BuildingBlockSnapshot>,
    pub expression_profiles: NamedCollection<BuildingBlockSnapshot>,

    pub simulations: NamedCollection<SimulationSnapshot>,
    pub observed_data: NamedCollection<DataRepository>,
}

impl ProjectSnapshot {
    /// Creates an empty snapshot with the given project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The collection holding building blocks of the given kind.
    #[must_use]
    pub fn building_blocks(&self, kind: BuildingBlockType) -> &NamedCollection<BuildingBlockSnapshot> {
        match kind {
            BuildingBlockType::Individual => &self.individuals,
            BuildingBlockType::Population => &self.populations,
            BuildingBlockType::Compound => &self.compounds,
            BuildingBlockType::Formulation => &self.formulations,
            BuildingBlockType::Protocol => &self.protocols,
            BuildingBlockType::Event => &self.events,
            BuildingBlockType::ObserverSet => &self.observer_sets,
            BuildingBlockType::ExpressionProfile => &self.expression_profiles,
        }
    }

    /// Mutable access to the collection holding building blocks of the given kind.
    pub fn building_blocks_mut(
        &mut self,
        kind: BuildingBlockType,
    ) -> &mut NamedCollection<BuildingBlockSnapshot> {
        match kind {
            BuildingBlockType::Individual => &mut self.individuals,
            BuildingBlockType::Population => &mut self.populations,
            BuildingBlockType::Compound => &mut self.compounds,
            BuildingBlockType::Formulation => &mut self.formulations,
            BuildingBlockType::Protocol => &mut self.protocols,
            BuildingBlockType::Event => &mut self.events,
            BuildingBlockType::ObserverSet => &mut self.observer_sets,
            BuildingBlockType::ExpressionProfile => &mut self.expression_profiles,
        }
    }

    /// Looks up a building block by kind and name.
    #[must_use]
    pub fn building_block(&self, kind: BuildingBlockType, name: &str) -> Option<&BuildingBlockSnapshot> {
        self.building_blocks(kind).get(name)
    }

    /// Looks up a simulation by name.
    #[must_use]
    pub fn simulation(&self, name: &str) -> Option<&SimulationSnapshot> {
        self.simulations.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "Name": "toto",
        "Individuals": [{"Name": "Ind", "Species": "Human", "Age": 30}],
        "Compounds": [{"Name": "Midazolam"}],
        "Simulations": [{
            "Name": "S1",
            "BuildingBlocks": [{"Type": "Individual", "Name": "Ind"}],
            "IndividualAnalyses": [{"Name": "Chart 1", "Curves": []}],
            "PopulationAnalyses": [{"Name": "Boxplot"}],
            "Solver": "CVODE"
        }],
        "ObservedData": [{"Name": "OBS", "Columns": [{"Name": "Time", "Unit": "h", "Values": [0.0, 1.0]}]}]
    }"#;

    #[test]
    fn test_parse_snapshot_document() {
        let snapshot: ProjectSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.name, "toto");
        assert!(snapshot.populations.is_empty());

        let ind = snapshot.building_block(BuildingBlockType::Individual, "Ind").unwrap();
        assert_eq!(ind.properties["Species"], "Human");

        let sim = snapshot.simulation("S1").unwrap();
        assert_eq!(sim.building_blocks[0].kind, BuildingBlockType::Individual);
        assert_eq!(sim.properties["Solver"], "CVODE");
        let names: Vec<_> = sim.charts().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["Chart 1", "Boxplot"]);

        assert_eq!(snapshot.observed_data.get("OBS").unwrap().columns[0].values.len(), 2);
    }

    #[test]
    fn test_properties_survive_a_write_back() {
        let snapshot: ProjectSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["Individuals"][0]["Age"], 30);
        assert_eq!(json["Simulations"][0]["IndividualAnalyses"][0]["Curves"], serde_json::json!([]));
    }

    #[test]
    fn test_duplicate_building_block_names_are_rejected() {
        let json = r#"{"Name": "p", "Individuals": [{"Name": "Ind"}, {"Name": "Ind"}]}"#;
        let err = serde_json::from_str::<ProjectSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate name 'Ind'"));
    }

    #[test]
    fn test_collection_per_kind() {
        let mut snapshot = ProjectSnapshot::new("p");
        snapshot
            .building_blocks_mut(BuildingBlockType::Protocol)
            .push(BuildingBlockSnapshot::new("iv"))
            .unwrap();
        assert_eq!(snapshot.protocols.len(), 1);
        assert!(snapshot.building_block(BuildingBlockType::Event, "iv").is_none());
    }
}
