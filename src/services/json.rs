//! JSON file serializer, snapshot loader and the typed serializer helpers.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::building_block::BuildingBlockType;
use crate::project::{BuildingBlock, Project, Simulation};
use crate::services::traits::{JsonSerializer, ServiceError, SnapshotTask};
use crate::snapshot::{ProjectSnapshot, SimulationSnapshot};

fn read_file(path: &Path) -> Result<String, ServiceError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ServiceError::NotFound(path.to_path_buf()),
        _ => ServiceError::io(path, e),
    })
}

/// Serialize `value` and hand it to `serializer` for writing to `path`.
///
/// # Errors
/// - `Serialization`: `value` cannot be represented as JSON
/// - whatever the serializer reports while writing
pub fn serialize_to<T: Serialize>(
    serializer: &dyn JsonSerializer,
    value: &T,
    path: &Path,
) -> Result<(), ServiceError> {
    let document = serde_json::to_value(value)
        .map_err(|e| ServiceError::Serialization(format!("serialize {}: {e}", path.display())))?;
    serializer.serialize(&document, path)
}

/// Read the document at `path` through `serializer` and convert it to `T`.
///
/// # Errors
/// - whatever the serializer reports while reading
/// - `Serialization`: the document does not match `T`
pub fn deserialize_from<T: DeserializeOwned>(
    serializer: &dyn JsonSerializer,
    path: &Path,
) -> Result<T, ServiceError> {
    let document = serializer.deserialize(path)?;
    serde_json::from_value(document)
        .map_err(|e| ServiceError::Serialization(format!("deserialize {}: {e}", path.display())))
}

/// Pretty-printed JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileSerializer;

impl JsonSerializer for JsonFileSerializer {
    fn serialize(&self, document: &serde_json::Value, path: &Path) -> Result<(), ServiceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ServiceError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| ServiceError::io(path, e))
    }

    fn deserialize(&self, path: &Path) -> Result<serde_json::Value, ServiceError> {
        let text = read_file(path)?;
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::Serialization(format!("{}: {e}", path.display())))
    }
}

/// Loads snapshot documents from JSON files and materializes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSnapshotTask;

impl JsonSnapshotTask {
    fn materialize_simulation(
        snapshot: &ProjectSnapshot,
        simulation: &SimulationSnapshot,
    ) -> Result<Simulation, ServiceError> {
        let building_blocks = simulation
            .building_blocks
            .iter()
            .map(|reference| {
                snapshot
                    .building_block(reference.kind, &reference.name)
                    .map(|bb| BuildingBlock {
                        kind: reference.kind,
                        name: bb.name.clone(),
                        properties: bb.properties.clone(),
                    })
                    .ok_or_else(|| {
                        ServiceError::InvalidDocument(format!(
                            "simulation '{}' uses {} '{}' which is not defined in project '{}'",
                            simulation.name, reference.kind, reference.name, snapshot.name
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Simulation {
            name: simulation.name.clone(),
            building_blocks,
            charts: simulation.charts().cloned().collect(),
            properties: simulation.properties.clone(),
        })
    }
}

impl SnapshotTask for JsonSnapshotTask {
    fn load_snapshot_from_file(&self, path: &Path) -> Result<ProjectSnapshot, ServiceError> {
        let text = read_file(path)?;
        let snapshot: ProjectSnapshot = serde_json::from_str(&text)
            .map_err(|e| ServiceError::Serialization(format!("{}: {e}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            project = %snapshot.name,
            simulations = snapshot.simulations.len(),
            "loaded project snapshot"
        );
        Ok(snapshot)
    }

    fn load_project_from_snapshot(&self, snapshot: &ProjectSnapshot) -> Result<Project, ServiceError> {
        if snapshot.name.trim().is_empty() {
            return Err(ServiceError::InvalidDocument(
                "project snapshot has no name".to_string(),
            ));
        }

        let mut project = Project::new(snapshot.name.clone());
        for simulation in &snapshot.simulations {
            let simulation = Self::materialize_simulation(snapshot, simulation)?;
            project
                .add_simulation(simulation)
                .map_err(|e| ServiceError::InvalidDocument(e.to_string()))?;
        }
        for data in &snapshot.observed_data {
            project
                .add_observed_data(data.clone())
                .map_err(|e| ServiceError::InvalidDocument(e.to_string()))?;
        }

        let building_blocks: usize = BuildingBlockType::ALL
            .iter()
            .map(|kind| snapshot.building_blocks(*kind).len())
            .sum();
        tracing::debug!(
            project = %project.name,
            building_blocks,
            simulations = project.simulations.len(),
            observed_data = project.observed_data.len(),
            "materialized project"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::DataRepository;
    use crate::snapshot::{BuildingBlockSnapshot, Chart};

    fn snapshot() -> ProjectSnapshot {
        let mut snapshot = ProjectSnapshot::new("toto");
        snapshot
            .individuals
            .push(BuildingBlockSnapshot::new("Ind").with_property("Age", 30))
            .unwrap();
        let mut sim = SimulationSnapshot::new("S1").using(BuildingBlockType::Individual, "Ind");
        sim.individual_analyses.push(Chart::named("Chart"));
        snapshot.simulations.push(sim).unwrap();
        snapshot.observed_data.push(DataRepository::new("OBS")).unwrap();
        snapshot
    }

    #[test]
    fn test_materialize_resolves_building_blocks() {
        let project = JsonSnapshotTask.load_project_from_snapshot(&snapshot()).unwrap();
        assert_eq!(project.name, "toto");

        let sim = project.simulations.get("S1").unwrap();
        let ind = sim.building_block(BuildingBlockType::Individual, "Ind").unwrap();
        assert_eq!(ind.properties["Age"], 30);
        assert_eq!(sim.charts.len(), 1);
        assert!(project.observed_data.contains("OBS"));
    }

    #[test]
    fn test_materialize_fails_on_dangling_reference() {
        let mut snapshot = snapshot();
        snapshot
            .simulations
            .push(SimulationSnapshot::new("S2").using(BuildingBlockType::Compound, "Missing"))
            .unwrap();

        let err = JsonSnapshotTask.load_project_from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDocument(_)));
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_materialize_rejects_unnamed_project() {
        for name in ["", "   "] {
            let mut snapshot = snapshot();
            snapshot.name = name.to_string();

            let err = JsonSnapshotTask.load_project_from_snapshot(&snapshot).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidDocument(_)));
        }
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonSnapshotTask
            .load_snapshot_from_file(&dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_load_snapshot_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonSnapshotTask.load_snapshot_from_file(&path).unwrap_err();
        assert!(matches!(err, ServiceError::Serialization(_)));
    }

    #[test]
    fn test_serializer_writes_into_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp").join("mapping.json");

        serialize_to(&JsonFileSerializer, &snapshot(), &path).unwrap();
        let back: ProjectSnapshot = deserialize_from(&JsonFileSerializer, &path).unwrap();
        assert_eq!(back, snapshot());
    }
}
