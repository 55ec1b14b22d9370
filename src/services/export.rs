//! File-backed exporters for simulations and observed data.

use std::fs;
use std::path::Path;

use crate::paths;
use crate::project::{DataRepository, Project, Simulation};
use crate::services::traits::{
    DataRepositoryTask, ExportRunOptions, ExportSimulationRunner, ServiceError, SimulationExport,
};

/// File extension of the CSV observed-data export.
const CSV_EXTENSION: &str = ".csv";

fn csv_error(path: &Path, e: csv::Error) -> ServiceError {
    ServiceError::ExportFailed(format!("{}: {e}", path.display()))
}

/// Writes each simulation into `<OutputFolder>/<SimulationName>/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderSimulationExporter;

impl FolderSimulationExporter {
    fn write_json(simulation: &Simulation, folder: &Path) -> Result<(), ServiceError> {
        let path = folder.join(format!("{}.json", simulation.name));
        let json = serde_json::to_string_pretty(simulation)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| ServiceError::io(&path, e))
    }

    fn write_building_blocks_csv(simulation: &Simulation, folder: &Path) -> Result<(), ServiceError> {
        let path = folder.join(format!("{}_BuildingBlocks.csv", simulation.name));
        let mut writer = csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;
        writer
            .write_record(["Type", "Name"])
            .map_err(|e| csv_error(&path, e))?;
        for bb in &simulation.building_blocks {
            writer
                .write_record([bb.kind.as_str(), bb.name.as_str()])
                .map_err(|e| csv_error(&path, e))?;
        }
        writer.flush().map_err(|e| ServiceError::io(&path, e))
    }
}

impl ExportSimulationRunner for FolderSimulationExporter {
    fn export_simulations_in(
        &self,
        project: &Project,
        options: &ExportRunOptions,
    ) -> Result<Vec<SimulationExport>, ServiceError> {
        let mut exports = Vec::with_capacity(project.simulations.len());
        for simulation in &project.simulations {
            if !paths::is_plain_name(&simulation.name) {
                return Err(ServiceError::InvalidDocument(format!(
                    "simulation name '{}' cannot be used as a folder name",
                    simulation.name
                )));
            }
            let folder = options.output_folder.join(&simulation.name);
            fs::create_dir_all(&folder).map_err(|e| ServiceError::io(&folder, e))?;

            if options.export_mode.includes_json() {
                Self::write_json(simulation, &folder)?;
            }
            if options.export_mode.includes_csv() {
                Self::write_building_blocks_csv(simulation, &folder)?;
            }

            tracing::debug!(
                simulation = %simulation.name,
                folder = %folder.display(),
                "exported simulation"
            );
            exports.push(SimulationExport {
                project_name: project.name.clone(),
                simulation_name: simulation.name.clone(),
                simulation_folder: folder,
            });
        }
        Ok(exports)
    }
}

/// Writes observed data as a CSV table, one column per data column.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDataRepositoryTask;

impl DataRepositoryTask for CsvDataRepositoryTask {
    fn file_extension(&self) -> &str {
        CSV_EXTENSION
    }

    fn export_to_spreadsheet(&self, data: &DataRepository, path: &Path) -> Result<(), ServiceError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        writer
            .write_record(data.columns.iter().map(|c| c.header()))
            .map_err(|e| csv_error(path, e))?;

        for row in 0..data.row_count() {
            let record = data.columns.iter().map(|c| {
                c.values
                    .get(row)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            });
            writer.write_record(record).map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| ServiceError::io(path, e))
    }
}
