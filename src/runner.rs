//! Qualification run orchestration.
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! configuration ──► snapshot ──► swaps ──► project ──┬─► (validate only) done
//!                                                    │
//!                   ┌────────────────────────────────┘
//!                   ▼
//!   output folders ──► simulations ──► observed data ──► plots ──► mapping file
//! ```
//!
//! Each stage either hands its result to the next one or returns the error
//! that ends the run. The mapping file is written last, so a failed run never
//! leaves a mapping behind.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use crate::config::{QualificationConfiguration, RunOptions, SimulationPlot};
use crate::error::{QualificationResult, QualificationRunError};
use crate::mapping::{ObservedDataMapping, PlotMapping, QualificationMapping, SimulationMapping};
use crate::paths;
use crate::project::Project;
use crate::services::json::serialize_to;
use crate::services::{
    CsvDataRepositoryTask, DataRepositoryTask, ExportRunOptions, ExportSimulationRunner,
    FileSystem, FolderSimulationExporter, JsonFileSerializer, JsonSerializer, JsonSnapshotTask,
    LocalFileSystem, ServiceError, SimulationExportMode, SnapshotTask,
};
use crate::snapshot::ProjectSnapshot;
use crate::swap::BuildingBlockSwapper;
use crate::validation;

/// How far a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunMode {
    /// Stopped once configuration, snapshot and swaps were checked.
    Validate,
    /// Exported everything and wrote the mapping.
    Export,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub project_name: String,
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub swapped_building_blocks: usize,
    pub exported_simulations: usize,
    pub exported_observed_data: usize,
    pub plots: usize,
}

impl RunReport {
    fn new(run_id: Uuid, project_name: &str, mode: RunMode, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            project_name: project_name.to_string(),
            mode,
            started_at,
            finished_at: started_at,
            swapped_building_blocks: 0,
            exported_simulations: 0,
            exported_observed_data: 0,
            plots: 0,
        }
    }

    fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Drives a qualification run against pluggable collaborators.
pub struct QualificationRunner {
    snapshot_task: Arc<dyn SnapshotTask>,
    json_serializer: Arc<dyn JsonSerializer>,
    export_simulation_runner: Arc<dyn ExportSimulationRunner>,
    data_repository_task: Arc<dyn DataRepositoryTask>,
    file_system: Arc<dyn FileSystem>,
}

impl Default for QualificationRunner {
    /// File-backed collaborators: JSON snapshots and documents, folder
    /// simulation exports, CSV observed data, local filesystem.
    fn default() -> Self {
        Self::new(
            Arc::new(JsonSnapshotTask),
            Arc::new(JsonFileSerializer),
            Arc::new(FolderSimulationExporter),
            Arc::new(CsvDataRepositoryTask),
            Arc::new(LocalFileSystem),
        )
    }
}

impl QualificationRunner {
    /// Create a runner from explicit collaborators.
    #[must_use]
    pub fn new(
        snapshot_task: Arc<dyn SnapshotTask>,
        json_serializer: Arc<dyn JsonSerializer>,
        export_simulation_runner: Arc<dyn ExportSimulationRunner>,
        data_repository_task: Arc<dyn DataRepositoryTask>,
        file_system: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            snapshot_task,
            json_serializer,
            export_simulation_runner,
            data_repository_task,
            file_system,
        }
    }

    /// Run the batch described by `options`.
    ///
    /// # Errors
    /// Any [`QualificationRunError`]; the run stops at the first one and no
    /// mapping file is written.
    pub fn run_batch(&self, options: &RunOptions) -> QualificationResult<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "qualification_run",
            %run_id,
            config = %options.configuration_file.display(),
            validate = options.validate
        );
        let _entered = span.enter();

        let started_at = Utc::now();
        info!("starting qualification run");

        match self.execute(options, run_id, started_at) {
            Ok(report) => {
                info!(
                    project = %report.project_name,
                    simulations = report.exported_simulations,
                    observed_data = report.exported_observed_data,
                    plots = report.plots,
                    elapsed_ms = report.duration().num_milliseconds(),
                    "qualification run finished"
                );
                Ok(report)
            }
            Err(e) => {
                error!(
                    error = %e,
                    validation = e.is_validation(),
                    swap = e.is_swap(),
                    "qualification run failed"
                );
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        options: &RunOptions,
        run_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> QualificationResult<RunReport> {
        let fs = self.file_system.as_ref();

        let config = validation::load_configuration(
            fs,
            self.json_serializer.as_ref(),
            &options.configuration_file,
        )?;
        validation::validate_configuration(fs, &config)?;
        info!(snapshot = %config.snapshot_file.display(), "configuration is valid");

        let mut snapshot = self.load_snapshot(&config)?;
        let swapped = BuildingBlockSwapper::new(self.snapshot_task.as_ref())
            .swap_all(&mut snapshot, &config.building_blocks)?;
        if swapped > 0 {
            info!(swapped, "building blocks swapped");
        }
        let project = self.load_project(&snapshot)?;
        check_output_names(&project)?;

        let mode = if options.validate {
            RunMode::Validate
        } else {
            RunMode::Export
        };
        let mut report = RunReport::new(run_id, &project.name, mode, started_at);
        report.swapped_building_blocks = swapped;

        if options.validate {
            info!(project = %project.name, "validation only, nothing exported");
            return Ok(report.finish());
        }

        let project_output = paths::project_output_path(&config.output_folder, &project.name);
        let observed_data_folder = config.observed_data_folder();
        paths::recreate_directory(fs, &project_output)?;
        paths::ensure_directory(fs, &observed_data_folder)?;
        info!(output = %project_output.display(), "output folders ready");

        let mut mapping = QualificationMapping::new();
        report.exported_simulations =
            self.export_simulations(&project, &project_output, &config, &mut mapping)?;
        report.exported_observed_data =
            self.export_observed_data(&project, &observed_data_folder, &config, &mut mapping)?;
        report.plots = resolve_plots(&snapshot, &project, &config.simulation_plots, &mut mapping)?;

        serialize_to(self.json_serializer.as_ref(), &mapping, &config.mapping_file).map_err(
            |source| QualificationRunError::MappingWrite {
                path: config.mapping_file.clone(),
                source,
            },
        )?;
        info!(mapping = %config.mapping_file.display(), "mapping written");

        Ok(report.finish())
    }

    fn load_snapshot(&self, config: &QualificationConfiguration) -> QualificationResult<ProjectSnapshot> {
        self.snapshot_task
            .load_snapshot_from_file(&config.snapshot_file)
            .map_err(|source| QualificationRunError::SnapshotUnreadable {
                path: config.snapshot_file.clone(),
                source,
            })
    }

    fn load_project(&self, snapshot: &ProjectSnapshot) -> QualificationResult<Project> {
        let project = self
            .snapshot_task
            .load_project_from_snapshot(snapshot)
            .map_err(|source| QualificationRunError::ProjectMaterialization {
                project: snapshot.name.clone(),
                source,
            })?;

        // An unnamed project would resolve its output folder to the output root.
        if project.name.trim().is_empty() {
            return Err(QualificationRunError::ProjectMaterialization {
                project: snapshot.name.clone(),
                source: ServiceError::InvalidDocument("project has no name".to_string()),
            });
        }
        Ok(project)
    }

    fn export_simulations(
        &self,
        project: &Project,
        project_output: &Path,
        config: &QualificationConfiguration,
        mapping: &mut QualificationMapping,
    ) -> QualificationResult<usize> {
        let options = ExportRunOptions {
            output_folder: project_output.to_path_buf(),
            export_mode: SimulationExportMode::All,
        };
        let exports = self
            .export_simulation_runner
            .export_simulations_in(project, &options)
            .map_err(|source| QualificationRunError::SimulationExport {
                project: project.name.clone(),
                source,
            })?;

        for export in &exports {
            mapping.add_simulation_mapping(SimulationMapping {
                ref_project: export.project_name.clone(),
                ref_simulation: export.simulation_name.clone(),
                path: paths::relative_path(&export.simulation_folder, &config.output_folder),
            });
        }
        info!(count = exports.len(), "simulations exported");
        Ok(exports.len())
    }

    fn export_observed_data(
        &self,
        project: &Project,
        observed_data_folder: &Path,
        config: &QualificationConfiguration,
        mapping: &mut QualificationMapping,
    ) -> QualificationResult<usize> {
        let extension = self.data_repository_task.file_extension();
        for data in &project.observed_data {
            let path = paths::observed_data_file(observed_data_folder, &data.name, extension);
            self.data_repository_task
                .export_to_spreadsheet(data, &path)
                .map_err(|source| QualificationRunError::ObservedDataExport {
                    name: data.name.clone(),
                    path: path.clone(),
                    source,
                })?;
            debug!(name = %data.name, path = %path.display(), "exported observed data");

            mapping.add_observed_data_mapping(ObservedDataMapping {
                id: data.name.clone(),
                path: paths::relative_path(&path, &config.output_folder),
            });
        }
        info!(count = project.observed_data.len(), "observed data exported");
        Ok(project.observed_data.len())
    }
}

/// Reject project, simulation and observed-data names that would not stay
/// inside their output folder once joined to it.
fn check_output_names(project: &Project) -> QualificationResult<()> {
    let unsafe_name = |kind, name: &str| QualificationRunError::UnsafeOutputName {
        kind,
        name: name.to_string(),
        project: project.name.clone(),
    };

    if !paths::is_plain_name(&project.name) {
        return Err(unsafe_name("Project", &project.name));
    }
    if let Some(simulation) = project
        .simulations
        .iter()
        .find(|s| !paths::is_plain_name(&s.name))
    {
        return Err(unsafe_name("Simulation", &simulation.name));
    }
    if let Some(data) = project
        .observed_data
        .iter()
        .find(|d| !paths::is_plain_name(&d.name))
    {
        return Err(unsafe_name("Observed data", &data.name));
    }
    Ok(())
}

/// Add one plot mapping per chart of every simulation named by `plots`.
fn resolve_plots(
    snapshot: &ProjectSnapshot,
    project: &Project,
    plots: &[SimulationPlot],
    mapping: &mut QualificationMapping,
) -> QualificationResult<usize> {
    let mut count = 0;
    for plot in plots {
        let simulation = snapshot.simulation(&plot.simulation).ok_or_else(|| {
            QualificationRunError::PlotSimulationNotFound {
                simulation: plot.simulation.clone(),
                section_id: plot.section_id,
                project: project.name.clone(),
            }
        })?;

        for chart in simulation.charts() {
            mapping.add_plot_mapping(PlotMapping {
                section_id: plot.section_id,
                ref_project: project.name.clone(),
                ref_simulation: simulation.name.clone(),
                plot: chart.clone(),
            });
            count += 1;
        }
        debug!(simulation = %simulation.name, section = plot.section_id, "resolved plot");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Chart, SimulationSnapshot};

    fn snapshot() -> ProjectSnapshot {
        let mut snapshot = ProjectSnapshot::new("toto");
        let mut sim = SimulationSnapshot::new("Sim");
        sim.individual_analyses.push(Chart::named("individual"));
        sim.population_analyses.push(Chart::named("population"));
        snapshot.simulations.push(sim).unwrap();
        snapshot.simulations.push(SimulationSnapshot::new("Empty")).unwrap();
        snapshot
    }

    fn plot(section_id: u32, simulation: &str) -> SimulationPlot {
        SimulationPlot {
            section_id,
            simulation: simulation.to_string(),
        }
    }

    #[test]
    fn test_resolve_plots_emits_one_entry_per_chart_in_configured_order() {
        let mut mapping = QualificationMapping::new();
        let count = resolve_plots(
            &snapshot(),
            &Project::new("toto"),
            &[plot(3, "Sim"), plot(1, "Empty"), plot(1, "Sim")],
            &mut mapping,
        )
        .unwrap();

        assert_eq!(count, 4);
        let sections: Vec<_> = mapping.plots.iter().map(|p| p.section_id).collect();
        assert_eq!(sections, vec![3, 3, 1, 1]);
        assert_eq!(mapping.plots[1].plot.name.as_deref(), Some("population"));
        assert_eq!(mapping.plots[0].ref_project, "toto");
    }

    #[test]
    fn test_resolve_plots_unknown_simulation() {
        let mut mapping = QualificationMapping::new();
        let err = resolve_plots(
            &snapshot(),
            &Project::new("toto"),
            &[plot(2, "SimDoesNotExist")],
            &mut mapping,
        )
        .unwrap_err();
        assert!(matches!(err, QualificationRunError::PlotSimulationNotFound { section_id: 2, .. }));
    }

    #[test]
    fn test_report_duration() {
        let started = Utc::now();
        let report = RunReport::new(Uuid::new_v4(), "toto", RunMode::Export, started).finish();
        assert!(report.duration() >= chrono::Duration::zero());
        assert_eq!(report.project_name, "toto");
    }
}
