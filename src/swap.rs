//! Building-block swaps.
//!
//! Each swap replaces one named building block of the base project snapshot
//! with the building block of the same kind and name taken from another
//! snapshot. Swaps are applied in configuration order; the replacement keeps
//! the position of the replaced entry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::config::BuildingBlockSwap;
use crate::error::{QualificationResult, QualificationRunError};
use crate::services::SnapshotTask;
use crate::snapshot::ProjectSnapshot;

/// Applies [`BuildingBlockSwap`]s to a project snapshot.
pub struct BuildingBlockSwapper<'a> {
    snapshot_task: &'a dyn SnapshotTask,
    references: HashMap<PathBuf, ProjectSnapshot>,
}

impl<'a> BuildingBlockSwapper<'a> {
    #[must_use]
    pub fn new(snapshot_task: &'a dyn SnapshotTask) -> Self {
        Self {
            snapshot_task,
            references: HashMap::new(),
        }
    }

    /// Apply every swap, in order. Returns the number of swapped building blocks.
    ///
    /// # Errors
    /// The first swap that cannot be applied aborts the whole sequence:
    /// - `SwapSnapshotUnreadable`: the reference snapshot cannot be loaded
    /// - `BuildingBlockNotFoundInReference`: it has no building block of that kind and name
    /// - `BuildingBlockNotFoundInProject`: the base project has none either
    pub fn swap_all(
        &mut self,
        project: &mut ProjectSnapshot,
        swaps: &[BuildingBlockSwap],
    ) -> QualificationResult<usize> {
        for swap in swaps {
            self.swap(project, swap)?;
        }
        Ok(swaps.len())
    }

    /// Apply a single swap.
    ///
    /// # Errors
    /// See [`Self::swap_all`].
    pub fn swap(
        &mut self,
        project: &mut ProjectSnapshot,
        swap: &BuildingBlockSwap,
    ) -> QualificationResult<()> {
        let replacement = self
            .reference_snapshot(swap)?
            .building_block(swap.kind, &swap.name)
            .cloned()
            .ok_or_else(|| QualificationRunError::BuildingBlockNotFoundInReference {
                kind: swap.kind,
                name: swap.name.clone(),
                path: swap.snapshot_file.clone(),
            })?;

        let project_name = project.name.clone();
        project
            .building_blocks_mut(swap.kind)
            .replace(replacement)
            .map_err(|_| QualificationRunError::BuildingBlockNotFoundInProject {
                kind: swap.kind,
                name: swap.name.clone(),
                project: project_name,
            })?;

        debug!(
            kind = %swap.kind,
            name = %swap.name,
            source = %swap.snapshot_file.display(),
            "swapped building block"
        );
        Ok(())
    }

    fn reference_snapshot(&mut self, swap: &BuildingBlockSwap) -> QualificationResult<&ProjectSnapshot> {
        let snapshot = match self.references.entry(swap.snapshot_file.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let loaded = self
                    .snapshot_task
                    .load_snapshot_from_file(&swap.snapshot_file)
                    .map_err(|source| QualificationRunError::SwapSnapshotUnreadable {
                        kind: swap.kind,
                        name: swap.name.clone(),
                        path: swap.snapshot_file.clone(),
                        source,
                    })?;
                entry.insert(loaded)
            }
        };
        Ok(snapshot)
    }
}
