//! Merge per-build task tables into one aggregate.
//!
//! Thread-safe for use with parallel iterators (rayon): each ingestion task
//! calls [`BuildAggregate::add_build`] once its source is fully parsed.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::PerfError;
use crate::matrix::{Matrix, MatrixRow};
use crate::summary::TaskSummary;

/// One build's tasks, keyed by task name in the order they were reported.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRecord {
    pub source_name: String,
    pub tasks: IndexMap<String, TaskSummary>,
}

impl BuildRecord {
    /// Build a record, keeping the first entry for any repeated task name.
    pub fn new(source_name: impl Into<String>, tasks: impl IntoIterator<Item = TaskSummary>) -> Self {
        let source_name = source_name.into();
        let mut by_name = IndexMap::new();

        for task in tasks {
            match by_name.entry(task.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(task);
                }
                Entry::Occupied(existing) => {
                    log::warn!(
                        "{source_name}: ignoring repeated task {} ({}ms, first was {}ms)",
                        task.name,
                        task.duration_ms,
                        existing.get().duration_ms
                    );
                }
            }
        }

        Self {
            source_name,
            tasks: by_name,
        }
    }
}

#[derive(Debug, Default)]
struct AggregateState {
    /// Union of task names across builds, in byte order
    known_task_names: BTreeSet<String>,
    /// Builds in registration order
    builds: IndexMap<String, BuildRecord>,
}

/// Task durations across every build being compared.
#[derive(Debug, Default)]
pub struct BuildAggregate {
    state: Mutex<AggregateState>,
}

impl BuildAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        // State is only mutated after validation, so a panicking holder
        // can't leave it half-written
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one build's tasks.
    ///
    /// Fails with [`PerfError::DuplicateSource`] if `source_name` is already
    /// registered. A repeated task name within `tasks` keeps its first entry.
    pub fn add_build(
        &self,
        source_name: impl Into<String>,
        tasks: impl IntoIterator<Item = TaskSummary>,
    ) -> anyhow::Result<()> {
        // Build the record outside the lock; only the merge is serialized
        let record = BuildRecord::new(source_name, tasks);

        let mut state = self.lock();
        let AggregateState {
            known_task_names,
            builds,
        } = &mut *state;

        match builds.entry(record.source_name.clone()) {
            Entry::Occupied(_) => {
                return Err(PerfError::DuplicateSource {
                    source_name: record.source_name,
                }
                .into());
            }
            Entry::Vacant(slot) => {
                let record = slot.insert(record);
                // Names go in only once their build exists, so a render can
                // never see a row without a column behind it
                known_task_names.extend(record.tasks.keys().cloned());
                log::info!(
                    "Added {} with {} tasks",
                    record.source_name,
                    record.tasks.len()
                );
            }
        }

        Ok(())
    }

    /// Number of registered builds.
    pub fn len(&self) -> usize {
        self.lock().builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build names in registration order.
    pub fn build_names(&self) -> Vec<String> {
        self.lock().builds.keys().cloned().collect()
    }

    /// Every task name seen in any build, sorted.
    pub fn known_task_names(&self) -> Vec<String> {
        self.lock().known_task_names.iter().cloned().collect()
    }

    /// A single task from a single build, if present.
    pub fn task(&self, source_name: &str, task_name: &str) -> Option<TaskSummary> {
        self.lock()
            .builds
            .get(source_name)
            .and_then(|build| build.tasks.get(task_name))
            .cloned()
    }

    /// Project the aggregate into a dense matrix.
    ///
    /// Rows follow sorted task names, columns follow build registration
    /// order. Rendering only reads, so repeated calls give identical results.
    pub fn render(&self) -> Matrix {
        let state = self.lock();

        let columns = state.builds.keys().cloned().collect();
        let rows = state
            .known_task_names
            .iter()
            .map(|name| MatrixRow {
                name: name.clone(),
                cells: state
                    .builds
                    .values()
                    .map(|build| build.tasks.get(name).map(|task| task.duration_ms))
                    .collect(),
            })
            .collect();

        Matrix { columns, rows }
    }
}
