//! Fan out over input sources and merge their tasks into one aggregate.
//!
//! Each source is read and parsed independently on the rayon pool; the only
//! shared state is the [`BuildAggregate`] the results are merged into. The
//! first failing source aborts the whole run.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::aggregate::BuildAggregate;
use crate::config::Config;
use crate::path::build_name;
use crate::shell_exec::stream_stdout;
use crate::summary::{TaskSummary, scan_reader};
use crate::trace::{self, TRACE_SUFFIX};

/// One build's worth of input, classified once up front.
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Source {
    /// A saved build log holding a text performance summary
    Text(PathBuf),
    /// An exported trace capture (`*.trace.jsonl`)
    Trace(PathBuf),
    /// A build command whose stdout holds a text performance summary
    ExternalTool(String),
}

impl Source {
    /// Classify an input file by its name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_trace = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(TRACE_SUFFIX));

        if is_trace {
            Source::Trace(path)
        } else {
            Source::Text(path)
        }
    }

    /// The build's column name in the output.
    pub fn name(&self) -> String {
        match self {
            Source::Text(path) => build_name(path, None),
            Source::Trace(path) => build_name(path, Some(TRACE_SUFFIX)),
            Source::ExternalTool(command) => command.clone(),
        }
    }

    /// Read the source to completion and return its tasks.
    pub fn collect_tasks(&self, config: &Config) -> anyhow::Result<Vec<TaskSummary>> {
        let name = self.name();
        log::debug!("Reading {} source {name}", self.as_ref());

        match self {
            Source::Text(path) => scan_reader(open(path)?, &name),
            Source::Trace(path) => {
                let events = trace::parse_reader(open(path)?, &name)?;
                let totals = trace::correlate(&events, &config.trace.provider);
                if totals.is_empty() {
                    log::warn!(
                        "{name}: no {} task or target spans found",
                        config.trace.provider
                    );
                }
                Ok(trace::into_task_summaries(totals))
            }
            Source::ExternalTool(command) => stream_stdout(command, |stdout| {
                scan_reader(stdout, &name)
            }),
        }
    }
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Ingest every source concurrently into a fresh aggregate.
///
/// Builds are registered as their sources finish, so column order follows
/// completion order.
pub fn ingest_all(sources: &[Source], config: &Config) -> anyhow::Result<BuildAggregate> {
    log::info!(
        "Aggregating {}",
        sources
            .iter()
            .map(Source::name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let aggregate = BuildAggregate::new();

    sources.par_iter().try_for_each(|source| {
        let tasks = source.collect_tasks(config)?;
        aggregate.add_build(source.name(), tasks)
    })?;

    Ok(aggregate)
}
