//! Compare build-tool task timings across builds.
//!
//! Each input (a saved build log, an exported trace capture, or a build
//! command to run) yields one build's per-task durations. The builds are
//! merged into a [`aggregate::BuildAggregate`] and rendered as a CSV with one
//! row per task and one column per build.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod matrix;
pub mod path;
pub mod shell_exec;
pub mod styling;
pub mod summary;
pub mod trace;

pub use aggregate::BuildAggregate;
pub use error::PerfError;
pub use ingest::{Source, ingest_all};
