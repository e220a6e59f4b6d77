//! perfsum error types and formatting
//!
//! **`PerfError`** is a typed enum for domain errors that can be pattern-matched
//! and tested. Use `.into()` to convert to `anyhow::Error` while preserving the
//! type for pattern matching and styled display in main.rs.
//!
//! Per-line parse failures are not errors: a line that doesn't match a record
//! shape just ends the current summary section.

use std::path::PathBuf;

use crate::path::format_path_for_display;
use crate::styling::{ERROR, ERROR_BOLD, ERROR_EMOJI, HINT, HINT_BOLD, HINT_EMOJI};

/// Domain errors for ingestion and aggregation.
///
/// Every variant is fatal to the run: a partial aggregate would silently
/// under-report a build.
///
/// # Usage
///
/// ```ignore
/// return Err(PerfError::DuplicateSource { source_name: name.into() }.into());
///
/// if let Some(PerfError::MissingSection { source_name, .. }) = err.downcast_ref() {
///     println!("{source_name} has no summary");
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum PerfError {
    // -------------------------------------------------------------------------
    // Text summary errors
    // -------------------------------------------------------------------------
    /// No section header was found before end of input
    #[error("{source_name} has no '{marker}' section")]
    MissingSection {
        source_name: String,
        marker: String,
    },

    /// Input ended right after a section header
    #[error("{source_name} ended prematurely after '{marker}'")]
    Truncated {
        source_name: String,
        marker: String,
    },

    // -------------------------------------------------------------------------
    // Trace errors
    // -------------------------------------------------------------------------
    /// A trace line is not a valid event record
    #[error("{source_name}:{line}: malformed trace event: {message}")]
    MalformedTrace {
        source_name: String,
        line: usize,
        message: String,
    },

    // -------------------------------------------------------------------------
    // Aggregation errors
    // -------------------------------------------------------------------------
    /// Two inputs resolved to the same build name
    #[error("build '{source_name}' was added twice")]
    DuplicateSource { source_name: String },

    // -------------------------------------------------------------------------
    // Environment errors
    // -------------------------------------------------------------------------
    /// External build command could not be run
    #[error("failed to run '{command}'")]
    ToolFailed { command: String, message: String },

    /// Config file could not be read or parsed
    #[error("invalid config at {}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PerfError {
    /// Returns the styled error message with emoji and colors.
    pub fn styled(&self) -> String {
        match self {
            PerfError::MissingSection {
                source_name,
                marker,
            } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}No performance summary in {ERROR_BOLD}{source_name}{ERROR_BOLD:#}{ERROR:#}\n\n{HINT_EMOJI} {HINT}Expected a line reading {HINT_BOLD}{marker}{HINT_BOLD:#}{HINT}; build with -clp:PerformanceSummary{HINT:#}"
                )
            }

            PerfError::Truncated {
                source_name,
                marker,
            } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}{ERROR_BOLD}{source_name}{ERROR_BOLD:#}{ERROR} ended prematurely after {ERROR_BOLD}{marker}{ERROR_BOLD:#}{ERROR:#}"
                )
            }

            PerfError::MalformedTrace {
                source_name,
                line,
                message,
            } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}Malformed trace event at {ERROR_BOLD}{source_name}:{line}{ERROR_BOLD:#}{ERROR}: {message}{ERROR:#}"
                )
            }

            PerfError::DuplicateSource { source_name } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}Build {ERROR_BOLD}{source_name}{ERROR_BOLD:#}{ERROR} was given more than once{ERROR:#}\n\n{HINT_EMOJI} {HINT}Each input must have a distinct file name{HINT:#}"
                )
            }

            PerfError::ToolFailed { command, message } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}Failed to run {ERROR_BOLD}{command}{ERROR_BOLD:#}{ERROR}: {message}{ERROR:#}"
                )
            }

            PerfError::Config { path, message } => {
                format!(
                    "{ERROR_EMOJI} {ERROR}Invalid config at {ERROR_BOLD}{}{ERROR_BOLD:#}{ERROR:#}\n\n{HINT_EMOJI} {HINT}{message}{HINT:#}",
                    format_path_for_display(path)
                )
            }
        }
    }
}

/// Check if an error is a specific PerfError variant
pub fn is_perf_error<F>(err: &anyhow::Error, predicate: F) -> bool
where
    F: FnOnce(&PerfError) -> bool,
{
    err.downcast_ref::<PerfError>().is_some_and(predicate)
}

// =============================================================================
// Tests
// =============================================================================
