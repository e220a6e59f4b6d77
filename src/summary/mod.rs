//! Text performance summary parsing.
//!
//! MSBuild prints a performance summary at the end of a build when run with
//! `-clp:PerformanceSummary`. This module extracts two of its sections:
//!
//! ```text
//! Project Evaluation Performance Summary:
//!       438 ms  S:\src\Tools\Tool.csproj   3 calls
//!
//! Task Performance Summary:
//!        92 ms  WriteLinesToFile         340 calls
//! ```
//!
//! [`parse`] recognizes single record lines; [`scan`] walks a line stream
//! section by section and folds evaluation time into one synthetic task.
//!
//! # Usage
//!
//! ```ignore
//! use perfsum::summary::scan_str;
//!
//! let tasks = scan_str(&log_output, "build.log")?;
//! ```

pub mod parse;
pub mod scan;

pub use parse::{EvaluationSummary, TaskSummary};
pub use scan::{EVALUATION_HEADER, EVALUATION_TASK, TASK_HEADER, scan_lines, scan_reader, scan_str};
