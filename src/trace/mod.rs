//! Build-engine trace capture parsing and span correlation.
//!
//! A trace capture is an exported event stream, one JSON object per line:
//!
//! ```text
//! {"providerName":"Microsoft-Build","eventName":"ExecuteTask/Start","threadId":7,"timestampMS":10.5,"payload":{"taskName":"Csc"}}
//! ```
//!
//! Durations aren't recorded directly. [`correlate`] pairs each stop event
//! with the latest start for the same task (or target) on the same thread,
//! then totals the elapsed time per name across the whole capture.
//!
//! Decompressing or converting the engine's native capture format happens
//! upstream; this module only reads the exported lines.
//!
//! # Usage
//!
//! ```ignore
//! use perfsum::trace::{correlate, parse_str, DEFAULT_PROVIDER};
//!
//! let events = parse_str(&capture, "nightly.trace.jsonl")?;
//! let totals = correlate(&events, DEFAULT_PROVIDER);
//! ```

pub mod correlate;
pub mod parse;

pub use correlate::{SpanKind, SpanTotal, correlate, into_task_summaries};
pub use parse::{TraceEvent, parse_lines, parse_reader, parse_str};

/// Provider name the build engine emits its events under.
pub const DEFAULT_PROVIDER: &str = "Microsoft-Build";

/// File suffix identifying trace captures among the inputs.
pub const TRACE_SUFFIX: &str = ".trace.jsonl";
