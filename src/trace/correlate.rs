//! Reconstruct task and target durations from start/stop events.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::parse::TraceEvent;
use crate::summary::TaskSummary;

/// Which kind of span an event opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum SpanKind {
    Task,
    Target,
}

impl SpanKind {
    /// Payload field carrying the span's name.
    fn name_field(self) -> &'static str {
        match self {
            SpanKind::Task => "taskName",
            SpanKind::Target => "targetName",
        }
    }
}

/// Total time spent in one named task or target across a whole capture.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanTotal {
    pub kind: SpanKind,
    pub name: String,
    /// Summed elapsed time. Negative totals mean the capture's clock (or its
    /// pairing) is off; they're kept so callers can see it.
    pub elapsed_ms: f64,
    /// Number of start/stop pairs that contributed
    pub occurrences: u64,
}

/// Open spans keyed by `(kind, name, thread)`.
#[derive(Default)]
struct CorrelationState<'a> {
    pending_starts: HashMap<(SpanKind, &'a str, i64), f64>,
    totals: IndexMap<(SpanKind, &'a str), (f64, u64)>,
}

impl<'a> CorrelationState<'a> {
    fn start(&mut self, kind: SpanKind, name: &'a str, thread_id: i64, timestamp_ms: f64) {
        // The engine may restart a span on the same thread; the newer start wins
        self.pending_starts
            .insert((kind, name, thread_id), timestamp_ms);
    }

    fn stop(&mut self, kind: SpanKind, name: &'a str, thread_id: i64, timestamp_ms: f64) {
        // A stop without a start is a span cut off at the capture boundary
        let Some(started) = self.pending_starts.remove(&(kind, name, thread_id)) else {
            log::trace!("unmatched {kind} stop for {name} on thread {thread_id}");
            return;
        };

        let total = self.totals.entry((kind, name)).or_insert((0.0, 0));
        total.0 += timestamp_ms - started;
        total.1 += 1;
    }

    fn into_totals(self) -> Vec<SpanTotal> {
        let mut totals: Vec<SpanTotal> = self
            .totals
            .into_iter()
            .map(|((kind, name), (elapsed_ms, occurrences))| SpanTotal {
                kind,
                name: name.to_string(),
                elapsed_ms,
                occurrences,
            })
            .collect();

        // Stable sort: equal totals keep first-seen order
        totals.sort_by(|a, b| b.elapsed_ms.total_cmp(&a.elapsed_ms));
        totals
    }
}

/// Identify a build-engine span event: its kind and the span's name.
fn classify<'a>(event: &'a TraceEvent, provider: &str) -> Option<(SpanKind, &'a str)> {
    if event.provider_name != provider {
        return None;
    }

    let kind = if event.event_name.contains("Target") {
        SpanKind::Target
    } else if event.event_name.contains("ExecuteTask") {
        SpanKind::Task
    } else {
        return None;
    };

    match event.payload_str(kind.name_field()) {
        Some(name) if !name.is_empty() => Some((kind, name)),
        _ => {
            log::debug!(
                "{} event at {}ms has no usable {}",
                event.event_name,
                event.timestamp_ms,
                kind.name_field()
            );
            None
        }
    }
}

/// Pair start and stop events and total elapsed time per task/target name.
///
/// Events may arrive in any order relative to each other; only the pairing
/// of a stop with the latest earlier-seen start on the same thread matters.
/// Results are sorted by descending total time.
pub fn correlate(events: &[TraceEvent], provider: &str) -> Vec<SpanTotal> {
    let mut state = CorrelationState::default();

    for event in events {
        let Some((kind, name)) = classify(event, provider) else {
            continue;
        };

        if event.event_name.contains("Start") {
            state.start(kind, name, event.thread_id, event.timestamp_ms);
        } else {
            state.stop(kind, name, event.thread_id, event.timestamp_ms);
        }
    }

    state.into_totals()
}

/// Convert correlated totals into a build's task list.
///
/// Names are reported without their kind, so they line up with text
/// summaries of the same build. A task and a target sharing a name are
/// merged into one entry holding their combined time.
pub fn into_task_summaries(totals: Vec<SpanTotal>) -> Vec<TaskSummary> {
    let mut by_name: IndexMap<String, (f64, u64)> = IndexMap::new();
    for total in totals {
        let merged = by_name.entry(total.name).or_insert((0.0, 0));
        merged.0 += total.elapsed_ms;
        merged.1 += total.occurrences;
    }

    let mut summaries: Vec<TaskSummary> = by_name
        .into_iter()
        .map(|(name, (elapsed_ms, occurrences))| {
            TaskSummary::new(name, elapsed_ms).with_invocations(occurrences)
        })
        .collect();

    // Merging can reorder totals; keep descending time, ties in first-seen order
    summaries.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms));
    summaries
}
