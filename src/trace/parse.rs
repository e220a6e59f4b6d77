//! Parse exported trace events from JSON Lines.

use std::io::{self, BufRead};

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PerfError;

/// One event from a trace capture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    pub provider_name: String,
    pub event_name: String,
    pub thread_id: i64,
    /// Milliseconds relative to the start of the capture
    #[serde(rename = "timestampMS")]
    pub timestamp_ms: f64,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl TraceEvent {
    pub fn new(
        provider_name: impl Into<String>,
        event_name: impl Into<String>,
        thread_id: i64,
        timestamp_ms: f64,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            event_name: event_name.into(),
            thread_id,
            timestamp_ms,
            payload: Map::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// String payload field, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Parse a stream of JSON Lines into events.
///
/// Blank lines are skipped. Any other line that isn't a valid event fails the
/// whole capture: silently skipping it could hide half of a start/stop pair.
pub fn parse_lines<I>(lines: I, source_name: &str) -> anyhow::Result<Vec<TraceEvent>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut events = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.with_context(|| format!("Failed to read {source_name}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = serde_json::from_str::<TraceEvent>(trimmed).map_err(|e| {
            PerfError::MalformedTrace {
                source_name: source_name.to_string(),
                line: idx + 1,
                message: e.to_string(),
            }
        })?;
        events.push(event);
    }

    log::debug!("{source_name}: {} trace events", events.len());
    Ok(events)
}

pub fn parse_reader<R: BufRead>(reader: R, source_name: &str) -> anyhow::Result<Vec<TraceEvent>> {
    parse_lines(reader.lines(), source_name)
}

pub fn parse_str(text: &str, source_name: &str) -> anyhow::Result<Vec<TraceEvent>> {
    parse_lines(text.lines().map(|line| Ok(line.to_string())), source_name)
}
