//! Section scanner for text performance summaries.
//!
//! The scanner is a small state machine over a line stream:
//!
//! 1. Skip lines until one is exactly a section header.
//! 2. Consume at most one blank separator line.
//! 3. Parse records until a line doesn't parse or the stream ends.
//! 4. Re-examine the line that ended the section as a possible header.
//!
//! A stream with no header at all is a [`PerfError::MissingSection`]. A stream
//! that ends right after a header is [`PerfError::Truncated`]. Ending
//! mid-section is normal.

use std::io::{self, BufRead};

use anyhow::Context;

use super::parse::{EvaluationSummary, TaskSummary};
use crate::error::PerfError;

pub const EVALUATION_HEADER: &str = "Project Evaluation Performance Summary:";
pub const TASK_HEADER: &str = "Task Performance Summary:";

/// Name of the synthetic task holding the summed evaluation time.
pub const EVALUATION_TASK: &str = "Evaluation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Evaluation,
    Task,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            EVALUATION_HEADER => Some(Section::Evaluation),
            TASK_HEADER => Some(Section::Task),
            _ => None,
        }
    }

    fn header(self) -> &'static str {
        match self {
            Section::Evaluation => EVALUATION_HEADER,
            Section::Task => TASK_HEADER,
        }
    }
}

/// Records collected so far from one source.
#[derive(Default)]
struct Collected {
    evaluations: Vec<EvaluationSummary>,
    tasks: Vec<TaskSummary>,
}

impl Collected {
    /// Parse one line as a record of `section`'s kind. Returns false when the
    /// line doesn't fit, which ends the section.
    fn push_line(&mut self, section: Section, line: &str) -> bool {
        match section {
            Section::Evaluation => EvaluationSummary::try_parse(line)
                .map(|eval| self.evaluations.push(eval))
                .is_some(),
            Section::Task => TaskSummary::try_parse(line)
                .map(|task| self.tasks.push(task))
                .is_some(),
        }
    }

    /// Final task list, with evaluation time folded into one leading entry.
    fn into_tasks(self) -> Vec<TaskSummary> {
        if self.evaluations.is_empty() {
            return self.tasks;
        }

        let duration_ms = self.evaluations.iter().map(|e| e.duration_ms).sum();
        let calls = self.evaluations.iter().map(|e| e.invocations).sum();

        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(TaskSummary::new(EVALUATION_TASK, duration_ms).with_invocations(calls));
        tasks.extend(self.tasks);
        tasks
    }
}

/// Scan a line stream for summary sections and return the build's tasks.
///
/// `source_name` only labels errors and log output.
pub fn scan_lines<I>(lines: I, source_name: &str) -> anyhow::Result<Vec<TaskSummary>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut lines = lines.into_iter();
    let mut next_line = || -> anyhow::Result<Option<String>> {
        lines
            .next()
            .transpose()
            .with_context(|| format!("Failed to read {source_name}"))
    };

    let mut collected = Collected::default();
    let mut seen: Vec<Section> = Vec::new();
    // A line that ended the previous section and still needs a header check
    let mut carried: Option<String> = None;

    loop {
        let line = match carried.take() {
            Some(line) => line,
            None => match next_line()? {
                Some(line) => line,
                None => break,
            },
        };

        let Some(section) = Section::from_header(&line) else {
            continue;
        };
        if seen.contains(&section) {
            log::debug!("{source_name}: ignoring repeated '{}'", section.header());
            continue;
        }
        seen.push(section);

        let truncated = || PerfError::Truncated {
            source_name: source_name.to_string(),
            marker: section.header().to_string(),
        };

        let Some(mut current) = next_line()? else {
            return Err(truncated().into());
        };
        if current.trim().is_empty() {
            let Some(line) = next_line()? else {
                return Err(truncated().into());
            };
            current = line;
        }

        loop {
            if !collected.push_line(section, &current) {
                carried = Some(current);
                break;
            }
            match next_line()? {
                Some(line) => current = line,
                None => break,
            }
        }
    }

    if seen.is_empty() {
        return Err(PerfError::MissingSection {
            source_name: source_name.to_string(),
            marker: TASK_HEADER.to_string(),
        }
        .into());
    }

    log::debug!(
        "{source_name}: {} tasks, {} project evaluations",
        collected.tasks.len(),
        collected.evaluations.len()
    );

    Ok(collected.into_tasks())
}

/// Scan a buffered reader, e.g. an open log file or a child's stdout.
///
/// Bytes that aren't valid UTF-8 are replaced rather than rejected: build
/// output is often in a legacy code page.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    source_name: &str,
) -> anyhow::Result<Vec<TaskSummary>> {
    let lines = std::iter::from_fn(move || read_line_lossy(&mut reader).transpose());
    scan_lines(lines, source_name)
}

/// Read one line without its `\n` or `\r\n` terminator. `None` at end of input.
fn read_line_lossy<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Scan text already in memory.
pub fn scan_str(text: &str, source_name: &str) -> anyhow::Result<Vec<TaskSummary>> {
    scan_lines(text.lines().map(|line| Ok(line.to_string())), source_name)
}
