//! Record-line parsing for text performance summaries.
//!
//! Both record shapes split into exactly five whitespace-separated tokens:
//!
//! ```text
//!        92 ms  WriteLinesToFile                         340 calls
//!   0     1     2                                        3   4
//! ```
//!
//! Parsing never fails loudly: a line that doesn't fit returns `None`, which
//! the scanner treats as the end of a section.

/// Time attributed to one named task or target within one build.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub name: String,
    pub duration_ms: f64,
    /// The `calls` column, when the record came from a text summary
    pub invocations: Option<u64>,
}

/// Time spent evaluating one project file before any task runs.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub project_path: String,
    pub duration_ms: f64,
    pub invocations: u64,
}

/// The five-token `<duration> ms <name> <count> calls` shape shared by both records.
struct RecordLine<'a> {
    duration_ms: f64,
    name: &'a str,
    count: u64,
}

fn split_record(line: &str) -> Option<RecordLine<'_>> {
    let mut tokens = line.split_whitespace();
    let (Some(duration), Some("ms"), Some(name), Some(count), Some("calls"), None) = (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) else {
        return None;
    };

    let duration_ms = duration
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)?;
    let count = count.parse::<u64>().ok()?;

    Some(RecordLine {
        duration_ms,
        name,
        count,
    })
}

impl TaskSummary {
    pub fn new(name: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            duration_ms,
            invocations: None,
        }
    }

    pub fn with_invocations(mut self, invocations: u64) -> Self {
        self.invocations = Some(invocations);
        self
    }

    /// Parse a task line such as `"  92 ms  WriteLinesToFile  340 calls"`.
    ///
    /// Rejects names containing `/` or `\`: those lines belong to the
    /// evaluation section, where the third column is a project path.
    pub fn try_parse(line: &str) -> Option<Self> {
        let record = split_record(line)?;
        if record.name.contains(['/', '\\']) {
            return None;
        }

        Some(Self::new(record.name, record.duration_ms).with_invocations(record.count))
    }
}

impl EvaluationSummary {
    /// Parse an evaluation line such as `"  438 ms  S:\src\A.csproj  3 calls"`.
    pub fn try_parse(line: &str) -> Option<Self> {
        let record = split_record(line)?;

        Some(Self {
            project_path: record.name.to_string(),
            duration_ms: record.duration_ms,
            invocations: record.count,
        })
    }
}
