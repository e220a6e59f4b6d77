//! Dense comparison table and its CSV form.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

/// Rows are task names (sorted), columns are builds (registration order).
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub name: String,
    /// One cell per column; `None` when the task didn't appear in that build
    pub cells: Vec<Option<f64>>,
}

impl Matrix {
    /// Render as CSV: a `Name` header, then one line per task.
    ///
    /// Absent tasks render as `0`, the same as a task that took no time.
    /// Durations use the shortest text that round-trips to the same `f64`.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        out.push_str("Name");
        for column in &self.columns {
            out.push(',');
            push_field(&mut out, column);
        }
        out.push('\n');

        for row in &self.rows {
            push_field(&mut out, &row.name);
            for cell in &row.cells {
                out.push(',');
                match cell {
                    Some(duration_ms) => write!(out, "{duration_ms}").unwrap(),
                    None => out.push('0'),
                }
            }
            out.push('\n');
        }

        out
    }

    /// Write the CSV to `path`, creating parent directories as needed.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, self.to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::info!(
            "Wrote {} tasks x {} builds to {}",
            self.rows.len(),
            self.columns.len(),
            path.display()
        );
        Ok(())
    }
}

/// Append a CSV field, quoting it when it holds a delimiter, quote, or line break.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
