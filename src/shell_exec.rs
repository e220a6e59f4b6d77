//! Run an external build command and stream its standard output.
//!
//! The command string is handed to the platform shell:
//! - Unix: `sh -c`
//! - Windows: `cmd.exe /C`, where build tools are usually set up
//!
//! Only stdout is captured; stderr passes through to the terminal so build
//! progress and errors stay visible.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::PerfError;

/// The platform shell that interprets `--run` command strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildShell {
    pub program: &'static str,
    /// Flag that makes `program` run the next argument as a command line
    pub command_flag: &'static str,
}

impl BuildShell {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd.exe",
                command_flag: "/C",
            }
        } else {
            Self {
                program: "sh",
                command_flag: "-c",
            }
        }
    }

    fn command(self, build_command: &str) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.arg(self.command_flag).arg(build_command);
        cmd
    }
}

/// Run `command` and hand its stdout to `consume` as a line stream.
///
/// `consume` sees output as it is produced, not after the command exits.
/// A non-zero exit is logged rather than failing: a build with errors still
/// prints its performance summary, and `consume` decides whether the output
/// was usable.
pub fn stream_stdout<T>(
    command: &str,
    consume: impl FnOnce(&mut dyn BufRead) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let shell = BuildShell::current();
    log::debug!("$ {command} (via {})", shell.program);

    let started = Instant::now();
    let mut child = shell
        .command(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| PerfError::ToolFailed {
            command: command.to_string(),
            message: e.to_string(),
        })?;

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(PerfError::ToolFailed {
            command: command.to_string(),
            message: "stdout was not captured".to_string(),
        }
        .into());
    };

    let mut reader = BufReader::new(stdout);
    let result = consume(&mut reader);
    drop(reader);

    if result.is_err() {
        // Don't leave the build running once its output is known to be unusable
        let _ = child.kill();
    }

    let status = child.wait().map_err(|e| PerfError::ToolFailed {
        command: command.to_string(),
        message: e.to_string(),
    })?;

    log::debug!(
        "[perfsum-trace] cmd={command:?} dur={:.1}ms ok={}",
        started.elapsed().as_secs_f64() * 1000.0,
        status.success()
    );
    if !status.success() {
        log::warn!("'{command}' exited with {status}");
    }

    result
}
