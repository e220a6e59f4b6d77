//! Configuration file support.
//!
//! Settings live in `.config/perfsum.toml` relative to the working directory,
//! or in a file named with `--config`. Command-line flags override them.
//!
//! ```toml
//! output = "perf.csv"
//!
//! [trace]
//! provider = "Microsoft-Build"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PerfError;
use crate::trace::DEFAULT_PROVIDER;

/// CSV path used when neither the command line nor the config names one.
pub const DEFAULT_OUTPUT: &str = "MSBuild_performance.csv";

/// Location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = ".config/perfsum.toml";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where to write the CSV
    pub output: Option<PathBuf>,

    pub trace: TraceConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Provider whose task and target events are correlated
    pub provider: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, PerfError> {
        let contents = std::fs::read_to_string(path).map_err(|e| PerfError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to read config file: {e}"),
        })?;

        toml::from_str(&contents).map_err(|e| PerfError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to parse TOML: {e}"),
        })
    }

    /// Load `.config/perfsum.toml` under `dir` if present, else defaults.
    pub fn discover(dir: &Path) -> Result<Self, PerfError> {
        let path = dir.join(CONFIG_PATH);
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        log::debug!("Loading config from {}", path.display());
        Self::load(&path)
    }

    /// The CSV destination: command line first, then config, then the default.
    pub fn output_path(&self, cli_output: Option<&Path>) -> PathBuf {
        cli_output
            .map(Path::to_path_buf)
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}
