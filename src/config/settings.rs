//! Configuration settings for the flip board solver

use crate::solver::{LinearOptions, SearchBudget};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub verify: bool,
    pub pivot_fallback: bool,
    pub backtrack: BacktrackConfig,
}

/// Solving strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Gauss-Jordan elimination over GF(2)
    Linear,
    /// Exhaustive depth-first search
    Backtrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktrackConfig {
    pub max_nodes: u64,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
    /// Level to solve; the highest stored level when absent
    #[serde(default)]
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Store the solution string back into the puzzle file
    pub write_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                strategy: Strategy::Linear,
                verify: true,
                pivot_fallback: true,
                backtrack: BacktrackConfig {
                    max_nodes: 50_000_000,
                    timeout_seconds: 60,
                },
            },
            input: InputConfig {
                puzzle_file: PathBuf::from("puzzle.json"),
                level: None,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                write_back: true,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.backtrack.max_nodes == 0 {
            anyhow::bail!("Backtracking node budget must be positive");
        }

        if self.solver.backtrack.timeout_seconds == 0 {
            anyhow::bail!("Backtracking timeout must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(strategy) = cli_overrides.strategy {
            self.solver.strategy = strategy;
        }
        if let Some(max_nodes) = cli_overrides.max_nodes {
            self.solver.backtrack.max_nodes = max_nodes;
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.backtrack.timeout_seconds = timeout_seconds;
        }
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(level) = cli_overrides.level {
            self.input.level = Some(level);
        }
        if cli_overrides.no_write {
            self.output.write_back = false;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

impl SolverConfig {
    pub fn linear_options(&self) -> LinearOptions {
        LinearOptions {
            verify: self.verify,
            pivot_fallback: self.pivot_fallback,
        }
    }

    pub fn search_budget(&self) -> SearchBudget {
        SearchBudget {
            max_nodes: self.backtrack.max_nodes,
            timeout: Some(Duration::from_secs(self.backtrack.timeout_seconds)),
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub strategy: Option<Strategy>,
    pub max_nodes: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub puzzle_file: Option<PathBuf>,
    pub level: Option<u32>,
    pub no_write: bool,
    pub format: Option<OutputFormat>,
}
