//! Configuration management for the flip board solver

pub mod settings;

pub use settings::{
    BacktrackConfig, CliOverrides, InputConfig, OutputConfig, OutputFormat, Settings, SolverConfig,
    Strategy,
};
