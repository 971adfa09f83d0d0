//! Solve reports

use crate::board::{Board, PressSet};
use crate::config::Strategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of solving one board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Store level the board came from, if any
    pub level: Option<u32>,
    /// Board in comma-separated digit form
    pub board: String,
    pub rows: usize,
    pub cols: usize,
    pub strategy: Strategy,
    pub presses: PressSet,
    /// Fixed-length digit string, position `row * cols + col`
    pub solution: String,
    #[serde(skip)]
    pub solve_time: Duration,
}

impl SolveReport {
    pub fn new(level: Option<u32>, board: &Board, strategy: Strategy, presses: PressSet, solve_time: Duration) -> Self {
        let solution = presses.to_solution_string(board.rows(), board.cols());
        Self {
            level,
            board: board.encode(),
            rows: board.rows(),
            cols: board.cols(),
            strategy,
            presses,
            solution,
            solve_time,
        }
    }

    pub fn press_count(&self) -> usize {
        self.presses.len()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for SolveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            Some(level) => writeln!(f, "Level {} ({}x{})", level, self.rows, self.cols)?,
            None => writeln!(f, "Board ({}x{})", self.rows, self.cols)?,
        }
        writeln!(f, "  Strategy: {:?}", self.strategy)?;
        writeln!(f, "  Presses: {}", self.press_count())?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Solution: {}", self.solution)?;
        Ok(())
    }
}
