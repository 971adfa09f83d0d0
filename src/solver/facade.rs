//! Single entry point dispatching to the configured strategy

use super::backtrack::{BacktrackSolver, SearchBudget};
use super::linear::{LinearOptions, LinearSolver};
use crate::board::{Board, PressSet};
use crate::config::{SolverConfig, Strategy};
use crate::error::FlipResult;
use tracing::info;

/// A solver for one of the two strategies
#[derive(Debug, Clone)]
pub enum FlipSolver {
    Linear(LinearSolver),
    Backtrack(BacktrackSolver),
}

impl FlipSolver {
    /// Solver for `strategy` with default options
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Linear => FlipSolver::Linear(LinearSolver::new()),
            Strategy::Backtrack => FlipSolver::Backtrack(BacktrackSolver::default()),
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        match config.strategy {
            Strategy::Linear => FlipSolver::Linear(LinearSolver::with_options(config.linear_options())),
            Strategy::Backtrack => FlipSolver::Backtrack(BacktrackSolver::new(config.search_budget())),
        }
    }

    pub fn linear(options: LinearOptions) -> Self {
        FlipSolver::Linear(LinearSolver::with_options(options))
    }

    pub fn backtrack(budget: SearchBudget) -> Self {
        FlipSolver::Backtrack(BacktrackSolver::new(budget))
    }

    /// Presses that clear `board`. The caller's board is never modified.
    pub fn solve(&self, board: &Board) -> FlipResult<PressSet> {
        let result = match self {
            FlipSolver::Linear(solver) => solver.solve(board),
            FlipSolver::Backtrack(solver) => solver.solve(board),
        };
        match &result {
            Ok(presses) => info!(
                strategy = ?self.strategy(),
                rows = board.rows(),
                cols = board.cols(),
                presses = presses.len(),
                "Board solved"
            ),
            Err(err) => info!(strategy = ?self.strategy(), error = %err, "Board not solved"),
        }
        result
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            FlipSolver::Linear(_) => Strategy::Linear,
            FlipSolver::Backtrack(_) => Strategy::Backtrack,
        }
    }
}

impl Default for FlipSolver {
    fn default() -> Self {
        FlipSolver::new(Strategy::Linear)
    }
}

/// Solve `board` with `strategy` using default options
pub fn solve(board: &Board, strategy: Strategy) -> FlipResult<PressSet> {
    FlipSolver::new(strategy).solve(board)
}
