//! Cross Flip Solver
//!
//! Finds a set of cell presses that turns every lit cell of a flip board off.
//! Pressing a cell toggles it and every toggleable cell in its row and column
//! up to the nearest wall. Boards are solved either as a GF(2) linear system
//! or by exhaustive backtracking.

pub mod board;
pub mod config;
pub mod error;
pub mod puzzle;
pub mod solver;
pub mod utils;

pub use board::{Board, Cell, PressSet};
pub use config::{Settings, Strategy};
pub use error::{FlipError, FlipResult};
pub use puzzle::{FlipProblem, PuzzleStore, SolveReport};
pub use solver::{solve, FlipSolver};

use anyhow::Result;

/// Solve the configured level of the puzzle store and write the answer back
pub fn solve_latest(settings: Settings) -> Result<SolveReport> {
    let problem = FlipProblem::new(settings)?;
    let report = problem.solve()?;
    if problem.settings().output.write_back {
        problem.write_back(&report)?;
    }
    Ok(report)
}
