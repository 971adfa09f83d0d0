//! Error types for board parsing and solving

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the board model and the solvers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlipError {
    #[error("malformed board: {reason}")]
    MalformedBoard { reason: String },

    #[error("coordinates ({row}, {col}) out of bounds for {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The board cannot be cleared by pressing each cell at most once.
    #[error("no solution found: board cannot be cleared")]
    NoSolutionFound,

    /// Diagonal elimination produced a vector that does not satisfy `M·x = b`.
    #[error("elimination result failed verification: {mismatched} of {equations} equations unsatisfied")]
    Unverified { mismatched: usize, equations: usize },

    #[error("search budget exhausted after {explored} nodes")]
    BudgetExhausted { explored: u64 },

    #[error("search timed out after {:.3}s", elapsed.as_secs_f64())]
    TimedOut { elapsed: Duration },
}

impl FlipError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FlipError::MalformedBoard {
            reason: reason.into(),
        }
    }

    /// True for outcomes that mean "this board has no answer" rather than a fault
    pub fn is_unsolvable(&self) -> bool {
        matches!(self, FlipError::NoSolutionFound)
    }
}

pub type FlipResult<T> = std::result::Result<T, FlipError>;
