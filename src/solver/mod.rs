//! Solving engines for flip boards

pub mod backtrack;
pub mod facade;
pub mod linear;
pub mod packed;

pub use backtrack::{BacktrackSolver, SearchBudget, SearchOutcome, SearchStatistics};
pub use facade::{solve, FlipSolver};
pub use linear::{EliminationMethod, LinearOptions, LinearSolution, LinearSolver, LinearSystem};
pub use packed::PackedMatrix;
