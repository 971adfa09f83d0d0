//! Puzzle loading, solving and persistence around the solving engine

pub mod problem;
pub mod report;
pub mod store;
pub mod validator;

pub use problem::{BoardAnalysis, FlipProblem};
pub use report::SolveReport;
pub use store::{create_sample_store, PuzzleEntry, PuzzleStore};
pub use validator::{PressSetValidator, ValidationResult};
