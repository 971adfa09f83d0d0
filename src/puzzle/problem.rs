//! Flip puzzle problem definition: load, solve, verify, store

use super::{PressSetValidator, PuzzleStore, SolveReport};
use crate::board::Board;
use crate::config::Settings;
use crate::solver::{FlipSolver, LinearSystem};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A single board to solve, optionally tied to a level in the puzzle store
pub struct FlipProblem {
    settings: Settings,
    level: Option<u32>,
    board: Board,
    solver: FlipSolver,
    validator: PressSetValidator,
}

impl FlipProblem {
    /// Load the configured level (or the latest one) from the puzzle store
    pub fn new(settings: Settings) -> Result<Self> {
        let store = PuzzleStore::load(&settings.input.puzzle_file).context("Failed to load puzzle store")?;

        let level = match settings.input.level {
            Some(level) => level,
            None => store.latest_level().with_context(|| {
                format!(
                    "Puzzle store {} contains no levels",
                    settings.input.puzzle_file.display()
                )
            })?,
        };
        let board = store.board(level)?;
        info!(level, rows = board.rows(), cols = board.cols(), "Loaded level");

        Ok(Self::build(settings, Some(level), board))
    }

    /// Create a problem from an explicit board, not tied to the store
    pub fn with_board(settings: Settings, board: Board) -> Self {
        Self::build(settings, None, board)
    }

    fn build(settings: Settings, level: Option<u32>, board: Board) -> Self {
        let solver = FlipSolver::from_config(&settings.solver);
        Self {
            settings,
            level,
            board,
            solver,
            validator: PressSetValidator::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Solve the board and verify the answer by replay
    pub fn solve(&self) -> Result<SolveReport> {
        let start_time = Instant::now();
        debug!(
            strategy = ?self.solver.strategy(),
            cells = self.board.len(),
            lit = self.board.lit_count(),
            "Solving board"
        );

        let presses = self.solver.solve(&self.board).context("Solver did not produce a solution")?;
        let solve_time = start_time.elapsed();

        let validation = self.validator.validate(&self.board, &presses);
        if !validation.is_valid() {
            anyhow::bail!(
                "Solution failed replay validation: {}",
                validation.error_message().unwrap_or_else(|| "unknown error".to_string())
            );
        }

        info!(
            presses = presses.len(),
            elapsed_ms = solve_time.as_millis() as u64,
            "Solution verified by replay"
        );
        Ok(SolveReport::new(
            self.level,
            &self.board,
            self.solver.strategy(),
            presses,
            solve_time,
        ))
    }

    /// Store the report's solution string back into the puzzle file.
    /// Returns false when the problem is not tied to a stored level.
    pub fn write_back(&self, report: &SolveReport) -> Result<bool> {
        let Some(level) = self.level else {
            warn!("Board is not from the puzzle store, nothing to write back");
            return Ok(false);
        };

        let path = &self.settings.input.puzzle_file;
        let mut store = PuzzleStore::load(path).context("Failed to reload puzzle store")?;
        store.set_solution(level, report.solution.clone())?;
        store.save(path).context("Failed to save puzzle store")?;

        info!(level, path = %path.display(), "Solution saved");
        Ok(true)
    }

    /// Structural and algebraic summary of the board
    pub fn analyze(&self) -> BoardAnalysis {
        BoardAnalysis::of(&self.board)
    }
}

/// Summary of a board's size and solvability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAnalysis {
    pub rows: usize,
    pub cols: usize,
    pub lit: usize,
    pub walls: usize,
    pub toggleable: usize,
    /// GF(2) rank of the coefficient matrix
    pub rank: usize,
    /// Toggleable cells whose press is not determined by the others
    pub nullity: usize,
    pub solvable: bool,
}

impl BoardAnalysis {
    pub fn of(board: &Board) -> Self {
        let system = LinearSystem::from_board(board);
        let (rank, solvable) = system.rank_and_consistency();
        let toggleable = board.toggleable_count();
        Self {
            rows: board.rows(),
            cols: board.cols(),
            lit: board.lit_count(),
            walls: board.wall_count(),
            toggleable,
            rank,
            nullity: toggleable - rank,
            solvable,
        }
    }

    /// log2 of the number of distinct solutions, if any exist
    pub fn solution_count_log2(&self) -> Option<usize> {
        self.solvable.then_some(self.nullity)
    }

    pub fn density(&self) -> f64 {
        if self.toggleable == 0 {
            0.0
        } else {
            self.lit as f64 / self.toggleable as f64
        }
    }
}

impl std::fmt::Display for BoardAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board Analysis:")?;
        writeln!(f, "  Size: {}x{} ({} cells)", self.rows, self.cols, self.rows * self.cols)?;
        writeln!(f, "  Walls: {}", self.walls)?;
        writeln!(f, "  Lit cells: {} ({:.1}% of toggleable)", self.lit, self.density() * 100.0)?;
        writeln!(f, "  Matrix rank: {} of {}", self.rank, self.toggleable)?;
        writeln!(f, "  Solvable: {}", if self.solvable { "yes" } else { "no" })?;
        if let Some(exponent) = self.solution_count_log2() {
            writeln!(f, "  Distinct solutions: 2^{}", exponent)?;
        }
        Ok(())
    }
}
