//! Exhaustive depth-first search over press/no-press decisions

use crate::board::{Board, PressSet};
use crate::error::{FlipError, FlipResult};
use std::time::{Duration, Instant};
use tracing::debug;

/// How often (in nodes) the wall clock is consulted
const TIMEOUT_CHECK_INTERVAL: u64 = 4096;

/// Resource limits for the exponential search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_nodes: u64,
    pub timeout: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self {
            max_nodes: u64::MAX,
            timeout: None,
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: 50_000_000,
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Successful search result
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub presses: PressSet,
    pub statistics: SearchStatistics,
}

/// Depth-first solver that tries "don't press" before "press" for each cell
/// in row-major order
#[derive(Debug, Clone, Default)]
pub struct BacktrackSolver {
    budget: SearchBudget,
}

impl BacktrackSolver {
    pub fn new(budget: SearchBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Solve on a private copy, leaving `board` untouched
    pub fn solve(&self, board: &Board) -> FlipResult<PressSet> {
        let mut scratch = board.clone();
        self.search(&mut scratch).map(|outcome| outcome.presses)
    }

    /// Search in place.
    ///
    /// On success `board` is cleared and the returned presses replay the
    /// original board to the cleared state. On any error `board` is restored
    /// to exactly its original state.
    pub fn search(&self, board: &mut Board) -> FlipResult<SearchOutcome> {
        let mut search = Search {
            board,
            path: PressSet::new(),
            nodes: 0,
            budget: &self.budget,
            started: Instant::now(),
        };

        let found = search.run();
        let statistics = SearchStatistics {
            nodes: search.nodes,
            elapsed: search.started.elapsed(),
        };
        debug!(
            nodes = statistics.nodes,
            elapsed_ms = statistics.elapsed.as_millis() as u64,
            "Backtracking search finished"
        );

        match found {
            Ok(true) => Ok(SearchOutcome {
                presses: search.path,
                statistics,
            }),
            Ok(false) => Err(FlipError::NoSolutionFound),
            Err(err) => Err(err),
        }
    }
}

struct Search<'a> {
    board: &'a mut Board,
    path: PressSet,
    nodes: u64,
    budget: &'a SearchBudget,
    started: Instant,
}

/// A cell whose "don't press" branch is being explored, or whose press
/// branch is when `pressed` is set
struct Frame {
    position: usize,
    pressed: bool,
}

impl Search<'_> {
    fn tick(&mut self) -> FlipResult<()> {
        self.nodes += 1;
        if self.nodes > self.budget.max_nodes {
            return Err(FlipError::BudgetExhausted {
                explored: self.nodes - 1,
            });
        }
        if self.nodes % TIMEOUT_CHECK_INTERVAL == 0 {
            if let Some(timeout) = self.budget.timeout {
                let elapsed = self.started.elapsed();
                if elapsed > timeout {
                    return Err(FlipError::TimedOut { elapsed });
                }
            }
        }
        Ok(())
    }

    /// Depth-first search over an explicit stack, one frame per decided cell.
    /// Unless the result is `Ok(true)`, the board is identical before and after.
    fn run(&mut self) -> FlipResult<bool> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut position = 0;

        loop {
            // a cleared board ends the search even before every cell is decided
            let cleared = self.board.is_cleared();
            if !cleared && position < self.board.len() {
                if let Err(err) = self.tick() {
                    self.unwind(&frames);
                    return Err(err);
                }
                frames.push(Frame {
                    position,
                    pressed: false,
                });
                position += 1;
                continue;
            }
            if cleared {
                return Ok(true);
            }

            // dead end: back up to the nearest cell whose press branch is untried
            loop {
                let Some(frame) = frames.last_mut() else {
                    return Ok(false);
                };
                let (row, col) = self.board.coords(frame.position);
                if frame.pressed {
                    self.board.press_unchecked(row, col);
                    self.path.pop();
                    frames.pop();
                    continue;
                }
                // pressing a wall changes nothing, so that branch would repeat the one above
                if self.board.is_wall(row, col) {
                    frames.pop();
                    continue;
                }
                self.board.press_unchecked(row, col);
                self.path.push(row, col);
                frame.pressed = true;
                position = frame.position + 1;
                break;
            }
        }
    }

    /// Undo every press still on the stack
    fn unwind(&mut self, frames: &[Frame]) {
        for frame in frames.iter().rev().filter(|frame| frame.pressed) {
            let (row, col) = self.board.coords(frame.position);
            self.board.press_unchecked(row, col);
            self.path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(encoding: &str) -> FlipResult<PressSet> {
        BacktrackSolver::default().solve(&Board::parse(encoding).unwrap())
    }

    #[test]
    fn test_cleared_board() {
        assert!(solve("000").unwrap().is_empty());
        assert!(solve("02,20").unwrap().is_empty());
    }

    #[test]
    fn test_first_solution_in_search_order() {
        // "don't press" is explored first, so the last cell is the first one tried
        assert_eq!(solve("111").unwrap().as_slice(), &[(0, 2)]);
    }

    #[test]
    fn test_wall_blocks_propagation() {
        assert_eq!(solve("121").unwrap().as_slice(), &[(0, 0), (0, 2)]);
    }

    #[test]
    fn test_two_by_two() {
        let presses = solve("11,11").unwrap();
        assert_eq!(presses.as_slice(), &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_unsolvable_restores_board() {
        let original = Board::parse("010").unwrap();
        let mut board = original.clone();
        let result = BacktrackSolver::default().search(&mut board);
        assert!(matches!(result, Err(FlipError::NoSolutionFound)));
        assert_eq!(board, original);
    }

    #[test]
    fn test_search_in_place_clears_board() {
        let original = Board::parse("010,111,010").unwrap();
        let mut board = original.clone();
        let outcome = BacktrackSolver::default().search(&mut board).unwrap();
        assert!(board.is_cleared());
        assert!(outcome.presses.replay(&original).unwrap().is_cleared());
        assert!(outcome.statistics.nodes > 0);
    }

    #[test]
    fn test_budget_exhaustion_restores_board() {
        let original = Board::parse("0100,0000,0000,0000").unwrap();
        let mut board = original.clone();
        let solver = BacktrackSolver::new(SearchBudget {
            max_nodes: 5,
            timeout: None,
        });
        let result = solver.search(&mut board);
        assert_eq!(result.unwrap_err(), FlipError::BudgetExhausted { explored: 5 });
        assert_eq!(board, original);
    }

    #[test]
    fn test_deep_board_stops_on_budget() {
        // 300x300: the first descent alone decides 90,000 cells
        let mut rows = vec!["0".repeat(300); 300];
        rows[299] = format!("{}1", "0".repeat(299));
        let original = Board::parse(&rows.join(",")).unwrap();
        let mut board = original.clone();
        let solver = BacktrackSolver::new(SearchBudget {
            max_nodes: 100_000,
            timeout: None,
        });
        let result = solver.search(&mut board);
        assert_eq!(result.unwrap_err(), FlipError::BudgetExhausted { explored: 100_000 });
        assert_eq!(board, original);
    }

    #[test]
    fn test_timeout_restores_board() {
        // an open single row can never clear, so all 2^14 decisions are explored
        let original = Board::parse(&format!("1{}", "0".repeat(13))).unwrap();
        let mut board = original.clone();
        let solver = BacktrackSolver::new(SearchBudget {
            max_nodes: u64::MAX,
            timeout: Some(Duration::ZERO),
        });
        // the clock is read every 4096 nodes, well inside this search
        let result = solver.search(&mut board);
        assert!(matches!(result, Err(FlipError::TimedOut { .. })));
        assert_eq!(board, original);
    }
}
