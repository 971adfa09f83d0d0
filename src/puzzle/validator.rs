//! Replay-based validation of press sets

use crate::board::{Board, PressSet};
use anyhow::Result;
use std::time::Instant;

/// Checks that a press set clears a board
#[derive(Debug, Clone, Default)]
pub struct PressSetValidator;

/// Result of replaying a press set
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_cleared: bool,
    /// Cells still lit after the replay
    pub remaining_lit: Vec<(usize, usize)>,
    /// Presses that landed on walls and had no effect
    pub wall_presses: Vec<(usize, usize)>,
    /// Presses outside the board, skipped during replay
    pub out_of_bounds: Vec<(usize, usize)>,
    pub presses_checked: usize,
    pub validation_time_us: u64,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_cleared && self.out_of_bounds.is_empty()
    }

    pub fn error_message(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let mut message = String::new();
        if !self.out_of_bounds.is_empty() {
            message.push_str(&format!(
                "{} press(es) outside the board, first at {:?}. ",
                self.out_of_bounds.len(),
                self.out_of_bounds[0]
            ));
        }
        if !self.is_cleared {
            message.push_str(&format!("{} cell(s) remain lit", self.remaining_lit.len()));
            let examples: Vec<String> = self
                .remaining_lit
                .iter()
                .take(3)
                .map(|(r, c)| format!("({}, {})", r, c))
                .collect();
            message.push_str(&format!(": {}", examples.join(", ")));
            if self.remaining_lit.len() > 3 {
                message.push_str(&format!(" ... and {} more", self.remaining_lit.len() - 3));
            }
        }
        Some(message.trim_end().to_string())
    }
}

impl PressSetValidator {
    pub fn new() -> Self {
        Self
    }

    /// Replay `presses` on a copy of `board` and report the outcome
    pub fn validate(&self, board: &Board, presses: &PressSet) -> ValidationResult {
        let start_time = Instant::now();
        let mut replayed = board.clone();
        let mut wall_presses = Vec::new();
        let mut out_of_bounds = Vec::new();

        for &(row, col) in presses {
            if row >= board.rows() || col >= board.cols() {
                out_of_bounds.push((row, col));
                continue;
            }
            if board.is_wall(row, col) {
                wall_presses.push((row, col));
            }
            replayed.press_unchecked(row, col);
        }

        ValidationResult {
            is_cleared: replayed.is_cleared(),
            remaining_lit: replayed.lit_cells(),
            wall_presses,
            out_of_bounds,
            presses_checked: presses.len(),
            validation_time_us: start_time.elapsed().as_micros() as u64,
        }
    }

    /// Validate a fixed-length solution string against `board`
    pub fn validate_solution_string(&self, board: &Board, solution: &str) -> Result<ValidationResult> {
        let presses = PressSet::from_solution_string(solution, board.rows(), board.cols())?;
        Ok(self.validate(board, &presses))
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid() { "VALID" } else { "INVALID" })?;

        if let Some(error) = self.error_message() {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Presses checked: {}", self.presses_checked)?;
        writeln!(f, "Board cleared: {}", self.is_cleared)?;
        if !self.wall_presses.is_empty() {
            writeln!(f, "Presses on walls (no effect): {}", self.wall_presses.len())?;
        }
        writeln!(f, "Validation time: {}µs", self.validation_time_us)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_press_set() {
        let board = Board::parse("121").unwrap();
        let presses = PressSet::from_presses(vec![(0, 0), (0, 2)]);
        let result = PressSetValidator::new().validate(&board, &presses);

        assert!(result.is_valid());
        assert!(result.remaining_lit.is_empty());
        assert!(result.error_message().is_none());
        assert_eq!(result.presses_checked, 2);
    }

    #[test]
    fn test_remaining_cells_reported() {
        let board = Board::parse("121").unwrap();
        let presses = PressSet::from_presses(vec![(0, 0)]);
        let result = PressSetValidator::new().validate(&board, &presses);

        assert!(!result.is_valid());
        assert_eq!(result.remaining_lit, vec![(0, 2)]);
        assert!(result.error_message().unwrap().contains("1 cell(s) remain lit"));
    }

    #[test]
    fn test_wall_and_out_of_bounds_presses() {
        let board = Board::parse("121").unwrap();
        let presses = PressSet::from_presses(vec![(0, 0), (0, 1), (0, 2), (5, 5)]);
        let result = PressSetValidator::new().validate(&board, &presses);

        assert!(result.is_cleared);
        assert!(!result.is_valid());
        assert_eq!(result.wall_presses, vec![(0, 1)]);
        assert_eq!(result.out_of_bounds, vec![(5, 5)]);
    }

    #[test]
    fn test_solution_string() {
        let board = Board::parse("11,11").unwrap();
        let validator = PressSetValidator::new();

        assert!(validator.validate_solution_string(&board, "1111").unwrap().is_valid());
        assert!(!validator.validate_solution_string(&board, "1000").unwrap().is_valid());
        assert!(validator.validate_solution_string(&board, "11").is_err());
    }
}
