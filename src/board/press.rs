//! Ordered sets of cell presses

use super::Board;
use crate::error::{FlipError, FlipResult};
use serde::{Deserialize, Serialize};

/// Cells pressed, in the order they were applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressSet {
    presses: Vec<(usize, usize)>,
}

impl PressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_presses(presses: Vec<(usize, usize)>) -> Self {
        Self { presses }
    }

    /// Build from a GF(2) solution vector indexed by `row * cols + col`
    pub fn from_solution_vector(solution: &[bool], cols: usize) -> Self {
        let presses = solution
            .iter()
            .enumerate()
            .filter(|(_, &pressed)| pressed)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect();
        Self { presses }
    }

    /// Parse the fixed-length digit string used by the puzzle store
    pub fn from_solution_string(solution: &str, rows: usize, cols: usize) -> FlipResult<Self> {
        let solution = solution.trim();
        if solution.chars().count() != rows * cols {
            return Err(FlipError::malformed(format!(
                "solution string has length {}, expected {}",
                solution.chars().count(),
                rows * cols
            )));
        }
        let mut presses = Vec::new();
        for (idx, ch) in solution.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => presses.push((idx / cols, idx % cols)),
                _ => {
                    return Err(FlipError::malformed(format!(
                        "invalid character '{}' at position {} of solution string",
                        ch, idx
                    )))
                }
            }
        }
        Ok(Self { presses })
    }

    pub fn push(&mut self, row: usize, col: usize) {
        self.presses.push((row, col));
    }

    pub fn pop(&mut self) -> Option<(usize, usize)> {
        self.presses.pop()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.presses.iter()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.presses
    }

    /// Per-cell press parity; presses outside the grid are ignored
    pub fn parity_mask(&self, rows: usize, cols: usize) -> Vec<bool> {
        let mut mask = vec![false; rows * cols];
        for &(row, col) in &self.presses {
            if row < rows && col < cols {
                mask[row * cols + col] ^= true;
            }
        }
        mask
    }

    /// Render as the fixed-length `0`/`1` string, position `row * cols + col`
    pub fn to_solution_string(&self, rows: usize, cols: usize) -> String {
        self.parity_mask(rows, cols)
            .into_iter()
            .map(|pressed| if pressed { '1' } else { '0' })
            .collect()
    }

    /// Equivalent set with cancelling presses removed, in row-major order
    pub fn normalized(&self, rows: usize, cols: usize) -> Self {
        Self::from_solution_vector(&self.parity_mask(rows, cols), cols)
    }

    /// Apply every press, in order, to a copy of `board`
    pub fn replay(&self, board: &Board) -> FlipResult<Board> {
        let mut replayed = board.clone();
        for &(row, col) in &self.presses {
            replayed.apply_press(row, col)?;
        }
        Ok(replayed)
    }
}

impl FromIterator<(usize, usize)> for PressSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            presses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PressSet {
    type Item = &'a (usize, usize);
    type IntoIter = std::slice::Iter<'a, (usize, usize)>;

    fn into_iter(self) -> Self::IntoIter {
        self.presses.iter()
    }
}
