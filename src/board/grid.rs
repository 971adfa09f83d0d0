//! Board representation and flip propagation

use crate::error::{FlipError, FlipResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row separator used by the board encoding
pub const ROW_SEPARATOR: &str = ",";

/// Up, down, left, right
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Off,
    On,
    Wall,
}

impl Cell {
    /// Decode one digit of the board encoding
    pub fn from_digit(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Cell::Off),
            '1' => Some(Cell::On),
            '2' => Some(Cell::Wall),
            _ => None,
        }
    }

    pub fn to_digit(self) -> char {
        match self {
            Cell::Off => '0',
            Cell::On => '1',
            Cell::Wall => '2',
        }
    }

    pub fn is_toggleable(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    fn toggled(self) -> Self {
        match self {
            Cell::Off => Cell::On,
            Cell::On => Cell::Off,
            Cell::Wall => Cell::Wall,
        }
    }
}

/// A rectangular flip board stored in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    /// Number of cells currently `On`
    lit: usize,
}

impl Board {
    /// Parse the comma-separated digit encoding, e.g. `"1001,1220"`
    pub fn parse(encoding: &str) -> FlipResult<Self> {
        let encoding = encoding.trim();
        if encoding.is_empty() {
            return Err(FlipError::malformed("board encoding is empty"));
        }

        let records: Vec<&str> = encoding.split(ROW_SEPARATOR).map(str::trim).collect();
        let width = records[0].chars().count();
        if width == 0 {
            return Err(FlipError::malformed("row 0 is empty"));
        }

        let mut cells = Vec::with_capacity(records.len() * width);
        for (row_idx, record) in records.iter().enumerate() {
            let len = record.chars().count();
            if len != width {
                return Err(FlipError::malformed(format!(
                    "row {} has length {}, expected {}",
                    row_idx, len, width
                )));
            }
            for (col_idx, ch) in record.chars().enumerate() {
                let cell = Cell::from_digit(ch).ok_or_else(|| {
                    FlipError::malformed(format!(
                        "invalid character '{}' at ({}, {}); only '0', '1' and '2' are allowed",
                        ch, row_idx, col_idx
                    ))
                })?;
                cells.push(cell);
            }
        }

        Self::from_cells(records.len(), width, cells)
    }

    /// Build a board from row-major cells
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> FlipResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(FlipError::malformed("board must have at least one row and one column"));
        }
        if cells.len() != rows * cols {
            return Err(FlipError::malformed(format!(
                "expected {} cells for a {}x{} board, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        let lit = cells.iter().filter(|&&cell| cell == Cell::On).count();
        Ok(Self {
            rows,
            cols,
            cells,
            lit,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, `R×C`
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Coordinates of a linear index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// True if `(row, col)` is outside the board or holds a wall
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        !matches!(self.get(row, col), Some(cell) if cell.is_toggleable())
    }

    /// Next non-wall cell from `(row, col)` in direction `(dr, dc)`
    fn step(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (!self.is_wall(r, c)).then_some((r, c))
    }

    /// Cells toggled by pressing `(row, col)`: the cell itself plus every
    /// non-wall cell in sight along the four cardinal directions.
    /// Empty for walls and out-of-bounds coordinates.
    pub fn flip_vector(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        if self.is_wall(row, col) {
            return Vec::new();
        }
        let mut affected = vec![(row, col)];
        for (dr, dc) in DIRECTIONS {
            let (mut r, mut c) = (row, col);
            while let Some(next) = self.step(r, c, dr, dc) {
                affected.push(next);
                (r, c) = next;
            }
        }
        affected
    }

    /// Linear indices of [`Board::flip_vector`]
    pub fn flip_indices(&self, row: usize, col: usize) -> Vec<usize> {
        self.flip_vector(row, col)
            .into_iter()
            .map(|(r, c)| self.index(r, c))
            .collect()
    }

    fn check_bounds(&self, row: usize, col: usize) -> FlipResult<()> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(FlipError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    #[inline]
    fn toggle_index(&mut self, idx: usize) {
        match self.cells[idx] {
            Cell::Off => self.lit += 1,
            Cell::On => self.lit -= 1,
            Cell::Wall => return,
        }
        self.cells[idx] = self.cells[idx].toggled();
    }

    /// Flip a single cell between `Off` and `On`; walls are left alone
    pub fn toggle(&mut self, row: usize, col: usize) -> FlipResult<()> {
        self.check_bounds(row, col)?;
        let idx = self.index(row, col);
        self.toggle_index(idx);
        Ok(())
    }

    /// Press `(row, col)`, toggling its whole flip vector.
    /// Pressing the same cell twice restores the board exactly.
    pub fn apply_press(&mut self, row: usize, col: usize) -> FlipResult<()> {
        self.check_bounds(row, col)?;
        self.press_unchecked(row, col);
        Ok(())
    }

    /// Press without bounds checking or allocation; used by the search loop
    pub(crate) fn press_unchecked(&mut self, row: usize, col: usize) {
        if self.is_wall(row, col) {
            return;
        }
        let idx = self.index(row, col);
        self.toggle_index(idx);
        for (dr, dc) in DIRECTIONS {
            let (mut r, mut c) = (row, col);
            while let Some(next) = self.step(r, c, dr, dc) {
                let idx = self.index(next.0, next.1);
                self.toggle_index(idx);
                (r, c) = next;
            }
        }
    }

    /// True when no cell is `On`
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.lit == 0
    }

    pub fn lit_count(&self) -> usize {
        self.lit
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Wall).count()
    }

    pub fn toggleable_count(&self) -> usize {
        self.len() - self.wall_count()
    }

    /// Coordinates of every lit cell in row-major order
    pub fn lit_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Cell::On)
            .map(|(idx, _)| self.coords(idx))
            .collect()
    }

    /// Encode back into the comma-separated digit form
    pub fn encode(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.to_digit()).collect::<String>())
            .collect::<Vec<_>>()
            .join(ROW_SEPARATOR)
    }
}

impl std::str::FromStr for Board {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell.to_digit())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let board = Board::parse("1001,1220").unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 4);
        assert_eq!(board.get(0, 0), Some(Cell::On));
        assert_eq!(board.get(1, 2), Some(Cell::Wall));
        assert_eq!(board.lit_count(), 3);
        assert_eq!(board.wall_count(), 2);
        assert_eq!(board.encode(), "1001,1220");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(Board::parse(""), Err(FlipError::MalformedBoard { .. })));
        assert!(matches!(Board::parse("101,10"), Err(FlipError::MalformedBoard { .. })));
        assert!(matches!(Board::parse("103"), Err(FlipError::MalformedBoard { .. })));
        assert!(matches!(Board::parse("10,,01"), Err(FlipError::MalformedBoard { .. })));
    }

    #[test]
    fn test_is_wall_out_of_bounds() {
        let board = Board::parse("020").unwrap();
        assert!(board.is_wall(0, 1));
        assert!(board.is_wall(1, 0));
        assert!(board.is_wall(0, 3));
        assert!(!board.is_wall(0, 0));
    }

    #[test]
    fn test_flip_vector_open_board() {
        let board = Board::parse("000,000,000").unwrap();
        let mut vector = board.flip_vector(1, 1);
        vector.sort();
        assert_eq!(vector, vec![(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_flip_vector_stops_at_walls() {
        let board = Board::parse("121").unwrap();
        assert_eq!(board.flip_vector(0, 0), vec![(0, 0)]);
        assert_eq!(board.flip_vector(0, 2), vec![(0, 2)]);
        assert!(board.flip_vector(0, 1).is_empty());
    }

    #[test]
    fn test_press_toggles_row_and_column() {
        let mut board = Board::parse("000,000").unwrap();
        board.apply_press(0, 1).unwrap();
        assert_eq!(board.encode(), "111,010");
        assert_eq!(board.lit_count(), 4);
    }

    #[test]
    fn test_press_is_involution() {
        let original = Board::parse("1021,0110,2201").unwrap();
        let mut board = original.clone();
        board.apply_press(1, 1).unwrap();
        assert_ne!(board, original);
        board.apply_press(1, 1).unwrap();
        assert_eq!(board, original);
    }

    #[test]
    fn test_toggle_ignores_walls() {
        let mut board = Board::parse("12").unwrap();
        board.toggle(0, 1).unwrap();
        assert_eq!(board.encode(), "12");
        board.toggle(0, 0).unwrap();
        assert!(board.is_cleared());
        assert!(board.toggle(3, 3).is_err());
    }

    #[test]
    fn test_pressing_wall_is_noop() {
        let mut board = Board::parse("121").unwrap();
        board.apply_press(0, 1).unwrap();
        assert_eq!(board.encode(), "121");
    }
}
