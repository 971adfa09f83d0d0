//! GF(2) linear-algebra solver
//!
//! Pressing cell `j` toggles cell `i` exactly when `i` lies in the flip vector
//! of `j`, so clearing the board means solving `M·x = b (mod 2)` where `b`
//! marks the lit cells. `M` is symmetric because sight lines are.

use super::packed::{pack_bits, set_bit, set_rhs_bit, PackedMatrix};
use crate::board::{Board, Cell, PressSet};
use crate::error::{FlipError, FlipResult};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The coefficient matrix and right-hand side for one board
#[derive(Debug, Clone)]
pub struct LinearSystem {
    board_cols: usize,
    matrix: PackedMatrix,
}

impl LinearSystem {
    /// Build `[M | b]` from a board; row and column `i` belong to cell `row * C + col`
    pub fn from_board(board: &Board) -> Self {
        let n = board.len();
        let matrix = PackedMatrix::from_fn(n, n, |i, row| {
            let (r, c) = board.coords(i);
            for j in board.flip_indices(r, c) {
                set_bit(row, j);
            }
            if board.get(r, c) == Some(Cell::On) {
                set_rhs_bit(row);
            }
        });

        Self {
            board_cols: board.cols(),
            matrix,
        }
    }

    /// Number of unknowns, `R×C`
    pub fn size(&self) -> usize {
        self.matrix.cols()
    }

    pub fn board_cols(&self) -> usize {
        self.board_cols
    }

    pub fn coefficient(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j)
    }

    pub fn rhs(&self, i: usize) -> bool {
        self.matrix.rhs(i)
    }

    pub fn matrix(&self) -> &PackedMatrix {
        &self.matrix
    }

    pub fn is_symmetric(&self) -> bool {
        self.matrix.is_symmetric()
    }

    /// Indices of equations that `x` does not satisfy
    pub fn unsatisfied(&self, x: &[bool]) -> Vec<usize> {
        let packed = pack_bits(x);
        (0..self.matrix.rows())
            .filter(|&i| self.matrix.row_dot(i, &packed) != self.matrix.rhs(i))
            .collect()
    }

    /// Rank of `M` over GF(2)
    pub fn rank(&self) -> usize {
        self.rank_and_consistency().0
    }

    /// Rank of `M` and whether `M·x = b` has any solution
    pub fn rank_and_consistency(&self) -> (usize, bool) {
        let mut work = self.matrix.clone();
        let pivots = gauss_jordan_full_pivot(&mut work);
        let consistent = full_pivot_solution(&work, &pivots).is_ok();
        (pivots.len(), consistent)
    }
}

/// Which elimination produced a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationMethod {
    /// In-place diagonal pivoting with XOR folding
    Diagonal,
    /// Row-swapping pivot search over every column
    FullPivot,
}

/// Solution vector plus how it was obtained
#[derive(Debug, Clone)]
pub struct LinearSolution {
    pub solution: Vec<bool>,
    /// Width of the board the system was built from
    pub board_cols: usize,
    pub method: EliminationMethod,
    /// Whether `M·x = b` was checked and held
    pub verified: bool,
    pub elapsed: Duration,
}

impl LinearSolution {
    pub fn to_press_set(&self) -> PressSet {
        PressSet::from_solution_vector(&self.solution, self.board_cols)
    }
}

/// Options for [`LinearSolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearOptions {
    /// Check `M·x = b` after diagonal elimination
    pub verify: bool,
    /// Re-solve with full pivoting when the check fails
    pub pivot_fallback: bool,
}

impl Default for LinearOptions {
    fn default() -> Self {
        Self {
            verify: true,
            pivot_fallback: true,
        }
    }
}

/// Bit-packed Gauss-Jordan solver
#[derive(Debug, Clone, Default)]
pub struct LinearSolver {
    options: LinearOptions,
}

impl LinearSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LinearOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LinearOptions {
        self.options
    }

    /// Solve a board; the board itself is never modified
    pub fn solve(&self, board: &Board) -> FlipResult<PressSet> {
        let system = LinearSystem::from_board(board);
        let solution = self.solve_system(&system)?;
        Ok(solution.to_press_set())
    }

    pub fn solve_system(&self, system: &LinearSystem) -> FlipResult<LinearSolution> {
        let start = Instant::now();
        let n = system.size();
        debug!(
            unknowns = n,
            words_per_row = system.matrix().stride(),
            "Running diagonal Gauss-Jordan elimination"
        );

        let mut work = system.matrix().clone();
        gauss_jordan_diagonal(&mut work);
        let solution = diagonal_solution(&work);

        if !self.options.verify {
            return Ok(LinearSolution {
                solution,
                board_cols: system.board_cols(),
                method: EliminationMethod::Diagonal,
                verified: false,
                elapsed: start.elapsed(),
            });
        }

        let mismatched = system.unsatisfied(&solution);
        if mismatched.is_empty() {
            debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Diagonal elimination verified");
            return Ok(LinearSolution {
                solution,
                board_cols: system.board_cols(),
                method: EliminationMethod::Diagonal,
                verified: true,
                elapsed: start.elapsed(),
            });
        }

        if !self.options.pivot_fallback {
            return Err(FlipError::Unverified {
                mismatched: mismatched.len(),
                equations: n,
            });
        }

        warn!(
            mismatched = mismatched.len(),
            equations = n,
            "Diagonal elimination failed verification, retrying with full pivoting"
        );
        let mut work = system.matrix().clone();
        let pivots = gauss_jordan_full_pivot(&mut work);
        let solution = full_pivot_solution(&work, &pivots)?;

        // full pivoting is exact; a mismatch here is a defect
        let mismatched = system.unsatisfied(&solution);
        if !mismatched.is_empty() {
            return Err(FlipError::Unverified {
                mismatched: mismatched.len(),
                equations: n,
            });
        }

        Ok(LinearSolution {
            solution,
            board_cols: system.board_cols(),
            method: EliminationMethod::FullPivot,
            verified: true,
            elapsed: start.elapsed(),
        })
    }
}

/// Gauss-Jordan elimination mod 2 with the pivot of row `i` fixed at column `i`.
///
/// A zero pivot is repaired by folding the first lower row with bit `i` set
/// into row `i` (XOR, not swap). Rows that never obtain a pivot are left
/// partially reduced and no rank or consistency information is reported.
pub fn gauss_jordan_diagonal(matrix: &mut PackedMatrix) {
    let n = matrix.rows().min(matrix.cols());
    for i in 0..n {
        if !matrix.get(i, i) {
            if let Some(k) = matrix.find_row_with(i, i + 1) {
                matrix.xor_row_into(k, i);
            }
        }
        matrix.eliminate_column(i, i);
    }
}

/// Read `x[i]` from the right-hand-side bit of row `i`
pub fn diagonal_solution(matrix: &PackedMatrix) -> Vec<bool> {
    (0..matrix.rows()).map(|row| matrix.rhs(row)).collect()
}

/// Reduced row echelon form with row swaps.
/// Returns the pivot column of each of the first `rank` rows.
pub fn gauss_jordan_full_pivot(matrix: &mut PackedMatrix) -> Vec<usize> {
    let mut pivots = Vec::new();
    for col in 0..matrix.cols() {
        let next = pivots.len();
        if next == matrix.rows() {
            break;
        }
        let Some(found) = matrix.find_row_with(col, next) else {
            continue;
        };
        matrix.swap_rows(next, found);
        matrix.eliminate_column(next, col);
        pivots.push(col);
    }
    pivots
}

/// Particular solution of a fully reduced system, free variables set to 0.
/// Fails with `NoSolutionFound` when a zero row has a nonzero right-hand side.
pub fn full_pivot_solution(matrix: &PackedMatrix, pivots: &[usize]) -> FlipResult<Vec<bool>> {
    let inconsistent = (pivots.len()..matrix.rows()).any(|row| matrix.rhs(row) && matrix.is_zero_row(row));
    if inconsistent {
        return Err(FlipError::NoSolutionFound);
    }

    let mut solution = vec![false; matrix.cols()];
    for (row, &col) in pivots.iter().enumerate() {
        solution[col] = matrix.rhs(row);
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_set(board: &str) -> FlipResult<PressSet> {
        let board = Board::parse(board).unwrap();
        LinearSolver::new().solve(&board)
    }

    #[test]
    fn test_system_layout() {
        let board = Board::parse("10,02").unwrap();
        let system = LinearSystem::from_board(&board);

        assert_eq!(system.size(), 4);
        // cell 0 sees cells 1 and 2; cell 3 is a wall
        assert!(system.coefficient(0, 0) && system.coefficient(0, 1) && system.coefficient(0, 2));
        assert!(!system.coefficient(0, 3));
        assert!((0..4).all(|j| !system.coefficient(3, j)));
        assert!(system.rhs(0));
        assert!(!system.rhs(1) && !system.rhs(3));
        assert!(system.is_symmetric());
    }

    #[test]
    fn test_wall_row_solution() {
        let presses = press_set("121").unwrap();
        assert_eq!(presses.as_slice(), &[(0, 0), (0, 2)]);
    }

    #[test]
    fn test_single_row_all_lit() {
        // every press flips the whole row, so one press suffices
        let board = Board::parse("111").unwrap();
        let presses = LinearSolver::new().solve(&board).unwrap();
        assert_eq!(presses.len(), 1);
        assert!(presses.replay(&board).unwrap().is_cleared());
    }

    #[test]
    fn test_cleared_board_needs_no_presses() {
        assert!(press_set("000").unwrap().is_empty());
        assert!(press_set("000,020").unwrap().is_empty());
    }

    #[test]
    fn test_two_by_two_requires_all_presses() {
        let presses = press_set("11,11").unwrap();
        assert_eq!(presses.as_slice(), &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_unsolvable_single_row() {
        // each press toggles all three cells, so "010" can never clear
        assert_eq!(press_set("010"), Err(FlipError::NoSolutionFound));
    }

    #[test]
    fn test_verification_without_fallback() {
        let board = Board::parse("010").unwrap();
        let solver = LinearSolver::with_options(LinearOptions {
            verify: true,
            pivot_fallback: false,
        });
        assert!(matches!(solver.solve(&board), Err(FlipError::Unverified { .. })));
    }

    #[test]
    fn test_unverified_mode_returns_raw_vector() {
        let board = Board::parse("010").unwrap();
        let solver = LinearSolver::with_options(LinearOptions {
            verify: false,
            pivot_fallback: false,
        });
        let system = LinearSystem::from_board(&board);
        let solution = solver.solve_system(&system).unwrap();
        assert!(!solution.verified);
        assert_eq!(solution.method, EliminationMethod::Diagonal);
        // row 0 picks up the rhs of the pivotless row 1 while columns 1 and 2 are eliminated
        assert_eq!(solution.solution, vec![true, true, false]);
        assert!(!system.unsatisfied(&solution.solution).is_empty());
    }

    #[test]
    fn test_press_set_uses_board_width() {
        // the result of pressing (0, 2) on an empty 2x3 board
        let board = Board::parse("111,001").unwrap();
        let system = LinearSystem::from_board(&board);
        assert_eq!(system.board_cols(), 3);

        let solution = LinearSolver::new().solve_system(&system).unwrap();
        let presses = solution.to_press_set();
        assert!(presses.iter().all(|&(row, col)| row < 2 && col < 3));
        assert!(presses.replay(&board).unwrap().is_cleared());
    }

    #[test]
    fn test_rank_deficient_board() {
        // 1x4 open row: rank 1, diagonal reduction leaves rows 1..3 without pivots
        let board = Board::parse("1111").unwrap();
        let system = LinearSystem::from_board(&board);
        let solution = LinearSolver::new().solve_system(&system).unwrap();
        assert!(solution.verified);
        assert!(system.unsatisfied(&solution.solution).is_empty());
    }

    #[test]
    fn test_rank() {
        assert_eq!(LinearSystem::from_board(&Board::parse("111").unwrap()).rank(), 1);
        assert_eq!(LinearSystem::from_board(&Board::parse("11,11").unwrap()).rank(), 4);
        assert_eq!(LinearSystem::from_board(&Board::parse("121").unwrap()).rank(), 2);
    }

    #[test]
    fn test_consistency() {
        let solvable = LinearSystem::from_board(&Board::parse("111").unwrap());
        assert_eq!(solvable.rank_and_consistency(), (1, true));

        let unsolvable = LinearSystem::from_board(&Board::parse("010").unwrap());
        assert_eq!(unsolvable.rank_and_consistency(), (1, false));
    }

    #[test]
    fn test_large_board_uses_parallel_rows() {
        // 20x20 exceeds the parallel threshold
        let encoding = vec!["10".repeat(10); 20].join(",");
        let board = Board::parse(&encoding).unwrap();
        let system = LinearSystem::from_board(&board);
        assert!(system.is_symmetric());
        match LinearSolver::new().solve_system(&system) {
            Ok(solution) => {
                let presses = solution.to_press_set();
                assert!(presses.replay(&board).unwrap().is_cleared());
            }
            Err(err) => assert_eq!(err, FlipError::NoSolutionFound),
        }
    }
}
