//! Property tests over small random boards

use crossflip_solver::board::{Board, Cell, PressSet};
use crossflip_solver::puzzle::BoardAnalysis;
use crossflip_solver::solver::{BacktrackSolver, LinearSolver, LinearSystem, SearchBudget};
use crossflip_solver::FlipError;
use proptest::prelude::*;

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        4 => Just(Cell::Off),
        4 => Just(Cell::On),
        1 => Just(Cell::Wall),
    ]
}

fn arb_board() -> impl Strategy<Value = Board> {
    (1usize..=3, 1usize..=4).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(arb_cell(), rows * cols)
            .prop_map(move |cells| Board::from_cells(rows, cols, cells).unwrap())
    })
}

fn arb_open_board() -> impl Strategy<Value = Board> {
    (1usize..=4, 1usize..=4).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop_oneof![Just(Cell::Off), Just(Cell::On)], rows * cols)
            .prop_map(move |cells| Board::from_cells(rows, cols, cells).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn proptest_open_board_press_covers_row_and_column(board in arb_open_board(), seed in any::<usize>()) {
        let idx = seed % board.len();
        let (row, col) = board.coords(idx);
        let affected = board.flip_vector(row, col);

        prop_assert_eq!(affected.len(), board.rows() + board.cols() - 1);
        prop_assert_eq!(affected[0], (row, col));
        prop_assert!(affected.iter().all(|&(r, c)| r == row || c == col));
    }

    #[test]
    fn proptest_press_is_an_involution(board in arb_board(), seed in any::<usize>()) {
        let (row, col) = board.coords(seed % board.len());
        let mut pressed = board.clone();
        pressed.apply_press(row, col).unwrap();
        pressed.apply_press(row, col).unwrap();
        prop_assert_eq!(pressed, board);
    }

    #[test]
    fn proptest_system_is_symmetric(board in arb_board()) {
        prop_assert!(LinearSystem::from_board(&board).is_symmetric());
    }

    #[test]
    fn proptest_solvers_agree_on_solvability(board in arb_board()) {
        let linear = LinearSolver::new().solve(&board);
        let backtrack = BacktrackSolver::new(SearchBudget::unlimited()).solve(&board);
        let analysis = BoardAnalysis::of(&board);

        prop_assert_eq!(linear.is_ok(), backtrack.is_ok());
        prop_assert_eq!(linear.is_ok(), analysis.solvable);

        match (linear, backtrack) {
            (Ok(linear), Ok(backtrack)) => {
                prop_assert!(linear.replay(&board).unwrap().is_cleared());
                prop_assert!(backtrack.replay(&board).unwrap().is_cleared());
            }
            (Err(linear), Err(backtrack)) => {
                prop_assert_eq!(linear, FlipError::NoSolutionFound);
                prop_assert_eq!(backtrack, FlipError::NoSolutionFound);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn proptest_backtrack_never_presses_twice_or_on_walls(board in arb_board()) {
        if let Ok(presses) = BacktrackSolver::new(SearchBudget::unlimited()).solve(&board) {
            prop_assert!(presses.iter().all(|&(r, c)| !board.is_wall(r, c)));
            let normalized = presses.normalized(board.rows(), board.cols());
            prop_assert_eq!(normalized.len(), presses.len());
        }
    }

    #[test]
    fn proptest_solution_string_matches_presses(board in arb_board()) {
        if let Ok(presses) = LinearSolver::new().solve(&board) {
            let encoded = presses.to_solution_string(board.rows(), board.cols());
            prop_assert_eq!(encoded.len(), board.len());
            let decoded = PressSet::from_solution_string(&encoded, board.rows(), board.cols()).unwrap();
            prop_assert!(decoded.replay(&board).unwrap().is_cleared());
        }
    }
}
