//! Flip board model

pub mod grid;
pub mod io;
pub mod press;

pub use grid::{Board, Cell};
pub use io::{load_board_from_file, parse_board_text, save_board_to_file};
pub use press::PressSet;
