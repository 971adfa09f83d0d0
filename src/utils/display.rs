//! Display and output formatting utilities

use crate::board::{Board, Cell, PressSet};
use crate::config::OutputFormat;
use crate::puzzle::{BoardAnalysis, SolveReport};
use anyhow::Result;
use itertools::Itertools;
use std::collections::HashSet;

/// Format boards and reports for the terminal
pub struct BoardFormatter;

impl BoardFormatter {
    fn glyph(cell: Cell) -> char {
        match cell {
            Cell::Off => '·',
            Cell::On => '█',
            Cell::Wall => '▒',
        }
    }

    /// Format a board in compact form
    pub fn format_board_compact(board: &Board) -> String {
        let mut output = String::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                output.push(board.get(row, col).map_or(' ', Self::glyph));
            }
            output.push('\n');
        }
        output
    }

    /// Format a board with coordinates
    pub fn format_board_with_coords(board: &Board) -> String {
        Self::format_with_coords(board, &HashSet::new())
    }

    /// Format a board with pressed cells marked `X`
    pub fn format_presses(board: &Board, presses: &PressSet) -> String {
        let pressed: HashSet<(usize, usize)> = presses.normalized(board.rows(), board.cols()).iter().copied().collect();
        Self::format_with_coords(board, &pressed)
    }

    fn format_with_coords(board: &Board, pressed: &HashSet<(usize, usize)>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        output.push_str(&(0..board.cols()).map(|col| format!("{:2}", col % 10)).join(""));
        output.push('\n');

        for row in 0..board.rows() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..board.cols() {
                if pressed.contains(&(row, col)) {
                    output.push_str(" X");
                    continue;
                }
                let glyph = board.get(row, col).map_or(' ', Self::glyph);
                output.push(glyph);
                output.push(glyph);
            }
            output.push('\n');
        }

        output
    }

    /// Format a solve report for console output
    pub fn format_report(report: &SolveReport, show_board: bool) -> String {
        let mut output = String::new();

        match report.level {
            Some(level) => output.push_str(&format!("=== Level {} ===\n", level)),
            None => output.push_str("=== Board ===\n"),
        }
        output.push_str(&format!("Size: {}x{}\n", report.rows, report.cols));
        output.push_str(&format!("Strategy: {:?}\n", report.strategy));
        output.push_str(&format!("Solve Time: {:.3}s\n", report.solve_time.as_secs_f64()));
        output.push_str(&format!("Presses: {}\n", report.press_count()));
        if !report.presses.is_empty() {
            output.push_str(&format!(
                "Order: {}\n",
                report.presses.iter().map(|&(row, col)| format!("({},{})", row, col)).join(" ")
            ));
        }
        output.push_str(&format!("Solution: {}\n", report.solution));

        if show_board {
            if let Ok(board) = Board::parse(&report.board) {
                output.push('\n');
                output.push_str(&Self::format_presses(&board, &report.presses));
            }
        }

        output
    }

    /// Render a report in the configured output format
    pub fn render_report(report: &SolveReport, format: OutputFormat, show_board: bool) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::format_report(report, show_board)),
            OutputFormat::Json => Ok(report.to_json()?),
        }
    }

    /// Board picture followed by its analysis
    pub fn format_analysis(board: &Board, analysis: &BoardAnalysis) -> String {
        let mut output = String::new();
        output.push_str(&format!("Board ({}x{}):\n", board.rows(), board.cols()));
        output.push_str(&Self::format_board_with_coords(board));
        output.push('\n');
        output.push_str(&analysis.to_string());
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
