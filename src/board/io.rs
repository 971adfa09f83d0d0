//! File I/O for flip boards

use super::grid::ROW_SEPARATOR;
use super::Board;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a board from a text file.
/// Rows may be separated by commas, newlines, or both; blank lines are ignored.
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_text(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a multi-line or comma-separated board text
pub fn parse_board_text(content: &str) -> Result<Board> {
    let rows: Vec<&str> = content
        .lines()
        .flat_map(|line| line.split(ROW_SEPARATOR))
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .collect();

    if rows.is_empty() {
        anyhow::bail!("Board text is empty or contains no valid rows");
    }

    Ok(Board::parse(&rows.join(ROW_SEPARATOR))?)
}

/// Save a board as one digit row per line
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, board.to_string())
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_board_text_multiline() {
        let board = parse_board_text("101\n020\n\n111\n").unwrap();
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 3);
        assert_eq!(board.encode(), "101,020,111");
    }

    #[test]
    fn test_parse_board_text_comma() {
        let board = parse_board_text("1001,1220\n").unwrap();
        assert_eq!(board.encode(), "1001,1220");
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_board_text("").is_err());
        assert!(parse_board_text("10\n1\n").is_err());
        assert!(parse_board_text("1x\n").is_err());
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("boards/level.txt");

        let original = Board::parse("120,011").unwrap();
        save_board_to_file(&original, &file_path).unwrap();

        let loaded = load_board_from_file(&file_path).unwrap();
        assert_eq!(loaded, original);
    }
}
