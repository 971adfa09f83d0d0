//! Level-keyed JSON puzzle store
//!
//! ```json
//! {
//!   "12": { "boardStr": "1001,1220", "solution": "", "posted": false }
//! }
//! ```

use crate::board::Board;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One stored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleEntry {
    #[serde(rename = "boardStr")]
    pub board_str: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub posted: bool,
    /// Fields written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PuzzleEntry {
    pub fn new(board_str: impl Into<String>) -> Self {
        Self {
            board_str: board_str.into(),
            solution: String::new(),
            posted: false,
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_solved(&self) -> bool {
        !self.solution.is_empty()
    }

    pub fn board(&self) -> Result<Board> {
        Board::parse(&self.board_str).context("Stored board is malformed")
    }
}

/// All stored levels, ordered by level number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleStore {
    levels: BTreeMap<u32, PuzzleEntry>,
}

impl PuzzleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse puzzle file: {}", path.as_ref().display()))
    }

    /// Write the store as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize puzzle store")?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write puzzle file: {}", path.as_ref().display()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Highest stored level
    pub fn latest_level(&self) -> Option<u32> {
        self.levels.keys().next_back().copied()
    }

    pub fn entry(&self, level: u32) -> Option<&PuzzleEntry> {
        self.levels.get(&level)
    }

    /// Parsed board of `level`
    pub fn board(&self, level: u32) -> Result<Board> {
        let entry = self
            .entry(level)
            .with_context(|| format!("Level {} is not in the puzzle store", level))?;
        entry
            .board()
            .with_context(|| format!("Level {} has an invalid board", level))
    }

    /// Add a level; an existing level is never overwritten.
    /// Returns whether the level was inserted.
    pub fn insert(&mut self, level: u32, board_str: impl Into<String>) -> bool {
        if self.levels.contains_key(&level) {
            return false;
        }
        self.levels.insert(level, PuzzleEntry::new(board_str));
        true
    }

    pub fn set_solution(&mut self, level: u32, solution: impl Into<String>) -> Result<()> {
        let entry = self
            .levels
            .get_mut(&level)
            .with_context(|| format!("Level {} is not in the puzzle store", level))?;
        entry.solution = solution.into();
        Ok(())
    }

    /// Levels that have no solution yet, ascending
    pub fn pending_levels(&self) -> Vec<u32> {
        self.levels
            .iter()
            .filter(|(_, entry)| !entry.is_solved())
            .map(|(&level, _)| level)
            .collect()
    }

    pub fn levels(&self) -> impl Iterator<Item = (u32, &PuzzleEntry)> {
        self.levels.iter().map(|(&level, entry)| (level, entry))
    }
}

/// Write a small store of sample levels for trying the solver out
pub fn create_sample_store<P: AsRef<Path>>(path: P) -> Result<()> {
    let mut store = PuzzleStore::new();
    store.insert(1, "11,11");
    store.insert(2, "121,010");
    store.insert(3, "1001,1220");
    store.insert(4, "110,121,011");
    store.save(path)
}
