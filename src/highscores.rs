//! High score leaderboard
//!
//! A plain text file with one decimal score per line, appended at the end of
//! every round that scored. The leading score is the maximum over all lines.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// IO error reading or appending the leaderboard file
    #[error("leaderboard IO error: {0}")]
    Io(#[from] io::Error),
}

/// Every score recorded so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<u64>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all entries. A missing file is an empty leaderboard; lines that
    /// are not a non-negative integer are skipped.
    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let board = Self::parse(&text);
        log::info!(
            "Loaded {} scores from {} (leading {})",
            board.entries.len(),
            path.display(),
            board.top_score()
        );
        Ok(board)
    }

    /// Parse leaderboard text, skipping blank and malformed lines
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                match line.parse::<u64>() {
                    Ok(score) => Some(score),
                    Err(_) => {
                        log::warn!("Skipping malformed leaderboard line {}: '{}'", i + 1, line);
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    /// Append one score as a new line, creating the file if needed
    pub fn append(path: &Path, score: u64) -> Result<(), LeaderboardError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{score}")?;
        log::info!("Score {} added to {}", score, path.display());
        Ok(())
    }

    /// All-time maximum, 0 when nothing is recorded
    pub fn top_score(&self) -> u64 {
        self.entries.iter().copied().max().unwrap_or(0)
    }
}
