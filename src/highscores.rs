//! High score leaderboard
//!
//! Tracks the top 10 scores across sessions. The storage medium is a JSON
//! file; a missing or corrupt file degrades to an empty leaderboard.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::ScoreStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score if it qualifies, returning the 1-indexed rank achieved
    pub fn add_score(&mut self, score: u64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let entry = HighScoreEntry { score, timestamp };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file, starting fresh on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Corrupt high score file {}: {e}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, json)
    }
}

/// File-backed score store satisfying the persistence contract
pub struct FileScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    pub fn open(path: PathBuf) -> Self {
        let scores = HighScores::load(&path);
        Self { path, scores }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for FileScoreStore {
    fn get_high_score(&self) -> u64 {
        self.scores.top_score().unwrap_or(0)
    }

    fn set_high_score(&mut self, candidate: u64) -> bool {
        let replaced = candidate > self.get_high_score();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.scores.add_score(candidate, timestamp);
        if let Err(e) = self.scores.save(&self.path) {
            log::warn!("Failed to save high scores: {e}");
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifies_and_ordering() {
        let mut hs = HighScores::new();
        assert!(!hs.qualifies(0));
        assert!(hs.qualifies(1));

        assert_eq!(hs.add_score(100, 1), Some(1));
        assert_eq!(hs.add_score(300, 2), Some(1));
        assert_eq!(hs.add_score(200, 3), Some(2));
        let scores: Vec<u64> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(hs.top_score(), Some(300));
    }

    #[test]
    fn test_leaderboard_trims_to_max() {
        let mut hs = HighScores::new();
        for i in 1..=15u64 {
            hs.add_score(i * 10, i);
        }
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        // Lowest retained is 60 (150, 140, ..., 60)
        assert_eq!(hs.entries.last().unwrap().score, 60);
        assert!(!hs.qualifies(50));
        assert!(hs.qualifies(70));
    }

    #[test]
    fn test_file_roundtrip_and_contract() {
        let path = std::env::temp_dir().join(format!(
            "deadline_dash_test_{}_highscores.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = FileScoreStore::open(path.clone());
        assert_eq!(store.get_high_score(), 0);
        assert!(store.set_high_score(500));
        assert!(!store.set_high_score(400));
        assert!(store.set_high_score(900));

        // Reopen from disk
        let store = FileScoreStore::open(path.clone());
        assert_eq!(store.get_high_score(), 900);
        assert_eq!(store.scores().entries.len(), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = std::env::temp_dir().join(format!(
            "deadline_dash_test_{}_corrupt.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json at all").unwrap();
        let hs = HighScores::load(&path);
        assert!(hs.is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
