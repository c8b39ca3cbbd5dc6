//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs by hit count.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Hits landed in the run
    pub hits: u32,
    /// Whether the run reached the win threshold
    pub won: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pop_the_lock_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, hits: u32) -> bool {
        if hits == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| hits > e.hits).unwrap_or(true)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) if it made the board.
    pub fn add_score(&mut self, hits: u32, won: bool, timestamp: f64) -> Option<usize> {
        if !self.qualifies(hits) {
            return None;
        }

        let entry = HighScoreEntry {
            hits,
            won,
            timestamp,
        };

        // Sorted descending; ties keep the older run first
        let pos = self.entries.iter().position(|e| hits > e.hits);
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

    /// Best hit count so far
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.hits)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hits_never_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.top_score(), None);
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(5, false, 1.0), Some(1));
        assert_eq!(scores.add_score(12, false, 2.0), Some(1));
        assert_eq!(scores.add_score(8, false, 3.0), Some(2));
        let hits: Vec<u32> = scores.entries.iter().map(|e| e.hits).collect();
        assert_eq!(hits, vec![12, 8, 5]);
        assert_eq!(scores.top_score(), Some(12));
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for hits in 1..=MAX_HIGH_SCORES as u32 {
            scores.add_score(hits, false, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Lowest entry is 1; tying it is not enough
        assert!(!scores.qualifies(1));
        assert_eq!(scores.add_score(50, true, 0.0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.hits), Some(2));
        assert!(scores.entries[0].won);
    }
}
