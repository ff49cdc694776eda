//! High score leaderboard
//!
//! All-time list of (name, score) pairs. Survives game resets; never
//! persisted by the core.

use serde::{Deserialize, Serialize};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Fixed-width player name
    pub name: String,
    pub score: u64,
}

/// High score leaderboard, kept sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Pad with spaces or truncate so the name is exactly `max_len` characters
pub fn format_name(name: &str, max_len: usize) -> String {
    let trimmed: String = name
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect();
    format!("{:<width$}", trimmed, width = max_len)
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a score. Returns the rank achieved (1-indexed).
    ///
    /// Ties rank below existing entries with the same score.
    pub fn add_score(&mut self, name: &str, score: u64, max_name_len: usize) -> usize {
        let entry = HighScoreEntry {
            name: format_name(name, max_name_len),
            score,
        };

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

        log::info!("High score {} recorded at rank {}", score, rank);
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best of the recorded scores and `current`
    pub fn best_with(&self, current: u64) -> u64 {
        self.top_score().map_or(current, |top| top.max(current))
    }

    /// "SCREEN OF FAME" lines: `"{rank}. {name} {score}"`
    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} {}", i + 1, e.name, e.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name_pads_and_truncates() {
        assert_eq!(format_name("ab", 4), "ab  ");
        assert_eq!(format_name("abcdef", 4), "abcd");
        assert_eq!(format_name("", 4), "    ");
        assert_eq!(format_name("a\nb", 4), "ab  ");
    }

    #[test]
    fn test_entries_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("one", 100, 4), 1);
        assert_eq!(scores.add_score("two", 300, 4), 1);
        assert_eq!(scores.add_score("three", 200, 4), 2);
        assert_eq!(scores.add_score("four", 200, 4), 3);

        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_best_with() {
        let mut scores = HighScores::new();
        assert_eq!(scores.best_with(42), 42);
        scores.add_score("abc", 100, 4);
        assert_eq!(scores.best_with(42), 100);
        assert_eq!(scores.best_with(500), 500);
    }

    #[test]
    fn test_leaderboard_lines() {
        let mut scores = HighScores::new();
        scores.add_score("zed", 10, 4);
        scores.add_score("amy", 20, 4);
        assert_eq!(
            scores.leaderboard_lines(),
            vec!["1. amy  20".to_string(), "2. zed  10".to_string()]
        );
    }
}
