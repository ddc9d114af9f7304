//! Top score leaderboard
//!
//! Keeps the best three scores across runs as a JSON array under
//! `topScores`. A missing or unreadable record reads as `[0, 0, 0]`.

use crate::error::{CoreError, Result};
use crate::persistence::ScoreStore;

/// Number of scores kept
pub const MAX_HIGH_SCORES: usize = 3;

/// Best scores, sorted descending
pub type TopScores = [u64; MAX_HIGH_SCORES];

/// Persisted top-3 leaderboard
#[derive(Debug, Clone)]
pub struct Leaderboard<S: ScoreStore> {
    store: S,
    top: TopScores,
}

impl<S: ScoreStore> Leaderboard<S> {
    /// Storage key, shared with earlier builds of the game
    pub const STORAGE_KEY: &'static str = "topScores";

    /// Open the leaderboard, reading the current record once
    pub fn new(store: S) -> Self {
        let mut board = Self {
            store,
            top: [0; MAX_HIGH_SCORES],
        };
        board.top = board.load();
        board
    }

    /// Read persisted scores, `[0, 0, 0]` if none or unreadable
    pub fn load(&self) -> TopScores {
        match self.try_load() {
            Ok(Some(top)) => top,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                [0; MAX_HIGH_SCORES]
            }
            Err(e) => {
                log::warn!("Discarding high scores: {}", e);
                [0; MAX_HIGH_SCORES]
            }
        }
    }

    fn try_load(&self) -> Result<Option<TopScores>> {
        let Some(json) = self.store.read(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        let scores: Vec<u64> = serde_json::from_str(&json)
            .map_err(|e| CoreError::CorruptPersistedState(e.to_string()))?;
        Ok(Some(normalize(scores)))
    }

    /// Record a finished run and return the new top three
    ///
    /// Every call records, so the same score submitted twice occupies two
    /// slots. A failed write is logged; the returned scores still reflect the
    /// new run.
    pub fn record_score(&mut self, score: u64) -> TopScores {
        let mut scores = self.load().to_vec();
        scores.push(score);
        self.top = normalize(scores);

        if let Err(e) = self.persist() {
            log::error!("Failed to save high scores: {}", e);
        } else {
            log::info!("High scores saved: {:?}", self.top);
        }
        self.top
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.top)?;
        self.store.write(Self::STORAGE_KEY, &json)
    }

    /// Scores as of the last load/record
    pub fn top_scores(&self) -> TopScores {
        self.top
    }

    /// Best score so far
    pub fn top_score(&self) -> u64 {
        self.top[0]
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && score > self.top[MAX_HIGH_SCORES - 1]
    }

    /// Rank (1-indexed) a recorded score holds on the board
    pub fn rank_of(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        self.top.iter().position(|&s| s == score).map(|i| i + 1)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Sort descending, then pad or truncate to exactly three entries
fn normalize(mut scores: Vec<u64>) -> TopScores {
    scores.sort_unstable_by(|a, b| b.cmp(a));
    let mut top = [0; MAX_HIGH_SCORES];
    for (slot, score) in top.iter_mut().zip(scores) {
        *slot = score;
    }
    top
}
