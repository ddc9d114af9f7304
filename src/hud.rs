//! HUD text and colours
//!
//! The host owns layout; these are just the strings and tints it shows.

use crate::highscores::TopScores;
use crate::sim::PlayerState;

/// Colour band for the health readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    Healthy,
    Warning,
    Critical,
}

impl HealthTier {
    pub fn from_health(health: u32) -> Self {
        if health <= 30 {
            HealthTier::Critical
        } else if health <= 60 {
            HealthTier::Warning
        } else {
            HealthTier::Healthy
        }
    }

    /// Text colour as RGB
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            HealthTier::Healthy => (0, 255, 0),
            HealthTier::Warning => (255, 165, 0),
            HealthTier::Critical => (255, 0, 0),
        }
    }
}

pub fn score_label(score: u64) -> String {
    format!("Score: {score}")
}

pub fn health_label(health: u32) -> String {
    format!("Health: {health}")
}

/// Immunity countdown, `None` when not immune
pub fn immune_label(player: &PlayerState) -> Option<String> {
    player
        .is_immune()
        .then(|| format!("Immune: {:.1}s", player.immune_remaining()))
}

/// "1. 50", "2. 40", ... for the game-over screen
pub fn top_score_lines(top: &TopScores) -> Vec<String> {
    top.iter()
        .enumerate()
        .map(|(i, score)| format!("{}. {}", i + 1, score))
        .collect()
}
