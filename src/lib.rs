//! Ghosty Chase - game-state core for a 2D chase platformer
//!
//! The player dodges a chasing ghost while picking up hearts (health) and
//! power-ups (immunity). Health drains over time; score grows each second.
//!
//! Core modules:
//! - `sim`: Deterministic game state, pickups and the per-frame loop
//! - `highscores`: Persisted top-3 leaderboard
//! - `persistence`: Storage backends (file, LocalStorage, memory)
//! - `settings`: Data-driven gameplay rules
//! - `hud`: Display strings for the host renderer

pub mod error;
pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::CoreError;
pub use highscores::{Leaderboard, TopScores};
pub use settings::Settings;
pub use sim::{FrameInput, FrameReport, GameLoop, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Full health
    pub const MAX_HEALTH: u32 = 100;
    /// Health lost per drain period
    pub const HEALTH_DRAIN_STEP: u32 = 10;
    /// Default seconds per drain step
    pub const DRAIN_PERIOD: f32 = 2.5;

    /// Shortest drain period settings may ask for (seconds)
    pub const MIN_DRAIN_PERIOD: f32 = 0.1;
    /// Drain steps that take full health to zero
    pub const MAX_DRAIN_STEPS: u32 = MAX_HEALTH / HEALTH_DRAIN_STEP;

    /// Seconds survived per passive score point
    pub const SCORE_TICK_PERIOD: f64 = 1.0;
    /// Slack on timer thresholds so a period lands on the frame that ends it
    pub const TIMER_EPSILON: f64 = 1e-6;

    /// Shortest gap between pickup drops (seconds)
    pub const MIN_SPAWN_INTERVAL: f32 = 0.1;
    /// Most drops a single advance may produce
    pub const MAX_DROPS_PER_ADVANCE: usize = 8;

    /// Immunity granted by a power-up (seconds)
    pub const IMMUNITY_DURATION: f32 = 5.0;

    /// Pickup lifetimes (seconds)
    pub const HEART_LIFE: f32 = 20.0;
    pub const POWERUP_LIFE: f32 = 10.0;

    /// Longest frame a tick simulates; longer gaps (tab in background) are cut
    pub const MAX_FRAME_DT: f32 = 1.0;
}
