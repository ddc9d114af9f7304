//! Game state and core simulation types
//!
//! Everything a session mutates lives here, owned by the game loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the begin signal
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, showing final score and leaderboard
    GameOver,
}

/// Stable handle for a timed entity
pub type EntityId = u32;

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Restores health
    Heart,
    /// Grants a short immunity window
    PowerUp,
}

impl EntityKind {
    /// Default time on the ground before it vanishes
    pub fn default_life(&self) -> f32 {
        match self {
            EntityKind::Heart => HEART_LIFE,
            EntityKind::PowerUp => POWERUP_LIFE,
        }
    }

    /// Drop position relative to the spawn anchor (enemy x, ground y)
    pub fn spawn_offset(&self) -> Vec2 {
        match self {
            EntityKind::Heart => Vec2::new(-20.0, -20.0),
            EntityKind::PowerUp => Vec2::new(20.0, -20.0),
        }
    }
}

/// A collectible with a countdown to automatic removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Seconds until expiry
    pub remaining_life: f32,
    /// Where the host should draw it
    pub pos: Vec2,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Touched the enemy while not immune
    EnemyCollision,
    /// Player fell past the bottom of the level
    OutOfBounds,
    /// Enemy fell past the bottom of the level
    EnemyOutOfBounds,
    /// Health drained to zero
    HealthDepleted,
}

/// Audio cues for the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Heart picked up
    HeartCollected,
    /// Power-up picked up
    PowerUpCollected,
    /// Run ended
    Death,
    /// Final score made the leaderboard's top spot
    NewHighScore,
}

/// Result of a player state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub lost: bool,
}

impl TickOutcome {
    pub const LOST: Self = Self { lost: true };
    pub const ALIVE: Self = Self { lost: false };
}

/// Health, immunity and score for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    health: u32,
    immune_remaining: f32,
    score: u64,
    score_tick_accumulator: f64,
    health_drain_accumulator: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    /// Fresh state at the start of a session
    pub fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            immune_remaining: 0.0,
            score: 0,
            score_tick_accumulator: 0.0,
            health_drain_accumulator: 0.0,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_immune(&self) -> bool {
        self.immune_remaining > 0.0
    }

    /// Seconds of immunity left, 0 when not immune
    pub fn immune_remaining(&self) -> f32 {
        self.immune_remaining
    }

    /// Heal and score for a collected heart
    pub fn apply_heart_pickup(&mut self, rules: &Settings) {
        self.health = (self.health + rules.heart_heal).min(MAX_HEALTH);
        self.score += rules.heart_score;
    }

    /// Start (or restart) the immunity window and score a power-up
    pub fn apply_powerup_pickup(&mut self, rules: &Settings) {
        // Replaces the remaining window, never adds to it.
        self.immune_remaining = rules.immunity_duration;
        self.score += rules.powerup_score;
    }

    /// Advance timers by `dt` seconds
    ///
    /// Order matters: passive score, then immunity, then health drain. The
    /// outcome is lost when the drain empties health this tick.
    pub fn tick(&mut self, dt: f32, rules: &Settings) -> TickOutcome {
        let elapsed = f64::from(dt);

        if rules.passive_scoring {
            self.score_tick_accumulator += elapsed;
            let ticks = whole_periods(self.score_tick_accumulator, SCORE_TICK_PERIOD);
            if ticks > 0.0 {
                self.score += ticks as u64;
                self.score_tick_accumulator -= ticks * SCORE_TICK_PERIOD;
            }
        }

        if self.is_immune() {
            self.immune_remaining -= dt;
            if self.immune_remaining <= 0.0 {
                self.immune_remaining = 0.0;
            }
        }

        let period = f64::from(rules.drain_period.max(MIN_DRAIN_PERIOD));
        self.health_drain_accumulator += elapsed;
        let steps = whole_periods(self.health_drain_accumulator, period);
        if steps > 0.0 {
            self.health_drain_accumulator -= steps * period;
            let steps = steps.min(f64::from(MAX_DRAIN_STEPS)) as u32;
            self.health = self.health.saturating_sub(steps * HEALTH_DRAIN_STEP);
        }

        if self.health == 0 {
            TickOutcome::LOST
        } else {
            TickOutcome::ALIVE
        }
    }

    /// Touching the enemy is fatal unless immune
    pub fn on_enemy_collision(&self) -> TickOutcome {
        TickOutcome {
            lost: !self.is_immune(),
        }
    }

    /// Falling off the level is always fatal
    pub fn on_out_of_bounds(&self) -> TickOutcome {
        TickOutcome::LOST
    }
}

/// Whole periods in `acc`, counting one that is short only by rounding
fn whole_periods(acc: f64, period: f64) -> f64 {
    ((acc + TIMER_EPSILON) / period).floor().max(0.0)
}
