//! Gameplay rules and tuning
//!
//! Persisted separately from the leaderboard. Loaded once at startup; every
//! field has a default so partial files keep working.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::persistence::ScoreStore;

/// Tunable gameplay rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Health ===
    /// Seconds of play per passive -10 health tick
    pub drain_period: f32,
    /// Health restored by a heart
    pub heart_heal: u32,

    // === Score ===
    /// Award +1 score per whole second survived, on top of pickup points
    pub passive_scoring: bool,
    /// Score for collecting a heart
    pub heart_score: u64,
    /// Score for collecting a power-up
    pub powerup_score: u64,

    // === Immunity ===
    /// Immunity window granted by a power-up (seconds)
    pub immunity_duration: f32,

    // === Pickups ===
    /// Seconds a heart stays on the ground
    pub heart_life: f32,
    /// Seconds a power-up stays on the ground
    pub powerup_life: f32,
    /// Shortest gap between spawns (seconds)
    pub spawn_interval_min: f32,
    /// Longest gap between spawns (seconds)
    pub spawn_interval_max: f32,
    /// Chance that a spawn also drops a power-up (0.0 - 1.0)
    pub powerup_spawn_chance: f64,

    // === Frame pacing ===
    /// Largest dt a single tick will simulate (seconds)
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drain_period: DRAIN_PERIOD,
            heart_heal: 10,

            passive_scoring: true,
            heart_score: 1,
            powerup_score: 5,

            immunity_duration: IMMUNITY_DURATION,

            heart_life: HEART_LIFE,
            powerup_life: POWERUP_LIFE,
            spawn_interval_min: 3.0,
            spawn_interval_max: 6.0,
            powerup_spawn_chance: 0.1,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Storage key / file stem
    pub const STORAGE_KEY: &'static str = "ghostySettings";

    /// Return a copy with nonsensical values replaced by defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.drain_period.is_finite() && self.drain_period > 0.0) {
            log::warn!("drain_period {} invalid, using {}", self.drain_period, defaults.drain_period);
            self.drain_period = defaults.drain_period;
        } else if self.drain_period < MIN_DRAIN_PERIOD {
            log::warn!("drain_period {} too short, using {}", self.drain_period, MIN_DRAIN_PERIOD);
            self.drain_period = MIN_DRAIN_PERIOD;
        }
        if !(self.immunity_duration.is_finite() && self.immunity_duration >= 0.0) {
            log::warn!("immunity_duration {} invalid, using default", self.immunity_duration);
            self.immunity_duration = defaults.immunity_duration;
        }
        if !(self.heart_life.is_finite() && self.heart_life > 0.0) {
            self.heart_life = defaults.heart_life;
        }
        if !(self.powerup_life.is_finite() && self.powerup_life > 0.0) {
            self.powerup_life = defaults.powerup_life;
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            log::warn!("max_frame_dt {} invalid, using default", self.max_frame_dt);
            self.max_frame_dt = defaults.max_frame_dt;
        }

        let min_ok = self.spawn_interval_min.is_finite() && self.spawn_interval_min > 0.0;
        let max_ok = self.spawn_interval_max.is_finite() && self.spawn_interval_max > 0.0;
        if !(min_ok && max_ok) {
            log::warn!("spawn interval invalid, using defaults");
            self.spawn_interval_min = defaults.spawn_interval_min;
            self.spawn_interval_max = defaults.spawn_interval_max;
        } else {
            if self.spawn_interval_min > self.spawn_interval_max {
                std::mem::swap(&mut self.spawn_interval_min, &mut self.spawn_interval_max);
            }
            if self.spawn_interval_min < MIN_SPAWN_INTERVAL {
                log::warn!("spawn interval below {}s, raising it", MIN_SPAWN_INTERVAL);
                self.spawn_interval_min = MIN_SPAWN_INTERVAL;
                self.spawn_interval_max = self.spawn_interval_max.max(MIN_SPAWN_INTERVAL);
            }
        }

        if !self.powerup_spawn_chance.is_finite() {
            self.powerup_spawn_chance = defaults.powerup_spawn_chance;
        }
        self.powerup_spawn_chance = self.powerup_spawn_chance.clamp(0.0, 1.0);
        self.heart_heal = self.heart_heal.min(MAX_HEALTH);

        self
    }

    /// Parse settings from JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {:?}", path);
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("No settings at {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a key/value store (LocalStorage on the web)
    pub fn load_from_store<S: ScoreStore>(store: &S) -> Self {
        match store.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded settings from storage");
                Self::from_json(&json)
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to a key/value store
    pub fn save_to_store<S: ScoreStore>(&self, store: &mut S) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.write(Self::STORAGE_KEY, &json).inspect_err(|e| {
            log::error!("Failed to save settings: {}", e);
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
