//! Pickup spawn scheduling
//!
//! The enemy drops a heart every few seconds, sometimes with a power-up.
//! Seeded per session so a replay with the same inputs spawns identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::EntityKind;
use crate::consts::{MAX_DROPS_PER_ADVANCE, MIN_SPAWN_INTERVAL};
use crate::settings::Settings;

/// Something the scheduler wants spawned this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub life: f32,
    pub pos: Vec2,
}

/// Countdown to the next drop
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    rng: Pcg32,
    /// Seconds until the next drop
    next_in: f32,
}

impl SpawnScheduler {
    /// First drop happens on the first advance
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_in: 0.0,
        }
    }

    /// Seconds until the next drop
    pub fn next_in(&self) -> f32 {
        self.next_in
    }

    /// Advance by `dt`; returns the drops that came due
    pub fn advance(&mut self, dt: f32, anchor: Vec2, rules: &Settings) -> Vec<SpawnRequest> {
        let mut due = Vec::new();
        self.next_in -= dt;
        for _ in 0..MAX_DROPS_PER_ADVANCE {
            if self.next_in > 0.0 {
                break;
            }
            due.push(Self::request(EntityKind::Heart, rules.heart_life, anchor));
            if self.rng.random_bool(rules.powerup_spawn_chance) {
                due.push(Self::request(EntityKind::PowerUp, rules.powerup_life, anchor));
            }
            self.next_in += self.roll_interval(rules);
        }
        if self.next_in <= 0.0 {
            // Backlog too deep to catch up; drop it and start a fresh countdown.
            self.next_in = self.roll_interval(rules);
        }
        due
    }

    fn roll_interval(&mut self, rules: &Settings) -> f32 {
        let min = rules.spawn_interval_min.max(MIN_SPAWN_INTERVAL);
        if rules.spawn_interval_max > min {
            self.rng.random_range(min..=rules.spawn_interval_max)
        } else {
            min
        }
    }

    fn request(kind: EntityKind, life: f32, anchor: Vec2) -> SpawnRequest {
        SpawnRequest {
            kind,
            life,
            pos: anchor + kind.spawn_offset(),
        }
    }
}
