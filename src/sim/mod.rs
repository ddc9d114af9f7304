//! Deterministic game-state core
//!
//! All gameplay rules live here. This module must stay pure:
//! - Time comes in as an explicit `dt`, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod entities;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entities::{Expired, TimedEntityRegistry};
pub use spawn::{SpawnRequest, SpawnScheduler};
pub use state::{
    EntityId, EntityKind, GamePhase, LossReason, PlayerState, SoundCue, TickOutcome, TimedEntity,
};
pub use tick::{FrameInput, FrameReport, GameLoop, GameOverSummary, Spawned};
