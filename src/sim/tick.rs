//! Per-frame game loop
//!
//! Drives a session through `Start -> Playing -> GameOver -> Playing`.
//! The host reports what happened this frame (collisions, falls, elapsed
//! time) and gets back what changed (spawns, expiries, sounds, loss).

use glam::Vec2;

use super::entities::{Expired, TimedEntityRegistry};
use super::spawn::SpawnScheduler;
use super::state::{EntityId, EntityKind, GamePhase, LossReason, PlayerState, SoundCue};
use crate::error::CoreError;
use crate::highscores::{Leaderboard, TopScores};
use crate::persistence::ScoreStore;
use crate::settings::Settings;

/// Events reported by the host for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Hearts the player touched
    pub hearts_collected: Vec<EntityId>,
    /// Power-ups the player touched
    pub powerups_collected: Vec<EntityId>,
    /// Player touched the enemy
    pub enemy_collision: bool,
    /// Player fell off the bottom of the level
    pub out_of_bounds: bool,
    /// Enemy fell off the bottom of the level
    pub enemy_out_of_bounds: bool,
    /// Where drops appear (enemy x, ground y)
    pub spawn_anchor: Option<Vec2>,
}

/// An entity spawned this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawned {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
}

/// What changed during a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub spawned: Vec<Spawned>,
    pub expired: Vec<Expired>,
    pub cues: Vec<SoundCue>,
    /// Set on the frame the run ended
    pub lost: Option<LossReason>,
}

/// Display data for the game-over screen
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub final_score: u64,
    pub top_scores: TopScores,
    /// Leaderboard position of this run, if it placed
    pub rank: Option<usize>,
    pub reason: LossReason,
}

/// Session controller: owns the player, pickups and leaderboard
#[derive(Debug)]
pub struct GameLoop<S: ScoreStore> {
    settings: Settings,
    phase: GamePhase,
    player: PlayerState,
    entities: TimedEntityRegistry,
    spawner: SpawnScheduler,
    leaderboard: Leaderboard<S>,
    seed: u64,
    session_index: u64,
    game_over: Option<GameOverSummary>,
}

impl<S: ScoreStore> GameLoop<S> {
    /// Create a loop on the start screen
    pub fn new(settings: Settings, leaderboard: Leaderboard<S>, seed: u64) -> Self {
        Self {
            settings: settings.validated(),
            phase: GamePhase::Start,
            player: PlayerState::new(),
            entities: TimedEntityRegistry::new(),
            spawner: SpawnScheduler::new(seed),
            leaderboard,
            seed,
            session_index: 0,
            game_over: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn entities(&self) -> &TimedEntityRegistry {
        &self.entities
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of sessions started so far
    pub fn session_index(&self) -> u64 {
        self.session_index
    }

    /// Summary of the last finished run
    pub fn game_over(&self) -> Option<&GameOverSummary> {
        self.game_over.as_ref()
    }

    /// Leave the start screen
    pub fn begin_session(&mut self) {
        match self.phase {
            GamePhase::Start => self.reset_session(),
            phase => log::debug!("begin_session ignored in {:?}", phase),
        }
    }

    /// Play again from the game-over screen
    pub fn restart_session(&mut self) {
        match self.phase {
            GamePhase::GameOver => self.reset_session(),
            phase => log::debug!("restart_session ignored in {:?}", phase),
        }
    }

    fn reset_session(&mut self) {
        self.session_index += 1;
        self.player = PlayerState::new();
        self.entities.clear();
        self.spawner = SpawnScheduler::new(self.seed.wrapping_add(self.session_index));
        self.game_over = None;
        self.phase = GamePhase::Playing;
        log::info!("Session {} started", self.session_index);
    }

    /// Clamp host-supplied frame time into `[0, max_frame_dt]`
    fn sanitize_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        dt.min(self.settings.max_frame_dt)
    }

    /// Advance one frame. Only runs while playing.
    pub fn tick(&mut self, dt: f32, input: &FrameInput) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != GamePhase::Playing {
            return report;
        }
        let dt = self.sanitize_dt(dt);

        // Collections first so a pickup touched on its last frame is
        // collected rather than expired.
        for &id in &input.hearts_collected {
            self.collect(id, EntityKind::Heart, &mut report);
        }
        for &id in &input.powerups_collected {
            self.collect(id, EntityKind::PowerUp, &mut report);
        }

        // First trigger wins; later ones still run.
        let mut loss: Option<LossReason> = None;
        if input.enemy_collision && self.player.on_enemy_collision().lost {
            loss = loss.or(Some(LossReason::EnemyCollision));
        }
        if input.out_of_bounds && self.player.on_out_of_bounds().lost {
            loss = loss.or(Some(LossReason::OutOfBounds));
        }
        if input.enemy_out_of_bounds {
            loss = loss.or(Some(LossReason::EnemyOutOfBounds));
        }
        if self.player.tick(dt, &self.settings).lost {
            loss = loss.or(Some(LossReason::HealthDepleted));
        }

        report.expired = self.entities.tick(dt);

        match loss {
            Some(reason) => self.end_session(reason, &mut report),
            None => self.spawn_due(dt, input.spawn_anchor.unwrap_or(Vec2::ZERO), &mut report),
        }
        report
    }

    fn collect(&mut self, id: EntityId, reported: EntityKind, report: &mut FrameReport) {
        let kind = match self.entities.collect(id) {
            Ok(kind) => kind,
            Err(CoreError::NotFound(_)) => {
                log::debug!("Pickup {} already gone", id);
                return;
            }
            Err(e) => {
                log::warn!("Pickup {} failed: {}", id, e);
                return;
            }
        };
        if kind != reported {
            log::warn!("Pickup {} reported as {:?} but is {:?}", id, reported, kind);
        }

        match kind {
            EntityKind::Heart => {
                self.player.apply_heart_pickup(&self.settings);
                report.cues.push(SoundCue::HeartCollected);
            }
            EntityKind::PowerUp => {
                self.player.apply_powerup_pickup(&self.settings);
                report.cues.push(SoundCue::PowerUpCollected);
            }
        }
        log::debug!(
            "Collected {:?} {} (health {}, score {})",
            kind,
            id,
            self.player.health(),
            self.player.score()
        );
    }

    fn spawn_due(&mut self, dt: f32, anchor: Vec2, report: &mut FrameReport) {
        for req in self.spawner.advance(dt, anchor, &self.settings) {
            let id = self.entities.spawn_at(req.kind, req.life, req.pos);
            log::debug!("Spawned {:?} {} at {}", req.kind, id, req.pos);
            report.spawned.push(Spawned {
                id,
                kind: req.kind,
                pos: req.pos,
            });
        }
    }

    fn end_session(&mut self, reason: LossReason, report: &mut FrameReport) {
        let final_score = self.player.score();
        let previous_best = self.leaderboard.top_score();
        let top_scores = self.leaderboard.record_score(final_score);
        let rank = self.leaderboard.rank_of(final_score);

        report.lost = Some(reason);
        report.cues.push(SoundCue::Death);
        if final_score > previous_best {
            report.cues.push(SoundCue::NewHighScore);
        }

        log::info!(
            "Session {} over ({:?}): score {}, top {:?}",
            self.session_index,
            reason,
            final_score,
            top_scores
        );
        self.game_over = Some(GameOverSummary {
            final_score,
            top_scores,
            rank,
            reason,
        });
        self.phase = GamePhase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_DROPS_PER_ADVANCE;
    use crate::persistence::MemoryStore;

    fn new_loop(settings: Settings) -> GameLoop<MemoryStore> {
        GameLoop::new(settings, Leaderboard::new(MemoryStore::new()), 12345)
    }

    /// Loop with spawning pushed far into the future
    fn quiet_loop() -> GameLoop<MemoryStore> {
        let mut game = new_loop(Settings {
            spawn_interval_min: 1000.0,
            spawn_interval_max: 1000.0,
            powerup_spawn_chance: 0.0,
            ..Settings::default()
        });
        game.begin_session();
        // Swallow the opening drop
        let report = game.tick(0.0, &FrameInput::default());
        for s in report.spawned {
            game.entities.collect(s.id).unwrap();
        }
        game
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_start_to_playing() {
        let mut game = new_loop(Settings::default());
        assert_eq!(game.phase(), GamePhase::Start);

        // Ticking before begin does nothing
        let report = game.tick(1.0, &idle());
        assert_eq!(report, FrameReport::default());
        assert_eq!(game.player().score(), 0);

        game.restart_session();
        assert_eq!(game.phase(), GamePhase::Start);

        game.begin_session();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session_index(), 1);
    }

    #[test]
    fn test_first_frame_spawns_heart() {
        let mut game = new_loop(Settings::default());
        game.begin_session();
        let input = FrameInput {
            spawn_anchor: Some(Vec2::new(400.0, 590.0)),
            ..Default::default()
        };
        let report = game.tick(0.016, &input);
        assert_eq!(report.spawned[0].kind, EntityKind::Heart);
        assert_eq!(report.spawned[0].pos, Vec2::new(380.0, 570.0));
        assert!(game.entities().get(report.spawned[0].id).is_some());
    }

    #[test]
    fn test_five_idle_seconds() {
        let mut game = quiet_loop();
        for _ in 0..5 {
            let report = game.tick(1.0, &idle());
            assert_eq!(report.lost, None);
        }
        assert_eq!(game.player().score(), 5);
        assert_eq!(game.player().health(), 80);
    }

    #[test]
    fn test_heart_pickup_applies_once() {
        let mut game = quiet_loop();
        game.player.tick(5.0, &game.settings);
        let health = game.player().health();
        let score = game.player().score();

        let id = game.entities.spawn(EntityKind::Heart, 20.0);
        let input = FrameInput {
            hearts_collected: vec![id, id],
            ..Default::default()
        };
        let report = game.tick(0.0, &input);
        assert_eq!(report.cues, vec![SoundCue::HeartCollected]);
        assert_eq!(game.player().health(), health + 10);
        assert_eq!(game.player().score(), score + 1);

        // Reporting it again next frame is ignored
        let report = game.tick(0.0, &input);
        assert!(report.cues.is_empty());
        assert_eq!(game.player().score(), score + 1);
    }

    #[test]
    fn test_collection_beats_expiry() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::Heart, 0.5);
        let input = FrameInput {
            hearts_collected: vec![id],
            ..Default::default()
        };
        let report = game.tick(1.0, &input);
        assert!(report.expired.is_empty());
        assert_eq!(report.cues, vec![SoundCue::HeartCollected]);
    }

    #[test]
    fn test_expired_pickup_cannot_be_collected() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::PowerUp, 0.5);
        let report = game.tick(0.5, &idle());
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.expired[0].id, id);

        let input = FrameInput {
            powerups_collected: vec![id],
            ..Default::default()
        };
        game.tick(0.0, &input);
        assert!(!game.player().is_immune());
    }

    #[test]
    fn test_mislabelled_pickup_uses_real_kind() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::PowerUp, 10.0);
        let input = FrameInput {
            hearts_collected: vec![id],
            ..Default::default()
        };
        let report = game.tick(0.0, &input);
        assert_eq!(report.cues, vec![SoundCue::PowerUpCollected]);
        assert!(game.player().is_immune());
    }

    #[test]
    fn test_powerup_blocks_enemy_until_expired() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::PowerUp, 10.0);
        let input = FrameInput {
            powerups_collected: vec![id],
            ..Default::default()
        };
        game.tick(0.0, &input);

        let hit = FrameInput {
            enemy_collision: true,
            ..Default::default()
        };
        let report = game.tick(1.0, &hit);
        assert_eq!(report.lost, None);
        assert_eq!(game.phase(), GamePhase::Playing);

        for _ in 0..4 {
            game.tick(1.0, &idle());
        }
        assert!(!game.player().is_immune());

        let report = game.tick(0.0, &hit);
        assert_eq!(report.lost, Some(LossReason::EnemyCollision));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_powerup_and_enemy_same_frame() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::PowerUp, 10.0);
        let input = FrameInput {
            powerups_collected: vec![id],
            enemy_collision: true,
            ..Default::default()
        };
        let report = game.tick(0.016, &input);
        assert_eq!(report.lost, None);
    }

    #[test]
    fn test_out_of_bounds_while_immune() {
        let mut game = quiet_loop();
        let id = game.entities.spawn(EntityKind::PowerUp, 10.0);
        let input = FrameInput {
            powerups_collected: vec![id],
            out_of_bounds: true,
            ..Default::default()
        };
        let report = game.tick(0.016, &input);
        assert_eq!(report.lost, Some(LossReason::OutOfBounds));
    }

    #[test]
    fn test_enemy_falling_ends_run() {
        let mut game = quiet_loop();
        let input = FrameInput {
            enemy_out_of_bounds: true,
            ..Default::default()
        };
        assert_eq!(game.tick(0.016, &input).lost, Some(LossReason::EnemyOutOfBounds));
    }

    #[test]
    fn test_health_depletion_records_score() {
        let mut game = quiet_loop();
        let mut frames = 0;
        loop {
            let report = game.tick(0.5, &idle());
            frames += 1;
            if let Some(reason) = report.lost {
                assert_eq!(reason, LossReason::HealthDepleted);
                assert!(report.cues.contains(&SoundCue::Death));
                break;
            }
        }
        // 10 drain periods of 2.5s
        assert_eq!(frames, 50);
        let summary = game.game_over().unwrap();
        assert_eq!(summary.final_score, 25);
        assert_eq!(summary.top_scores, [25, 0, 0]);
        assert_eq!(summary.rank, Some(1));
        assert_eq!(game.leaderboard().load(), [25, 0, 0]);
    }

    #[test]
    fn test_simultaneous_losses_record_once() {
        let mut game = quiet_loop();
        game.player.tick(22.5, &game.settings);
        assert_eq!(game.player().health(), 10);

        let id = game.entities.spawn(EntityKind::PowerUp, 10.0);
        let input = FrameInput {
            powerups_collected: vec![id],
            enemy_collision: true,
            out_of_bounds: true,
            ..Default::default()
        };
        let report = game.tick(1.0, &input);
        assert_eq!(report.lost, Some(LossReason::OutOfBounds));
        assert_eq!(report.cues.iter().filter(|c| **c == SoundCue::Death).count(), 1);

        // Final score includes pickup and passive points from the same frame
        let summary = game.game_over().unwrap().clone();
        assert_eq!(summary.final_score, 22 + 5 + 1);
        assert_eq!(game.leaderboard().top_scores(), [28, 0, 0]);

        // Game over is idle
        assert_eq!(game.tick(1.0, &input), FrameReport::default());
        assert_eq!(game.leaderboard().top_scores(), [28, 0, 0]);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = quiet_loop();
        game.tick(1.0, &idle());
        game.tick(
            0.0,
            &FrameInput {
                out_of_bounds: true,
                ..Default::default()
            },
        );
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.begin_session();
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.restart_session();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session_index(), 2);
        assert_eq!(game.player(), &PlayerState::new());
        assert!(game.entities().is_empty());
        assert!(game.game_over().is_none());
        assert_eq!(game.leaderboard().top_scores(), [1, 0, 0]);
    }

    #[test]
    fn test_stale_pickup_after_restart() {
        let mut game = quiet_loop();
        let old = game.entities.spawn(EntityKind::PowerUp, 10.0);
        game.tick(
            0.0,
            &FrameInput {
                out_of_bounds: true,
                ..Default::default()
            },
        );
        game.restart_session();

        let input = FrameInput {
            powerups_collected: vec![old],
            ..Default::default()
        };
        let report = game.tick(0.0, &input);
        assert!(!report.cues.contains(&SoundCue::PowerUpCollected));
        assert!(!game.player().is_immune());
        assert!(report.spawned.iter().all(|s| s.id > old));
    }

    #[test]
    fn test_tiny_drain_period_from_settings() {
        let mut game = new_loop(Settings {
            drain_period: 1e-9,
            ..Settings::default()
        });
        game.begin_session();
        let report = game.tick(1.0, &idle());
        assert_eq!(report.lost, Some(LossReason::HealthDepleted));
        assert_eq!(game.player().health(), 0);
    }

    #[test]
    fn test_tiny_spawn_interval_from_settings() {
        let mut game = new_loop(Settings {
            spawn_interval_min: 1e-9,
            spawn_interval_max: 1e-9,
            ..Settings::default()
        });
        game.begin_session();
        let report = game.tick(1.0, &idle());
        let hearts = report
            .spawned
            .iter()
            .filter(|s| s.kind == EntityKind::Heart)
            .count();
        assert!((1..=MAX_DROPS_PER_ADVANCE).contains(&hearts));
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_sixty_fps_ticks() {
        let mut game = quiet_loop();
        for _ in 0..60 {
            game.tick(1.0 / 60.0, &idle());
        }
        assert_eq!(game.player().score(), 1);
        for _ in 60..150 {
            game.tick(1.0 / 60.0, &idle());
        }
        assert_eq!(game.player().health(), 90);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut game = quiet_loop();
        game.tick(-5.0, &idle());
        game.tick(f32::NAN, &idle());
        game.tick(f32::INFINITY, &idle());
        assert_eq!(game.player().score(), 0);
        assert_eq!(game.player().health(), 100);
    }

    #[test]
    fn test_large_dt_is_capped() {
        let mut game = quiet_loop();
        game.tick(30.0, &idle());
        assert_eq!(game.player().score(), 1);
        assert_eq!(game.player().health(), 100);
    }

    #[test]
    fn test_new_high_score_cue() {
        let store = MemoryStore::new().with_value("topScores", "[3,2,1]");
        let mut game = GameLoop::new(Settings::default(), Leaderboard::new(store), 1);
        game.begin_session();
        for _ in 0..5 {
            game.tick(1.0, &idle());
        }
        let report = game.tick(
            0.0,
            &FrameInput {
                out_of_bounds: true,
                ..Default::default()
            },
        );
        assert!(report.cues.contains(&SoundCue::NewHighScore));
        assert_eq!(game.game_over().unwrap().top_scores[0], game.player().score());
    }

    #[test]
    fn test_determinism() {
        let mut a = new_loop(Settings::default());
        let mut b = new_loop(Settings::default());
        a.begin_session();
        b.begin_session();
        for _ in 0..600 {
            assert_eq!(a.tick(0.05, &idle()), b.tick(0.05, &idle()));
        }
        assert_eq!(a.player(), b.player());
        assert_eq!(a.entities().len(), b.entities().len());
    }
}
