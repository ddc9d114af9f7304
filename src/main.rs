//! Ghosty Chase headless runner
//!
//! Plays one scripted session against the real rules and leaderboard, so the
//! core can be exercised without a renderer. Log level via `RUST_LOG`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ghosty_chase::hud;
    use ghosty_chase::persistence::FileStore;
    use ghosty_chase::sim::{EntityKind, FrameInput, GameLoop, GamePhase};
    use ghosty_chase::{Leaderboard, Settings};

    env_logger::init();
    log::info!("Ghosty Chase (headless) starting...");

    let settings = Settings::load_from("settings.json");
    let leaderboard = Leaderboard::new(FileStore::new("."));
    log::info!("Top scores: {:?}", leaderboard.top_scores());

    let mut game = GameLoop::new(settings, leaderboard, 0x6805_7e11);
    game.begin_session();

    // Scripted player: walks over each pickup a second after it lands and
    // bumps into the ghost after half a minute.
    const FRAME_DT: f32 = 1.0 / 60.0;
    const REACH_FRAMES: u32 = 60;
    const CONTACT_FRAME: u32 = 30 * 60;
    let anchor = glam::Vec2::new(400.0, 590.0);
    let mut pending: Vec<(u32, u32, EntityKind)> = Vec::new();
    let mut frame = 0u32;

    while game.phase() == GamePhase::Playing {
        let mut input = FrameInput {
            spawn_anchor: Some(anchor),
            enemy_collision: frame >= CONTACT_FRAME && frame % 60 == 0,
            ..Default::default()
        };
        for (_, id, kind) in pending.iter().filter(|(due, _, _)| *due <= frame) {
            match kind {
                EntityKind::Heart => input.hearts_collected.push(*id),
                EntityKind::PowerUp => input.powerups_collected.push(*id),
            }
        }
        pending.retain(|(due, _, _)| *due > frame);

        let report = game.tick(FRAME_DT, &input);
        for s in &report.spawned {
            pending.push((frame + REACH_FRAMES, s.id, s.kind));
        }
        for cue in &report.cues {
            log::debug!("cue {:?}", cue);
        }
        if frame % 60 == 0 {
            let player = game.player();
            log::info!(
                "{} | {} | {}",
                hud::score_label(player.score()),
                hud::health_label(player.health()),
                hud::immune_label(player).unwrap_or_default()
            );
        }
        frame += 1;
    }

    if let Some(summary) = game.game_over() {
        println!("Game Over! ({:?})", summary.reason);
        println!("Your Score: {}", summary.final_score);
        println!("Top Scores:");
        for line in hud::top_score_lines(&summary.top_scores) {
            println!("  {line}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library; the binary has nothing to do on the web
}
