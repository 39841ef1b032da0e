//! Shooting Range headless runner
//!
//! Plays one seeded round with a scripted shooter and logs what a renderer
//! would be asked to draw. Run with `RUST_LOG=debug` to see every command.
//!
//! Usage: `shooting-range [seed] [tuning.json]`

use anyhow::{Context, Result};
use shooting_range::sim::{GameSession, RenderCommand, TapHit, TapOutcome, TargetKind};
use shooting_range::{Tuning, secs_to_ms};

/// Simulated frame length
const FRAME_SECS: f32 = 1.0 / 60.0;
/// The scripted shooter acts this often (ms)
const REACTION_MS: u64 = 250;
/// Hostile targets are shot once they are this far along their lane
const AIM_PROGRESS: f32 = 0.3;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid seed: {}", arg))?,
        None => 0x5EED,
    };
    let tuning = match args.next() {
        Some(path) => load_tuning(&path)?,
        None => Tuning::default(),
    };

    log::info!("Shooting Range (headless) starting...");
    let mut session = GameSession::with_tuning(seed, tuning)?;

    let frame_ms = secs_to_ms(FRAME_SECS);
    let mut next_action = REACTION_MS;
    let mut hits = 0u32;

    while !session.is_ended() || !session.targets().is_empty() {
        session.advance(frame_ms)?;

        if session.now() >= next_action {
            next_action += REACTION_MS;
            if let Some(outcome) = act(&mut session)? {
                if matches!(outcome, TapOutcome::Hit { .. }) {
                    hits += 1;
                }
                log::debug!("t={}ms tap -> {:?}", session.now(), outcome);
            }
        }

        for command in session.drain_commands() {
            match &command {
                RenderCommand::SetLabel { .. } | RenderCommand::GameOverDisplay => {
                    log::info!("{:?}", command)
                }
                _ => log::debug!("{:?}", command),
            }
        }
    }

    println!(
        "Final score: {} ({} hits, seed {})",
        session.score(),
        hits,
        session.seed()
    );
    Ok(())
}

fn load_tuning(path: &str) -> Result<Tuning> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file: {}", path))?;
    let tuning =
        Tuning::from_json(&json).with_context(|| format!("invalid tuning file: {}", path))?;
    log::info!("Loaded tuning from {}", path);
    Ok(tuning)
}

/// Reload on an empty magazine, otherwise shoot the most advanced hostile target
fn act(session: &mut GameSession) -> Result<Option<TapOutcome>, shooting_range::SessionError> {
    if session.is_ended() || session.is_reloading() {
        return Ok(None);
    }
    if session.ammunition() == 0 {
        let location = glam::Vec2::new(949.0, 75.0);
        return session.on_tap(location, Some(TapHit::ReloadControl)).map(Some);
    }

    let now = session.now();
    let aim = session
        .targets()
        .iter()
        .filter(|t| t.kind == TargetKind::Hostile && t.progress_at(now) >= AIM_PROGRESS)
        .max_by(|a, b| a.progress_at(now).total_cmp(&b.progress_at(now)))
        .map(|t| (t.id, t.position_at(now)));

    match aim {
        Some((id, location)) => session.on_tap(location, Some(TapHit::Target(id))).map(Some),
        None => Ok(None),
    }
}
