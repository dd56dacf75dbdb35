//! Grapple Core Demo
//!
//! Runs a scripted course through the simulation, logs its events, then
//! replays the recorded inputs and checks both runs hash identically.
//!
//! ```text
//! grapple-demo [--config <physics.json>] [--level <level.json>] [--ticks <n>]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use grapple_core::{
    game::{
        events::GameEventData,
        replay::{replay, InputRecording},
    },
    InputFrame, LevelDescription, LevelGeometry, LineKind, PhysicsConfig, Simulation, TICK_RATE,
    VERSION,
};

/// Default run length: 15 seconds.
const DEFAULT_TICKS: u32 = 15 * TICK_RATE;

/// Command-line options.
#[derive(Debug, Default)]
struct DemoArgs {
    config: Option<PathBuf>,
    level: Option<PathBuf>,
    ticks: Option<u32>,
}

impl DemoArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--level" => {
                    let path = args.next().context("--level needs a path")?;
                    parsed.level = Some(PathBuf::from(path));
                }
                "--ticks" => {
                    let value = args.next().context("--ticks needs a number")?;
                    parsed.ticks = Some(value.parse().with_context(|| format!("bad tick count {value:?}"))?);
                }
                other => bail!("unknown argument {other:?}"),
            }
        }
        Ok(parsed)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Grapple Core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let args = DemoArgs::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => PhysicsConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PhysicsConfig::default(),
    };
    let description = match &args.level {
        Some(path) => LevelDescription::from_json_file(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelDescription::demo(),
    };

    demo_run(&config, &description, args.ticks.unwrap_or(DEFAULT_TICKS));
    Ok(())
}

/// Scripted input for tick `t`: walk, swing on a Rope, hop, pull with a Web.
fn scripted_input(t: u32) -> InputFrame {
    let frame = InputFrame::with_movement(1.0);
    match t {
        60 => frame.firing(Vec2::new(14.0, 8.5), LineKind::Rope),
        150 => frame.cancelling(),
        t if (150..300).contains(&t) && t % 45 == 0 => frame.jumping(),
        300 => frame.firing(Vec2::new(20.0, 8.5), LineKind::Web),
        360 => frame.cancelling(),
        t if t > 360 && t % 60 == 0 => frame.jumping(),
        _ => frame,
    }
}

/// Run the scripted course and verify it replays identically.
fn demo_run(config: &PhysicsConfig, description: &LevelDescription, ticks: u32) {
    info!("=== Starting Demo Run ===");

    let level = LevelGeometry::from_description(description);
    info!(
        "Level: {} blocks, spawn at ({:.2}, {:.2})",
        level.len(),
        description.spawn.x,
        description.spawn.y
    );

    let mut sim = Simulation::for_level(description, config.clone());
    let mut recording = InputRecording::new();
    let mut total_events = 0;

    info!("Running {} ticks...", ticks);

    for t in 0..ticks {
        let input = scripted_input(t);
        recording.push(input);

        let result = sim.step(&input, &level);
        total_events += result.events.len();

        // Report every 2 seconds
        if t % (2 * TICK_RATE) == 0 {
            let position = sim.controller.position();
            let velocity = sim.controller.velocity();
            info!(
                "Tick {}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}), {} events so far",
                sim.tick, position.x, position.y, velocity.x, velocity.y, total_events
            );
        }

        // Log important events
        for event in &result.events {
            match &event.data {
                GameEventData::LineAttached { kind, anchor, .. } => {
                    info!("Tick {}: {:?} attached at ({:.2}, {:.2})", event.tick, kind, anchor.x, anchor.y);
                }
                GameEventData::LineDestroyed { kind, reason } => {
                    info!("Tick {}: {:?} destroyed ({:?})", event.tick, kind, reason);
                }
                GameEventData::CheckpointReached { checkpoint } => {
                    info!("Tick {}: checkpoint {} reached", event.tick, checkpoint);
                }
                GameEventData::ExitReached { exit } => {
                    info!("Tick {}: exit {} reached", event.tick, exit);
                }
                _ => {}
            }
        }

        if result.level_complete {
            info!("Level complete at tick {}", sim.tick);
            break;
        }
    }

    // Print final results
    info!("=== Run Results ===");
    let hash = sim.state_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Deaths: {}", sim.session.deaths());
    info!("Total events: {}", total_events);

    match recording.digest() {
        Ok(digest) => info!("Recording: {} ticks, digest {}", recording.len(), hex::encode(digest)),
        Err(e) => warn!("Could not digest recording: {}", e),
    }

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let mut replay_sim = Simulation::for_level(description, config.clone());
    replay(&mut replay_sim, &level, &recording);
    let replay_hash = replay_sim.state_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let parsed = DemoArgs::parse(args(&["--config", "p.json", "--ticks", "90"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("p.json")));
        assert_eq!(parsed.level, None);
        assert_eq!(parsed.ticks, Some(90));
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing() {
        assert!(DemoArgs::parse(args(&["--fast"])).is_err());
        assert!(DemoArgs::parse(args(&["--level"])).is_err());
        assert!(DemoArgs::parse(args(&["--ticks", "many"])).is_err());
    }

    #[test]
    fn test_script_fires_both_kinds() {
        let kinds: Vec<_> = (0..DEFAULT_TICKS)
            .filter_map(|t| scripted_input(t).fire.map(|f| f.kind))
            .collect();
        assert_eq!(kinds, vec![LineKind::Rope, LineKind::Web]);
    }
}
