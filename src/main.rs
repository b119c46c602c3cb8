//! Headless driver: runs the plaza simulation at 60 Hz and logs word swaps.
//!
//! Usage: `plaza-sim [config.json] [frames]`

use anyhow::Context;
use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::prelude::*;
use std::path::Path;
use std::time::Duration;

use plaza_core::engine::{PlazaSimPlugin, SimulationResource, WordSwappedEvent};
use plaza_core::logging;
use plaza_core::SimConfig;

const DEFAULT_CONFIG_PATH: &str = "config/plaza.json";

/// Stop after this many frames; run forever when `None`
#[derive(Resource)]
struct FrameLimit(Option<u64>);

fn main() -> anyhow::Result<()> {
    logging::init_tracing_default();

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next().as_deref())?;
    let frame_limit = args
        .next()
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("frame limit must be a whole number")?;

    let plugin = PlazaSimPlugin::new(config).context("invalid simulation config")?;

    let exit = App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f64(1.0 / 60.0),
        )))
        .add_plugins(plugin)
        .insert_resource(FrameLimit(frame_limit))
        .add_systems(Update, (log_word_swaps, exit_after_frames))
        .run();

    if let AppExit::Error(code) = exit {
        anyhow::bail!("simulation exited with code {code}");
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> anyhow::Result<SimConfig> {
    let config = match path {
        Some(path) => SimConfig::load(path).with_context(|| format!("loading {path}"))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => SimConfig::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("loading {DEFAULT_CONFIG_PATH}"))?,
        None => SimConfig::default(),
    };
    tracing::info!(
        slots = config.slots.len(),
        agents = config.agent_count,
        "config loaded"
    );
    Ok(config)
}

fn log_word_swaps(mut events: EventReader<WordSwappedEvent>) {
    for WordSwappedEvent(swap) in events.read() {
        tracing::info!(
            slot = swap.slot,
            "{:?} -> {:?}, overlay redraw",
            swap.previous_word,
            swap.new_word
        );
    }
}

fn exit_after_frames(
    limit: Res<FrameLimit>,
    sim: Res<SimulationResource>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(frames) = limit.0 {
        if sim.0.current_tick() >= frames {
            exit.send(AppExit::Success);
        }
    }
}
