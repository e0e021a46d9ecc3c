#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lawn Defense in a terminal.

mod app;
mod config;
mod input;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use lawn_defense_advisory::{Advisor, AdvisoryBridge, DEFAULT_MODEL};
use lawn_defense_core::PlayerIntent;
use lawn_defense_rendering::{LawnLayout, Presentation, RenderingBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    app::Game,
    config::Overrides,
    terminal::{TerminalBackend, CELL_SIZE},
};

/// Plants versus zombies lawn defense, played from the terminal.
#[derive(Debug, Parser)]
#[command(name = "lawn-defense", version)]
struct Args {
    /// TOML file overriding the default rules.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for sun and zombie spawning.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,
    /// Length of the level in seconds.
    #[arg(long)]
    level_seconds: Option<u64>,
    /// Stop after this many frames.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Key for the advisory text service.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Model asked for advice.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    /// Start a session immediately instead of waiting in the menu.
    #[arg(long)]
    autostart: bool,
}

/// Entry point for the Lawn Defense command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let rules = config::load_rules(
        args.config.as_deref(),
        Overrides {
            seed: args.seed,
            tick_ms: args.tick_ms,
            level_seconds: args.level_seconds,
        },
    )?;
    info!(
        rows = rules.rows,
        columns = rules.columns,
        seed = rules.rng_seed,
        "rules loaded"
    );

    let advisor = Advisor::from_api_key(args.api_key, &args.model);
    let bridge = AdvisoryBridge::new(advisor).context("failed to start advisory bridge")?;
    let layout = LawnLayout::new(Vec2::ZERO, CELL_SIZE, rules.rows, rules.columns)
        .context("failed to build lawn layout")?;
    let frame_interval = rules.tick_interval();

    let mut game = Game::new(rules, bridge, layout);
    if args.autostart {
        game.submit(&[PlayerIntent::StartGame]);
    }

    let lines = input::spawn_stdin_reader()?;
    let backend = TerminalBackend::new(frame_interval, lines).with_max_frames(args.max_ticks);
    let presentation = Presentation::new("Lawn Defense", game.scene());
    backend.run(presentation, move |_dt, input, scene| game.frame(input, scene))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
