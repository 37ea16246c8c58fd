#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Puck-Man simulation.

mod config;
mod frame;

use std::{fs, path::PathBuf, thread};

use anyhow::{Context, Result};
use clap::Parser;
use puckman_core::{Command, Event, GameState};
use puckman_system_movement::{Config as MovementConfig, Movement};
use puckman_world::{self as world, query, MazeLayout, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{InputAction, Settings},
    frame::Frame,
};

/// Command-line arguments; each one overrides the matching config key.
#[derive(Debug, Parser)]
#[command(name = "puckman", about = "Runs the Puck-Man chase simulation headlessly")]
struct Args {
    /// Configuration file (defaults to `puckman.toml` when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Maze layout file, relative to the working directory; the built-in
    /// reference maze is used otherwise.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,
    /// Number of loop ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,
    /// Seed for the wandering ghost.
    #[arg(long)]
    seed: Option<u64>,
    /// Sleep between ticks and print a frame every tick.
    #[arg(long)]
    realtime: bool,
    /// Skip printing the final frame.
    #[arg(long)]
    quiet_frame: bool,
}

/// Entry point for the Puck-Man command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = config::load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);

    let layout = load_layout(&settings)?;
    let mut world = World::from_layout(&layout).context("maze layout rejected")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut movement = Movement::new(MovementConfig::new(seed));

    info!(
        banner = query::welcome_banner(&world),
        width = layout.width,
        height = layout.height,
        ghosts = layout.ghosts.len(),
        pickups = query::pickups_remaining(&world),
        seed,
        "simulation starting"
    );

    let mut summary = Summary::default();
    for tick in 0..settings.ticks {
        for input in settings.inputs_at(tick) {
            debug!(tick, ?input, "scripted input");
            let command = input_command(&world, input);
            step(&mut world, &mut movement, command, &mut summary);
        }
        step(&mut world, &mut movement, Command::Tick, &mut summary);

        if settings.realtime {
            println!("{}", Frame::capture(&world));
            thread::sleep(settings.tick_rate);
        }
    }

    if !args.quiet_frame && !settings.realtime {
        println!("{}", Frame::capture(&world));
    }

    info!(
        ticks = query::tick_index(&world),
        player_steps = summary.player_steps,
        ghost_steps = summary.ghost_steps,
        rejected_steps = summary.rejected_steps,
        pickups_collected = summary.pickups_collected,
        pickups_remaining = query::pickups_remaining(&world),
        "simulation finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(layout) = &args.layout {
        settings.layout_path = Some(layout.clone());
    }
    if let Some(ticks) = args.ticks {
        settings.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    settings.realtime |= args.realtime;
}

fn load_layout(settings: &Settings) -> Result<MazeLayout> {
    let Some(path) = &settings.layout_path else {
        return Ok(MazeLayout::reference());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze layout at {}", path.display()))?;
    MazeLayout::from_toml_str(&contents)
        .with_context(|| format!("failed to parse maze layout at {}", path.display()))
}

fn input_command(world: &World, input: InputAction) -> Command {
    match input {
        InputAction::Heading(direction) => Command::SetHeading { direction },
        InputAction::TogglePause => {
            let state = match query::game_state(world) {
                GameState::Running => GameState::Paused,
                GameState::Paused => GameState::Running,
            };
            Command::SetGameState { state }
        }
        InputAction::ResetGhosts => Command::ResetGhosts,
    }
}

/// Applies one command and lets the movement system answer the resulting events.
fn step(world: &mut World, movement: &mut Movement, command: Command, summary: &mut Summary) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        summary.record(&events);

        let mut commands = Vec::new();
        movement.handle(
            &events,
            &query::ghost_view(world),
            query::player_cell(world),
            query::grid(world),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    player_steps: u64,
    ghost_steps: u64,
    rejected_steps: u64,
    pickups_collected: u64,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerAdvanced { .. } => self.player_steps += 1,
                Event::GhostAdvanced { .. } => self.ghost_steps += 1,
                Event::GhostStepRejected { .. } => self.rejected_steps += 1,
                Event::PickupCollected { .. } => self.pickups_collected += 1,
                Event::TimeAdvanced { .. }
                | Event::GameStateChanged { .. }
                | Event::GhostsReset => {}
            }
        }
    }
}
