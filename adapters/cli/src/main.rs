#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Sky Joust simulation headless.
//!
//! The windowed experience binds a renderer, an audio decoder and real input
//! devices to the same loop this driver runs with a scripted schedule and a
//! null audio sink.

mod placeholder;
mod scene;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_joust_core::{arena, Command, Event, InputSnapshot};
use sky_joust_rendering::{dispatch_audio, NullAudioSink};
use sky_joust_system_controls::Controls;
use sky_joust_system_spawning::{Config, Spawning};
use sky_joust_world::{self as world, query, World, ENEMY_CAP};

#[derive(Debug, Parser)]
#[command(
    name = "sky-joust",
    about = "Headless driver for the Sky Joust simulation core"
)]
struct Args {
    /// Number of fixed simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed shared by every random stream; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between enemy waves.
    #[arg(long, default_value_t = 5_000)]
    wave_interval_ms: u64,

    /// Milliseconds before the first enemy wave.
    #[arg(long, default_value_t = 3_000)]
    wave_delay_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut streams = ChaCha8Rng::seed_from_u64(seed);
    let world_seed: u64 = streams.gen();
    let wave_seed: u64 = streams.gen();

    let catalog = placeholder::catalog();
    catalog.validate().context("sprite catalog unusable")?;

    let mut world = World::new(catalog, world_seed);
    println!("{}", query::welcome_banner(&world));
    println!("seed {seed:#018x}");

    let mut controls = Controls::new();
    let mut spawning = Spawning::new(Config::new(
        Duration::from_millis(args.wave_delay_ms),
        Duration::from_millis(args.wave_interval_ms),
        wave_seed,
    ));
    let mut audio = NullAudioSink;

    let mut spawned = 0usize;
    let mut removed = 0usize;

    for tick in 0..args.ticks {
        let mut events = Vec::new();

        let mut commands = Vec::new();
        controls.handle(scripted_input(tick), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        world::apply(&mut world, Command::Tick { dt: arena::TICK }, &mut events);

        let mut wave_commands = Vec::new();
        spawning.handle(
            &events,
            query::live_enemy_count(&world),
            ENEMY_CAP,
            &mut wave_commands,
        );
        for command in wave_commands {
            world::apply(&mut world, command, &mut events);
        }

        for event in &events {
            match event {
                Event::EnemySpawned { .. } => spawned += 1,
                Event::EnemyRemoved { .. } => removed += 1,
                _ => {}
            }
        }

        // A sound glitch must never end a session; report and keep going.
        if let Err(error) = dispatch_audio(&events, query::sound_enabled(&world), &mut audio) {
            eprintln!("audio trigger failed: {error:#}");
        }
    }

    let frame = scene::compose(&world);
    let player = query::player_view(&world);
    println!(
        "ran {} ticks ({:?} simulated)",
        args.ticks,
        query::sim_time(&world)
    );
    println!(
        "player {:?} at ({:.1}, {:.1}), {} live enemies ({spawned} spawned, {removed} removed)",
        player.state,
        player.x,
        player.y,
        query::live_enemy_count(&world),
    );
    println!(
        "scene: {} ledges, {} enemy sprites",
        frame.terrain.len(),
        frame.enemies.len()
    );
    Ok(())
}

/// Deterministic input schedule exercising pad promotion, walking
/// acceleration, a direction reversal and a few flaps.
fn scripted_input(tick: u64) -> InputSnapshot {
    let mut snapshot = InputSnapshot::default();
    match tick {
        60..=70 => snapshot.flap = true,
        120..=239 => snapshot.right = true,
        240..=269 => snapshot.left = true,
        300..=310 => snapshot.flap = true,
        _ => {}
    }
    snapshot
}
