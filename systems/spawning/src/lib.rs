#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.

use std::time::Duration;

use sky_joust_core::{arena, Command, Event};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    initial_delay: Duration,
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided wave cadence and seed.
    #[must_use]
    pub const fn new(initial_delay: Duration, spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            initial_delay,
            spawn_interval,
            rng_seed,
        }
    }

    /// The cadence the reference arena uses: a three second grace period,
    /// then one enemy per five seconds while the live set has room.
    #[must_use]
    pub const fn default_cadence(rng_seed: u64) -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(5), rng_seed)
    }
}

/// Pure system that deterministically emits enemy spawn commands.
#[derive(Debug)]
pub struct Spawning {
    initial_delay: Duration,
    spawn_interval: Duration,
    accumulator: Duration,
    primed: bool,
    rng_state: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            initial_delay: config.initial_delay,
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            primed: false,
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and the live enemy count to emit spawn commands.
    ///
    /// An attempt that lands while the live set is full is forfeited rather
    /// than deferred, so the wave cadence never bursts when a slot frees up.
    pub fn handle(
        &mut self,
        events: &[Event],
        live_enemies: usize,
        capacity: usize,
        out: &mut Vec<Command>,
    ) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let mut live = live_enemies;

        loop {
            let threshold = if self.primed {
                self.spawn_interval
            } else {
                self.initial_delay
            };
            if self.accumulator < threshold {
                break;
            }
            self.accumulator -= threshold;
            self.primed = true;

            if live < capacity {
                let spawn_point = self.select_spawn_point();
                let facing_right = self.advance_rng() % 2 == 0;
                out.push(Command::SpawnEnemy {
                    spawn_point,
                    facing_right,
                });
                live += 1;
            }
        }
    }

    fn select_spawn_point(&mut self) -> usize {
        let value = self.advance_rng();
        (value % arena::SPAWN_POINTS.len() as u64) as usize
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
