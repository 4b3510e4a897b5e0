#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Sky Joust.
//!
//! The world owns the one player, the live enemy set, the static terrain and
//! the mode flags. Adapters mutate it exclusively through [`apply`]; pure
//! systems observe it through [`query`] and the events `apply` broadcasts.

mod body;
mod enemy;
mod mount;
mod player;
mod terrain;

use std::time::Duration;

use sky_joust_core::{
    arena, Command, EnemyId, Event, InputSnapshot, SoundId, SpriteCatalog, WELCOME_BANNER,
};

use crate::enemy::Enemy;
use crate::player::Player;
use crate::terrain::{build_terrain, Ledge};

/// Most enemies the live set ever holds.
pub const ENEMY_CAP: usize = 3;

/// Deterministic generator behind every in-world random choice: spawn-point
/// selection on respawn and the materialization color flash.
#[derive(Clone, Debug)]
pub(crate) struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut mixed = self.state;
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        mixed ^ (mixed >> 31)
    }
}

/// Everything one actor update may touch besides its own state.
pub(crate) struct TickContext<'a> {
    pub(crate) now: Duration,
    pub(crate) input: InputSnapshot,
    pub(crate) god_mode: bool,
    pub(crate) rng: &'a mut SplitMix64,
    pub(crate) events: &'a mut Vec<Event>,
    pub(crate) debug: &'a mut String,
}

/// Represents the authoritative Sky Joust world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    catalog: SpriteCatalog,
    player: Player,
    enemies: Vec<Enemy>,
    terrain: Vec<Ledge>,
    input: InputSnapshot,
    god_mode: bool,
    paused: bool,
    sound_on: bool,
    filter_on: bool,
    clock: Duration,
    rng: SplitMix64,
    next_enemy_id: u32,
    debug: String,
}

impl World {
    /// Creates a new world ready for simulation.
    ///
    /// The catalog is expected to have passed [`SpriteCatalog::validate`];
    /// the driver treats a validation failure as fatal before ever reaching
    /// this constructor.
    #[must_use]
    pub fn new(catalog: SpriteCatalog, seed: u64) -> Self {
        let terrain = build_terrain(&catalog);
        let player = Player::new(&catalog, Duration::ZERO);
        Self {
            banner: WELCOME_BANNER,
            player,
            enemies: Vec::new(),
            terrain,
            input: InputSnapshot::default(),
            god_mode: false,
            paused: false,
            sound_on: false,
            filter_on: false,
            clock: Duration::ZERO,
            rng: SplitMix64::new(seed),
            next_enemy_id: 0,
            debug: String::new(),
            catalog,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let now = self.clock;
        let input = self.input;
        let god_mode = self.god_mode;
        let Self {
            player,
            enemies,
            terrain,
            rng,
            debug,
            ..
        } = self;

        let mut ctx = TickContext {
            now,
            input,
            god_mode,
            rng,
            events: &mut *out_events,
            debug,
        };

        // The player always updates before any enemy; enemies follow their
        // storage order.
        player.update(&mut ctx, terrain, enemies);
        for index in 0..enemies.len() {
            let (left, rest) = enemies.split_at_mut(index);
            let (current, right) = rest.split_at_mut(1);
            current[0].update(&mut ctx, terrain, left, right);
        }

        // Swap-remove despawned enemies; order among survivors is not
        // meaningful, only deterministic.
        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].collision_body().alive {
                index += 1;
            } else {
                let removed = self.enemies.swap_remove(index);
                out_events.push(Event::SoundTriggered {
                    sound: SoundId::Egg,
                });
                out_events.push(Event::EnemyRemoved { enemy: removed.id });
            }
        }
    }

    fn spawn_enemy(&mut self, spawn_point: usize, facing_right: bool, out_events: &mut Vec<Event>) {
        if self.enemies.len() >= ENEMY_CAP {
            return;
        }
        let (x, y) = arena::SPAWN_POINTS[spawn_point % arena::SPAWN_POINTS.len()];
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.enemies
            .push(Enemy::new(&self.catalog, id, x, y, facing_right, self.clock));
        out_events.push(Event::EnemySpawned { enemy: id });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::UpdateInput { snapshot } => {
            world.input = snapshot;
        }
        Command::Tick { dt } => {
            if world.paused {
                return;
            }
            world.tick(dt, out_events);
        }
        Command::SpawnEnemy {
            spawn_point,
            facing_right,
        } => {
            world.spawn_enemy(spawn_point, facing_right, out_events);
        }
        Command::ToggleGodMode => {
            world.god_mode = !world.god_mode;
            out_events.push(Event::GodModeToggled {
                enabled: world.god_mode,
            });
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseToggled {
                paused: world.paused,
            });
        }
        Command::ToggleSound => {
            world.sound_on = !world.sound_on;
            out_events.push(Event::SoundToggled {
                enabled: world.sound_on,
            });
        }
        Command::ToggleFilter => {
            world.filter_on = !world.filter_on;
            out_events.push(Event::FilterToggled {
                enabled: world.filter_on,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use sky_joust_core::{ActorState, EnemyId, SpawnColor};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Total simulated time the world has advanced through.
    #[must_use]
    pub fn sim_time(world: &World) -> Duration {
        world.clock
    }

    /// Whether invulnerability and the diagnostic overlay are active.
    #[must_use]
    pub fn god_mode(world: &World) -> bool {
        world.god_mode
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn paused(world: &World) -> bool {
        world.paused
    }

    /// Whether the global sound switch is on.
    #[must_use]
    pub fn sound_enabled(world: &World) -> bool {
        world.sound_on
    }

    /// Whether the display-filter flag is set.
    #[must_use]
    pub fn filter_enabled(world: &World) -> bool {
        world.filter_on
    }

    /// Diagnostic text for the god-mode overlay.
    #[must_use]
    pub fn debug_overlay(world: &World) -> &str {
        &world.debug
    }

    /// Number of enemies currently in the live set.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the player.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            state: player.state,
            x: player.core.body.x,
            y: player.core.body.y,
            vx: player.core.body.vx,
            vy: player.core.body.vy,
            width: player.core.body.width,
            height: player.core.body.height,
            facing_right: player.core.facing_right,
            speed_index: player.core.speed_index,
            frame: player.core.body.frame,
            walking: player.core.walking,
            skidding: player.skidding(),
            spawn_reveal: spawn_reveal(player.state, player.core.spawn_progress),
            body_flash: player.body_flash,
            rider_flash: player.rider_flash,
        }
    }

    fn spawn_reveal(state: ActorState, progress: u32) -> Option<u32> {
        (state == ActorState::Spawning).then_some(progress)
    }

    /// Captures read-only views of the live enemies in storage order.
    #[must_use]
    pub fn enemy_view(world: &World) -> Vec<EnemySnapshot> {
        world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                state: enemy.state,
                x: enemy.core.body.x,
                y: enemy.core.body.y,
                width: enemy.core.body.width,
                height: enemy.core.body.height,
                facing_right: enemy.core.facing_right,
                frame: enemy.core.body.frame,
                spawn_reveal: spawn_reveal(enemy.state, enemy.core.spawn_progress),
                body_flash: enemy.body_flash,
                rider_flash: enemy.rider_flash,
            })
            .collect()
    }

    /// Captures read-only views of the terrain ledges in layout order.
    #[must_use]
    pub fn terrain_view(world: &World) -> Vec<LedgeSnapshot> {
        world
            .terrain
            .iter()
            .map(|ledge| LedgeSnapshot {
                piece: ledge.piece(),
                x: ledge.body().x,
                y: ledge.body().y,
                width: ledge.body().width,
                height: ledge.body().height,
            })
            .collect()
    }

    /// Immutable representation of the player's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Current lifecycle state.
        pub state: ActorState,
        /// Horizontal position of the sprite center.
        pub x: f32,
        /// Vertical position of the sprite center.
        pub y: f32,
        /// Horizontal velocity component.
        pub vx: f32,
        /// Vertical velocity component.
        pub vy: f32,
        /// Collision footprint width in pixels.
        pub width: u32,
        /// Collision footprint height in pixels.
        pub height: u32,
        /// Whether the sprite faces right.
        pub facing_right: bool,
        /// Signed index into the walk speed table.
        pub speed_index: i32,
        /// Animation frame currently shown.
        pub frame: usize,
        /// Whether the mount is grounded on a ledge.
        pub walking: bool,
        /// Whether a skid is counting down.
        pub skidding: bool,
        /// Rows of the sprite revealed so far while materializing.
        pub spawn_reveal: Option<u32>,
        /// Materialization flash applied to the mount, if any.
        pub body_flash: Option<SpawnColor>,
        /// Materialization flash applied to the rider, if any.
        pub rider_flash: Option<SpawnColor>,
    }

    /// Immutable representation of a single enemy's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier assigned at spawn.
        pub id: EnemyId,
        /// Current lifecycle state.
        pub state: ActorState,
        /// Horizontal position of the sprite center.
        pub x: f32,
        /// Vertical position of the sprite center.
        pub y: f32,
        /// Collision footprint width in pixels.
        pub width: u32,
        /// Collision footprint height in pixels.
        pub height: u32,
        /// Whether the sprite faces right.
        pub facing_right: bool,
        /// Animation frame currently shown.
        pub frame: usize,
        /// Rows of the sprite revealed so far while materializing.
        pub spawn_reveal: Option<u32>,
        /// Materialization flash applied to the mount, if any.
        pub body_flash: Option<SpawnColor>,
        /// Materialization flash applied to the rider, if any.
        pub rider_flash: Option<SpawnColor>,
    }

    /// Immutable representation of one terrain ledge used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct LedgeSnapshot {
        /// Catalog index of the piece the ledge renders with.
        pub piece: usize,
        /// Horizontal position of the upper-left corner.
        pub x: f32,
        /// Vertical position of the upper-left corner.
        pub y: f32,
        /// Piece width in pixels.
        pub width: u32,
        /// Piece height in pixels.
        pub height: u32,
    }
}
