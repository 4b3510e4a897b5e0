#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sky Joust engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Sky Joust.";

/// Logical controls a driver can report as held on a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Steer or accelerate toward the left edge.
    Left,
    /// Steer or accelerate toward the right edge.
    Right,
    /// Beat the mount's wings for lift.
    Flap,
    /// Toggle invulnerability and the diagnostic overlay.
    GodMode,
    /// Toggle the simulation pause.
    Pause,
    /// Toggle the global sound switch.
    Sound,
    /// Toggle the display filter flag consumed by presentation layers.
    Filter,
}

/// Per-tick record of which logical controls are currently held.
///
/// Drivers capture one snapshot per frame from whatever input device they
/// bind; the simulation never talks to hardware directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Left steering control is held.
    pub left: bool,
    /// Right steering control is held.
    pub right: bool,
    /// Flap control is held.
    pub flap: bool,
    /// God-mode toggle key is held.
    pub god_mode: bool,
    /// Pause toggle key is held.
    pub pause: bool,
    /// Sound toggle key is held.
    pub sound: bool,
    /// Display-filter toggle key is held.
    pub filter: bool,
}

impl InputSnapshot {
    /// Reports whether the provided control is held in this snapshot.
    #[must_use]
    pub const fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Flap => self.flap,
            Control::GodMode => self.god_mode,
            Control::Pause => self.pause,
            Control::Sound => self.sound,
            Control::Filter => self.filter,
        }
    }

    /// Reports whether any of the mount-steering controls is held.
    #[must_use]
    pub const fn any_steering(&self) -> bool {
        self.left || self.right || self.flap
    }
}

/// Named sound handles exposed by the driver's audio sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    /// Blunt collision against a ledge.
    Bump,
    /// A defeated enemy leaving the arena.
    Egg,
    /// Player materialization charge-up.
    Energize,
    /// Downward wing beat.
    FlapDown,
    /// Upward wing recovery.
    FlapUp,
    /// Player struck by an enemy lance.
    Hit,
    /// First flight ambience variant.
    FlightA,
    /// Second flight ambience variant.
    FlightB,
    /// Ground skid while reversing at speed.
    Skid,
    /// Player teleported to a fresh spawn point.
    Spawn,
    /// Enemy materialization charge-up.
    SpawnEnemy,
    /// First walk-step variant.
    WalkA,
    /// Second walk-step variant.
    WalkB,
    /// Winning lance impact.
    Whomp,
}

/// Lifecycle states shared by every rider-and-mount actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Materializing at a spawn point; not yet under normal physics.
    Spawning,
    /// Rider seated, full locomotion and collision resolution active.
    Mounted,
    /// Rider lost; fleeing toward the nearer screen edge.
    Unmounted,
    /// One-tick pass-through before reset or removal.
    Dead,
}

/// Unique identifier assigned to a live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Flash palette cycled while an actor materializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnColor {
    /// Bright white flash.
    White,
    /// Mid grey flash.
    Grey,
    /// Warm yellow flash.
    Yellow,
}

impl SpawnColor {
    /// All palette entries in cycling order.
    pub const PALETTE: [SpawnColor; 3] = [SpawnColor::White, SpawnColor::Grey, SpawnColor::Yellow];

    /// Byte RGB components of the flash color.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            SpawnColor::White => (255, 255, 255),
            SpawnColor::Grey => (127, 127, 127),
            SpawnColor::Yellow => (255, 255, 86),
        }
    }
}

/// Axis-aligned rectangle expressed in whole virtual pixels.
///
/// `max_x`/`max_y` are exclusive, matching the convention of the sprite
/// sheet regions the frames are sliced from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl PixelRect {
    /// Constructs a rectangle from inclusive minimum and exclusive maximum corners.
    #[must_use]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Inclusive left edge.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Inclusive top edge.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Width in pixels; zero when the rectangle is degenerate.
    #[must_use]
    pub const fn width(&self) -> i32 {
        if self.max_x > self.min_x {
            self.max_x - self.min_x
        } else {
            0
        }
    }

    /// Height in pixels; zero when the rectangle is degenerate.
    #[must_use]
    pub const fn height(&self) -> i32 {
        if self.max_y > self.min_y {
            self.max_y - self.min_y
        } else {
            0
        }
    }

    /// Reports whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Computes the overlap of two rectangles; empty when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        if max_x <= min_x || max_y <= min_y {
            return PixelRect::default();
        }
        PixelRect::new(min_x, min_y, max_x, max_y)
    }
}

/// One drawable frame reduced to the data the simulation needs: its
/// dimensions and per-pixel opacity.
///
/// The driver's asset provider slices these from its sprite sheet; color
/// information stays on the presentation side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SpriteFrame {
    /// Builds a frame from row-major alpha-channel bytes.
    ///
    /// The alpha buffer is truncated or zero-padded to `width * height` so a
    /// malformed provider cannot produce out-of-bounds reads later.
    #[must_use]
    pub fn from_alpha(width: u32, height: u32, mut alpha: Vec<u8>) -> Self {
        let expected = (width as usize) * (height as usize);
        alpha.resize(expected, 0);
        Self {
            width,
            height,
            alpha,
        }
    }

    /// Builds a fully opaque frame of the provided dimensions.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            alpha: vec![u8::MAX; pixels],
        }
    }

    /// Width of the frame in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the pixel at the provided local coordinate is opaque.
    ///
    /// Coordinates outside the frame are transparent.
    #[must_use]
    pub fn opaque_at(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.alpha.get(index).copied().unwrap_or(0) != 0
    }

    /// Reports whether the frame contains any opaque pixel at all.
    #[must_use]
    pub fn has_opaque_pixels(&self) -> bool {
        self.alpha.iter().any(|value| *value != 0)
    }

    /// Returns a copy of this frame with `other`'s opacity merged in at the
    /// provided offset. Pixels falling outside this frame are discarded.
    #[must_use]
    pub fn overlay(&self, other: &SpriteFrame, dx: u32, dy: u32) -> SpriteFrame {
        let mut merged = self.clone();
        for y in 0..other.height {
            let target_y = y + dy;
            if target_y >= merged.height {
                break;
            }
            for x in 0..other.width {
                let target_x = x + dx;
                if target_x >= merged.width {
                    break;
                }
                let source = other.alpha[y as usize * other.width as usize + x as usize];
                let index = target_y as usize * merged.width as usize + target_x as usize;
                merged.alpha[index] = merged.alpha[index].max(source);
            }
        }
        merged
    }

    /// Returns this frame mirrored across its vertical axis.
    ///
    /// Actors facing left composite a mirrored frame, and collision reads
    /// those mirrored pixels.
    #[must_use]
    pub fn flip_horizontal(&self) -> SpriteFrame {
        let mut flipped = self.clone();
        for y in 0..self.height as usize {
            let row = &mut flipped.alpha[y * self.width as usize..(y + 1) * self.width as usize];
            row.reverse();
        }
        flipped
    }

    /// Returns a same-sized frame showing only the top `rows` rows of this
    /// frame, shifted to the bottom edge: the materialization reveal.
    #[must_use]
    pub fn reveal_from_bottom(&self, rows: u32) -> SpriteFrame {
        let rows = rows.min(self.height);
        let mut revealed = SpriteFrame::from_alpha(self.width, self.height, Vec::new());
        let offset = (self.height - rows) as usize;
        for y in 0..rows as usize {
            let source_start = y * self.width as usize;
            let target_start = (offset + y) * self.width as usize;
            let width = self.width as usize;
            revealed.alpha[target_start..target_start + width]
                .copy_from_slice(&self.alpha[source_start..source_start + width]);
        }
        revealed
    }
}

/// Frame sequences the asset provider must supply for one playable arena.
///
/// Sequence lengths mirror the reference sheet: eight mount poses for the
/// player's steed, seven for the enemy vulture, one rider overlay each, and
/// the eight ledge pieces that compose the terrain.
#[derive(Clone, Debug)]
pub struct SpriteCatalog {
    /// Ordered animation frames for the player's mount.
    pub player_mount: Vec<SpriteFrame>,
    /// Rider overlay composited onto the player's mount.
    pub player_rider: SpriteFrame,
    /// Ordered animation frames for the enemy mount.
    pub enemy_mount: Vec<SpriteFrame>,
    /// Rider overlay composited onto the enemy mount.
    pub enemy_rider: SpriteFrame,
    /// Terrain ledge pieces in layout order.
    pub ledges: Vec<SpriteFrame>,
}

/// Number of animation frames expected for the player's mount.
pub const PLAYER_MOUNT_FRAMES: usize = 8;
/// Number of animation frames expected for the enemy mount.
pub const ENEMY_MOUNT_FRAMES: usize = 7;
/// Number of terrain ledge pieces expected in the catalog.
pub const LEDGE_PIECES: usize = 8;

impl SpriteCatalog {
    /// Checks the catalog against the frame counts and dimensions the
    /// simulation assumes. A failure here is fatal at startup: the game
    /// cannot meaningfully run without its sprite resources.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_sequence("player mount", &self.player_mount, PLAYER_MOUNT_FRAMES)?;
        check_sequence("enemy mount", &self.enemy_mount, ENEMY_MOUNT_FRAMES)?;
        check_sequence("ledges", &self.ledges, LEDGE_PIECES)?;
        check_frame("player rider", 0, &self.player_rider)?;
        check_frame("enemy rider", 0, &self.enemy_rider)?;
        Ok(())
    }
}

fn check_sequence(
    actor: &'static str,
    frames: &[SpriteFrame],
    expected: usize,
) -> Result<(), CatalogError> {
    if frames.len() != expected {
        return Err(CatalogError::MissingFrames {
            actor,
            expected,
            found: frames.len(),
        });
    }
    for (index, frame) in frames.iter().enumerate() {
        check_frame(actor, index, frame)?;
    }
    Ok(())
}

fn check_frame(actor: &'static str, index: usize, frame: &SpriteFrame) -> Result<(), CatalogError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(CatalogError::EmptyFrame { actor, index });
    }
    Ok(())
}

/// Reasons a sprite catalog is unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A frame sequence has the wrong number of entries.
    #[error("{actor} sequence holds {found} frames, expected {expected}")]
    MissingFrames {
        /// Sequence the provider shorted.
        actor: &'static str,
        /// Number of frames the simulation assumes.
        expected: usize,
        /// Number of frames actually supplied.
        found: usize,
    },
    /// A frame has zero width or height.
    #[error("{actor} frame {index} has zero area")]
    EmptyFrame {
        /// Sequence containing the degenerate frame.
        actor: &'static str,
        /// Index of the degenerate frame within its sequence.
        index: usize,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the input snapshot consulted by subsequent ticks.
    UpdateInput {
        /// Controls held during the driver's most recent frame.
        snapshot: InputSnapshot,
    },
    /// Advances the simulation clock by one fixed step.
    Tick {
        /// Duration of simulated time that elapses in the tick.
        dt: Duration,
    },
    /// Requests that a new enemy materialize at a spawn point.
    SpawnEnemy {
        /// Index into the arena's spawn point table.
        spawn_point: usize,
        /// Initial facing assigned to the enemy.
        facing_right: bool,
    },
    /// Flips the invulnerability / diagnostics flag.
    ToggleGodMode,
    /// Flips the simulation pause flag.
    TogglePause,
    /// Flips the global sound switch.
    ToggleSound,
    /// Flips the display-filter flag consumed by presentation layers.
    ToggleFilter,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Requests playback of a named sound from the driver's audio sink.
    SoundTriggered {
        /// Handle of the sound to play.
        sound: SoundId,
    },
    /// Requests that one held sound stop immediately.
    SoundHalted {
        /// Handle of the sound to stop.
        sound: SoundId,
    },
    /// Requests that every held sound stop immediately.
    AllSoundsStopped,
    /// Confirms that an enemy began materializing.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy left the live set.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Announces that an enemy lost its rider to the player's lance.
    EnemyUnseated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
    },
    /// Announces that the player lost the joust and was unseated.
    PlayerUnseated,
    /// Announces that the player reset onto a fresh spawn point.
    PlayerRespawned,
    /// Confirms a god-mode toggle.
    GodModeToggled {
        /// Whether god mode is active after the toggle.
        enabled: bool,
    },
    /// Confirms a pause toggle.
    PauseToggled {
        /// Whether the simulation is paused after the toggle.
        paused: bool,
    },
    /// Confirms a sound toggle.
    SoundToggled {
        /// Whether sound is enabled after the toggle.
        enabled: bool,
    },
    /// Confirms a display-filter toggle.
    FilterToggled {
        /// Whether the filter flag is set after the toggle.
        enabled: bool,
    },
}

/// Fixed geometry and tuning tables of the playfield.
pub mod arena {
    use std::time::Duration;

    /// Playfield width in virtual pixels.
    pub const SCREEN_WIDTH: f32 = 300.0;
    /// Playfield height in virtual pixels.
    pub const SCREEN_HEIGHT: f32 = 212.0;

    /// Whole milliseconds in one fixed simulation step.
    pub const TICK_MILLIS: u64 = 1000 / 60;
    /// Duration of one fixed simulation step.
    pub const TICK: Duration = Duration::from_millis(TICK_MILLIS);
    /// One fixed step expressed in seconds.
    pub const TICK_SECONDS: f32 = TICK_MILLIS as f32 / 1000.0;

    /// Horizontal displacement per tick indexed by speed magnitude.
    pub const MOVE_SPEED: [f32; 5] = [0.0, 0.5, 1.0, 2.0, 2.5];
    /// Largest legal speed index magnitude.
    pub const MAX_SPEED_INDEX: i32 = (MOVE_SPEED.len() - 1) as i32;

    /// Walk-cycle frame delay indexed by speed magnitude minus one.
    pub const WALK_FRAME_DELAYS: [Duration; 4] = [
        Duration::from_millis(140),
        Duration::from_millis(80),
        Duration::from_millis(40),
        Duration::from_millis(9),
    ];

    /// Flight-altitude targets enemies steer toward.
    pub const LANES: [f32; 3] = [35.0, 89.0, 159.0];

    /// Materialization points, in layout order: right, bottom, top, left.
    pub const SPAWN_POINTS: [(f32, f32); 4] =
        [(236.0, 96.0), (132.0, 168.0), (116.0, 53.0), (16.0, 104.0)];

    /// Length of a skid from full reverse input to standstill.
    pub const SKID_DURATION: Duration = Duration::from_millis(500);
    /// Minimum interval between flap decisions.
    pub const FLAP_COOLDOWN: Duration = Duration::from_millis(200);
    /// Minimum interval between walk acceleration steps.
    pub const ACCEL_INTERVAL: Duration = Duration::from_millis(120);
    /// Throttle between materialization animation steps.
    pub const SPAWN_STEP_INTERVAL: Duration = Duration::from_millis(30);

    /// Standing pose frame index.
    pub const FRAME_STAND: usize = 3;
    /// Skid pose frame index.
    pub const FRAME_SKID: usize = 4;
    /// Wings-down flap pose frame index.
    pub const FRAME_FLAP_DOWN: usize = 5;
    /// Wings-up glide pose frame index.
    pub const FRAME_FLAP_UP: usize = 6;

    /// Distance between two points on a playfield that wraps on the x axis:
    /// the shorter of the direct and wrap-around horizontal deltas is used,
    /// while the vertical axis stays planar.
    #[must_use]
    pub fn wrapped_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
        let mut dx = (x2 - x1).abs();
        if dx > SCREEN_WIDTH / 2.0 {
            dx = SCREEN_WIDTH - dx;
        }
        let dy = y2 - y1;
        (dx * dx + dy * dy).sqrt()
    }
}
