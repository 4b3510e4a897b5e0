//! Player state machine: spawn pad, mounted locomotion, joust resolution.

use std::time::Duration;

use sky_joust_core::{arena, ActorState, Event, SoundId, SpawnColor, SpriteCatalog, SpriteFrame};

use crate::body::{collisions_against, Body};
use crate::enemy::Enemy;
use crate::mount::{FlapPhase, MountCore};
use crate::terrain::Ledge;
use crate::{SplitMix64, TickContext};

/// Upward impulse from a player-commanded wing beat.
const INPUT_FLAP_IMPULSE: f32 = -0.4;
/// Downward drift granted when leaving the spawn pad.
const SPAWN_EXIT_VY: f32 = 1.0;
/// Horizontal speed while fleeing the arena unseated.
const FLEE_SPEED: f32 = 3.0;
/// Spawn steps spent materializing before the ready pose.
const REVEAL_STEPS: u32 = 20;
/// Spawn step at which the pad promotes the rider without input.
const AUTO_MOUNT_STEP: u32 = 100;
/// Rider overlay drop while the mount skids.
const SKID_RIDER_DROP: u32 = 2;
/// Horizontal shove exchanged in a dead-even joust.
const JOUST_TIE_PUSH: f32 = 5.0;
/// Speed index forced by a dead-even joust, sign matching the push.
const JOUST_TIE_SPEED: i32 = 2;

/// The one player-controlled rider.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) core: MountCore,
    rider: SpriteFrame,
    pub(crate) state: ActorState,
    last_accel: Duration,
    skid_until: Option<Duration>,
    walk_step: bool,
    pub(crate) body_flash: Option<SpawnColor>,
    pub(crate) rider_flash: Option<SpawnColor>,
}

impl Player {
    pub(crate) fn new(catalog: &SpriteCatalog, now: Duration) -> Self {
        let (x, y) = arena::SPAWN_POINTS[1];
        Self {
            core: MountCore::new(catalog.player_mount.clone(), x, y, now),
            rider: catalog.player_rider.clone(),
            state: ActorState::Spawning,
            last_accel: now,
            skid_until: None,
            walk_step: false,
            body_flash: None,
            rider_flash: None,
        }
    }

    pub(crate) fn update(
        &mut self,
        ctx: &mut TickContext<'_>,
        terrain: &[Ledge],
        enemies: &mut [Enemy],
    ) {
        match self.state {
            ActorState::Spawning => self.spawning(ctx),
            ActorState::Mounted => self.mounted(ctx, terrain, enemies),
            ActorState::Unmounted => self.unmounted(ctx),
            ActorState::Dead => self.dead(ctx),
        }
    }

    /// Reports whether the player is currently skidding to a stop.
    pub(crate) fn skidding(&self) -> bool {
        self.skid_until.is_some()
    }

    fn spawning(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.now.saturating_sub(self.core.last_animate) < arena::SPAWN_STEP_INTERVAL {
            return;
        }

        if self.core.spawn_progress <= REVEAL_STEPS {
            self.build_spawn(ctx.rng);
            self.core.spawn_progress += 1;
            if self.core.spawn_progress == REVEAL_STEPS {
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::Energize,
                });
            }
        } else if self.core.spawn_progress < AUTO_MOUNT_STEP {
            if ctx.input.any_steering() {
                self.leave_pad(ctx.rng);
                ctx.events.push(Event::SoundHalted {
                    sound: SoundId::Energize,
                });
            } else {
                self.rebuild(ctx.rng);
                self.core.spawn_progress += 1;
            }
        } else {
            self.leave_pad(ctx.rng);
        }
        self.core.last_animate = ctx.now;
    }

    fn leave_pad(&mut self, rng: &mut SplitMix64) {
        self.state = ActorState::Mounted;
        self.core.spawn_progress = 0;
        self.core.body.vy = SPAWN_EXIT_VY;
        self.rebuild(rng);
    }

    fn mounted(&mut self, ctx: &mut TickContext<'_>, terrain: &[Ledge], enemies: &mut [Enemy]) {
        self.walk_input(ctx);
        self.flap_input(ctx);
        self.core.integrate();
        *ctx.debug = format!("xspeed={}", self.core.speed_index);

        let mut above_ledge = false;
        for ledge in terrain {
            let collider = ledge.body();
            // Probe one pixel down: "am I standing on this ledge".
            self.core.body.y += 1.0;
            let hit = self.core.body.collides(collider);
            self.core.body.y -= 1.0;
            if hit {
                let outcome = self.core.bounce(collider);
                if outcome.above {
                    above_ledge = true;
                }
                if outcome.bumped {
                    ctx.events.push(Event::SoundTriggered {
                        sound: SoundId::Bump,
                    });
                }
            }
        }

        self.joust(ctx, enemies);
        self.walk_animation(ctx);
        self.core.body.wrap_horizontal();
        if !above_ledge {
            self.core.walking = false;
        }
        self.rebuild(ctx.rng);
    }

    /// Resolves pixel collisions against the live enemies, in storage order.
    fn joust(&mut self, ctx: &mut TickContext<'_>, enemies: &mut [Enemy]) {
        let hits = {
            let bodies: Vec<&Body> = enemies.iter().map(Enemy::collision_body).collect();
            collisions_against(&self.core.body, &bodies)
        };

        for index in hits {
            if self.state != ActorState::Mounted {
                break;
            }
            let enemy = &mut enemies[index];
            if !enemy.is_joustable() {
                continue;
            }

            let own_y = self.core.body.y;
            let enemy_y = enemy.collision_body().y;
            if own_y < enemy_y {
                enemy.unseat(ctx);
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::Whomp,
                });
            } else if own_y > enemy_y {
                if !ctx.god_mode {
                    self.unseat(ctx);
                }
            } else {
                // Dead-even lances: shove both riders apart, nobody falls.
                if self.core.body.center_x() < enemy.collision_body().center_x() {
                    self.core.body.x -= JOUST_TIE_PUSH;
                    self.core.speed_index = -JOUST_TIE_SPEED;
                    enemy.shove(JOUST_TIE_PUSH, JOUST_TIE_SPEED);
                } else {
                    self.core.body.x += JOUST_TIE_PUSH;
                    self.core.speed_index = JOUST_TIE_SPEED;
                    enemy.shove(-JOUST_TIE_PUSH, -JOUST_TIE_SPEED);
                }
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::Bump,
                });
            }
        }
    }

    fn unseat(&mut self, ctx: &mut TickContext<'_>) {
        self.state = ActorState::Unmounted;
        self.core.flap = FlapPhase::None;
        self.core.walking = false;
        self.skid_until = None;
        ctx.events.push(Event::SoundTriggered {
            sound: SoundId::Hit,
        });
        ctx.events.push(Event::PlayerUnseated);
    }

    fn walk_input(&mut self, ctx: &mut TickContext<'_>) {
        let now = ctx.now;
        let can_accel = now.saturating_sub(self.last_accel) >= arena::ACCEL_INTERVAL;

        if let Some(deadline) = self.skid_until {
            if deadline > now {
                if self.core.speed_index != 0 {
                    let remaining = deadline - now;
                    let magnitude = if remaining > arena::SKID_DURATION * 2 / 3 {
                        4
                    } else if remaining > arena::SKID_DURATION / 3 {
                        3
                    } else {
                        2
                    };
                    self.core.speed_index = if self.core.speed_index > 0 {
                        magnitude
                    } else {
                        -magnitude
                    };
                }
            } else {
                self.core.speed_index = 0;
                self.last_accel = now;
                self.skid_until = None;
            }
        } else if self.core.walking
            && (self.core.speed_index > 3 && ctx.input.left
                || self.core.speed_index < -3 && ctx.input.right)
        {
            self.skid_until = Some(now + arena::SKID_DURATION);
            ctx.events.push(Event::SoundTriggered {
                sound: SoundId::Skid,
            });
        } else if ctx.input.left {
            if self.core.walking {
                if can_accel {
                    self.core.body.vx = -1.0;
                    if self.core.speed_index > -arena::MAX_SPEED_INDEX {
                        self.core.speed_index -= 1;
                        self.last_accel = now;
                    }
                }
            } else {
                self.core.facing_right = false;
            }
        } else if ctx.input.right {
            if self.core.walking {
                if can_accel {
                    self.core.body.vx = 1.0;
                    if self.core.speed_index < arena::MAX_SPEED_INDEX {
                        self.core.speed_index += 1;
                        self.last_accel = now;
                    }
                }
            } else {
                self.core.facing_right = true;
            }
        }
    }

    fn flap_input(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.input.flap {
            self.skid_until = None;
            if self.core.flap == FlapPhase::None {
                if ctx.input.left {
                    self.core.speed_index -= 1;
                }
                if ctx.input.right {
                    self.core.speed_index += 1;
                }
                self.core.body.vy = INPUT_FLAP_IMPULSE;
                self.core.flap = FlapPhase::Down;
                ctx.events.push(Event::AllSoundsStopped);
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::FlapDown,
                });
            } else {
                self.core.flap = FlapPhase::Up;
            }
            self.core.walking = false;
        } else {
            if self.core.flap == FlapPhase::Up {
                ctx.events.push(Event::AllSoundsStopped);
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::FlapUp,
                });
            }
            self.core.flap = FlapPhase::None;
        }
    }

    fn walk_animation(&mut self, ctx: &mut TickContext<'_>) {
        if !self.core.walking {
            return;
        }
        if self.core.speed_index == 0 {
            self.core.body.frame = arena::FRAME_STAND;
            ctx.events.push(Event::AllSoundsStopped);
        } else if self.skid_until.is_some() {
            self.core.body.frame = arena::FRAME_SKID;
        } else {
            let delay = arena::WALK_FRAME_DELAYS[self.core.speed_index.unsigned_abs() as usize - 1];
            if ctx.now.saturating_sub(self.core.last_animate) >= delay {
                self.core.body.frame += 1;
                if self.core.body.frame > arena::FRAME_STAND {
                    self.core.body.frame = 0;
                }
                if self.core.body.frame == 2 {
                    let sound = if self.walk_step {
                        SoundId::WalkB
                    } else {
                        SoundId::WalkA
                    };
                    ctx.events.push(Event::SoundTriggered { sound });
                    self.walk_step = !self.walk_step;
                }
                self.core.last_animate = ctx.now;
            }
        }
    }

    fn unmounted(&mut self, ctx: &mut TickContext<'_>) {
        if self.core.body.x < arena::SCREEN_WIDTH / 2.0 {
            self.core.body.x -= FLEE_SPEED;
            self.core.facing_right = false;
        } else {
            self.core.body.x += FLEE_SPEED;
            self.core.facing_right = true;
        }
        self.core.walking = false;

        let half = (self.core.body.width / 2) as f32;
        if self.core.body.x < -half || self.core.body.x > arena::SCREEN_WIDTH + half {
            self.state = ActorState::Dead;
        }
        self.rebuild(ctx.rng);
    }

    /// One-tick pass-through: reset onto a random spawn point and rematerialize.
    fn dead(&mut self, ctx: &mut TickContext<'_>) {
        let choice = (ctx.rng.next_u64() % arena::SPAWN_POINTS.len() as u64) as usize;
        let (x, y) = arena::SPAWN_POINTS[choice];
        self.core.body.set_position(x, y);
        self.core.body.vx = 0.0;
        self.core.body.vy = 0.0;
        self.core.speed_index = 0;
        self.core.flap = FlapPhase::None;
        self.core.walking = false;
        self.core.spawn_progress = 0;
        self.skid_until = None;
        self.core.last_animate = ctx.now;
        self.state = ActorState::Spawning;
        ctx.events.push(Event::SoundTriggered {
            sound: SoundId::Spawn,
        });
        ctx.events.push(Event::PlayerRespawned);
    }

    /// Rebuilds the materialization composite: the ready pose revealed from
    /// the bottom, one more row per step.
    fn build_spawn(&mut self, rng: &mut SplitMix64) {
        self.core.body.frame = arena::FRAME_STAND;
        self.core.walking = true;
        let full = self.compose_current(rng);
        self.core.body.rendered = Some(full.reveal_from_bottom(self.core.spawn_progress));
    }

    /// Rebuilds the rendered composite for the current pose.
    fn rebuild(&mut self, rng: &mut SplitMix64) {
        self.core.force_flap_frame();
        self.core.body.rendered = Some(self.compose_current(rng));
    }

    fn compose_current(&mut self, rng: &mut SplitMix64) -> SpriteFrame {
        if self.state == ActorState::Spawning {
            self.body_flash = Some(roll_flash(rng));
            self.rider_flash = Some(roll_flash(rng));
        } else {
            self.body_flash = None;
            self.rider_flash = None;
        }
        let rider_dy = if self.core.body.frame == arena::FRAME_SKID {
            SKID_RIDER_DROP
        } else {
            0
        };
        self.core.compose(&self.rider, rider_dy)
    }
}

pub(crate) fn roll_flash(rng: &mut SplitMix64) -> SpawnColor {
    let palette = SpawnColor::PALETTE;
    palette[(rng.next_u64() % palette.len() as u64) as usize]
}
