//! Enemy state machine: autonomous lane-seeking flight, no human input.

use std::time::Duration;

use sky_joust_core::{
    arena, ActorState, EnemyId, Event, SoundId, SpawnColor, SpriteCatalog, SpriteFrame,
};

use crate::body::{collisions_against, Body};
use crate::mount::MountCore;
use crate::player::roll_flash;
use crate::terrain::Ledge;
use crate::TickContext;

/// Spawn steps spent materializing.
const REVEAL_STEPS: u32 = 20;
/// Downward drift granted when leaving the spawn pad.
const SPAWN_EXIT_VY: f32 = 1.0;
/// Speed index magnitude assigned on promotion, sign matching facing.
const CRUISE_SPEED: i32 = 2;
/// Horizontal speed while fleeing the arena unseated.
const FLEE_SPEED: f32 = 3.0;
/// Horizontal shove exchanged when two enemies collide.
const MUTUAL_PUSH: f32 = 5.0;
/// Speed index forced by an enemy-versus-enemy shove.
const MUTUAL_SPEED: i32 = 2;

/// One autonomous rider in the live set.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) core: MountCore,
    rider: SpriteFrame,
    pub(crate) id: EnemyId,
    pub(crate) state: ActorState,
    flight_step: bool,
    pub(crate) body_flash: Option<SpawnColor>,
    pub(crate) rider_flash: Option<SpawnColor>,
}

impl Enemy {
    pub(crate) fn new(
        catalog: &SpriteCatalog,
        id: EnemyId,
        x: f32,
        y: f32,
        facing_right: bool,
        now: Duration,
    ) -> Self {
        let mut core = MountCore::new(catalog.enemy_mount.clone(), x, y, now);
        core.facing_right = facing_right;
        Self {
            core,
            rider: catalog.enemy_rider.clone(),
            id,
            state: ActorState::Spawning,
            flight_step: false,
            body_flash: None,
            rider_flash: None,
        }
    }

    /// Advances the enemy one tick. `left` and `right` are the storage-order
    /// neighbours on either side of this enemy in the world's live set.
    pub(crate) fn update(
        &mut self,
        ctx: &mut TickContext<'_>,
        terrain: &[Ledge],
        left: &mut [Enemy],
        right: &mut [Enemy],
    ) {
        match self.state {
            ActorState::Spawning => self.spawning(ctx),
            ActorState::Mounted => self.mounted(ctx, terrain, left, right),
            ActorState::Unmounted => self.unmounted(ctx),
            ActorState::Dead => {}
        }
    }

    pub(crate) fn collision_body(&self) -> &Body {
        &self.core.body
    }

    /// Whether this enemy still carries a rider worth jousting.
    pub(crate) fn is_joustable(&self) -> bool {
        self.state == ActorState::Mounted
    }

    /// Knocks the rider off; the mount flees until it leaves the screen.
    pub(crate) fn unseat(&mut self, ctx: &mut TickContext<'_>) {
        self.state = ActorState::Unmounted;
        self.core.walking = false;
        ctx.events.push(Event::EnemyUnseated { enemy: self.id });
    }

    /// Applies a shove exchanged with another mounted actor.
    pub(crate) fn shove(&mut self, dx: f32, speed_index: i32) {
        self.core.body.x += dx;
        self.core.speed_index = speed_index;
    }

    fn spawning(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.now.saturating_sub(self.core.last_animate) < arena::SPAWN_STEP_INTERVAL {
            return;
        }

        if self.core.spawn_progress <= REVEAL_STEPS {
            self.build_spawn(ctx);
            self.core.spawn_progress += 1;
            if self.core.spawn_progress == REVEAL_STEPS {
                ctx.events.push(Event::SoundTriggered {
                    sound: SoundId::SpawnEnemy,
                });
            }
        } else {
            self.state = ActorState::Mounted;
            self.core.spawn_progress = 0;
            self.core.body.vy = SPAWN_EXIT_VY;
            self.core.speed_index = if self.core.facing_right {
                CRUISE_SPEED
            } else {
                -CRUISE_SPEED
            };
            self.rebuild(ctx);
        }
        self.core.last_animate = ctx.now;
    }

    fn mounted(
        &mut self,
        ctx: &mut TickContext<'_>,
        terrain: &[Ledge],
        left: &mut [Enemy],
        right: &mut [Enemy],
    ) {
        if self.core.seek_lane(ctx.now) {
            let sound = if self.flight_step {
                SoundId::FlightB
            } else {
                SoundId::FlightA
            };
            ctx.events.push(Event::SoundTriggered { sound });
            self.flight_step = !self.flight_step;
        }
        self.core.integrate();

        let mut above_ledge = false;
        for ledge in terrain {
            let collider = ledge.body();
            self.core.body.y += 1.0;
            let hit = self.core.body.collides(collider);
            self.core.body.y -= 1.0;
            if hit && self.core.bounce(collider).above {
                above_ledge = true;
            }
        }

        self.jostle(left, right);

        if !above_ledge {
            self.core.walking = false;
        }
        self.core.body.wrap_horizontal();
        self.rebuild(ctx);
    }

    /// Mutual bounce against the other live enemies, in storage order.
    fn jostle(&mut self, left: &mut [Enemy], right: &mut [Enemy]) {
        let hits = {
            let bodies: Vec<&Body> = left
                .iter()
                .chain(right.iter())
                .map(Enemy::collision_body)
                .collect();
            collisions_against(&self.core.body, &bodies)
        };

        for index in hits {
            let other = if index < left.len() {
                &mut left[index]
            } else {
                &mut right[index - left.len()]
            };
            if other.state != ActorState::Mounted {
                continue;
            }

            if self.core.body.center_x() < other.core.body.center_x() {
                self.core.body.x -= MUTUAL_PUSH;
                self.core.speed_index = -MUTUAL_SPEED;
                other.shove(MUTUAL_PUSH, MUTUAL_SPEED);
            } else {
                self.core.body.x += MUTUAL_PUSH;
                self.core.speed_index = MUTUAL_SPEED;
                other.shove(-MUTUAL_PUSH, -MUTUAL_SPEED);
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
            self.core.body.alive = false;
        }
        self.rebuild(ctx);
    }

    fn build_spawn(&mut self, ctx: &mut TickContext<'_>) {
        self.core.body.frame = arena::FRAME_STAND;
        self.core.walking = true;
        let full = self.compose_current(ctx);
        self.core.body.rendered = Some(full.reveal_from_bottom(self.core.spawn_progress));
    }

    fn rebuild(&mut self, ctx: &mut TickContext<'_>) {
        self.core.force_flap_frame();
        self.core.body.rendered = Some(self.compose_current(ctx));
    }

    fn compose_current(&mut self, ctx: &mut TickContext<'_>) -> SpriteFrame {
        if self.state == ActorState::Spawning {
            self.body_flash = Some(roll_flash(ctx.rng));
            self.rider_flash = Some(roll_flash(ctx.rng));
        } else {
            self.body_flash = None;
            self.rider_flash = None;
        }
        self.core.compose(&self.rider, 0)
    }
}
