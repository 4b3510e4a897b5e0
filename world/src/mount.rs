//! Locomotion shared by every rider-and-mount actor.
//!
//! Both the player and the enemies embed a [`MountCore`] by value; what
//! differs between them is only where steering comes from (input vs the
//! lane-seeking rule) and which sounds their collisions raise.

use std::time::Duration;

use sky_joust_core::{arena, PixelRect, SpriteFrame};

use crate::body::Body;

/// Upward impulse from a lane-seeking wing beat.
const LANE_FLAP_IMPULSE: f32 = -0.3;
/// Vertical velocity while resting on top of a ledge.
const RESTING_VY: f32 = 0.5;
/// Downward shove when bumping a ledge from below.
const UNDERSIDE_PUSH: f32 = 3.0;
/// Horizontal shove away from a ledge hit on the side.
const SIDE_PUSH: f32 = 5.0;
/// Speed index forced by a side bounce, sign matching the push.
const SIDE_BOUNCE_SPEED: i32 = 2;
/// Horizontal offset of the rider overlay within the composite.
const RIDER_OFFSET_X: u32 = 4;

/// Wing-beat phase; fully determines the forced animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FlapPhase {
    /// Wings at rest.
    None,
    /// Beat just triggered this tick.
    Down,
    /// Beat sustained past its first tick.
    Up,
}

/// How one collision with a solid collider was resolved.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BounceOutcome {
    /// The actor came to rest on top of the collider this tick.
    pub(crate) above: bool,
    /// The actor was shoved (below or sideways); bump feedback applies.
    pub(crate) bumped: bool,
}

/// Shared flight/walk state embedded by value in each concrete actor.
#[derive(Clone, Debug)]
pub(crate) struct MountCore {
    pub(crate) body: Body,
    pub(crate) facing_right: bool,
    pub(crate) speed_index: i32,
    pub(crate) flap: FlapPhase,
    pub(crate) walking: bool,
    pub(crate) spawn_progress: u32,
    pub(crate) last_flap: Option<Duration>,
    pub(crate) last_animate: Duration,
}

impl MountCore {
    pub(crate) fn new(frames: Vec<SpriteFrame>, x: f32, y: f32, now: Duration) -> Self {
        Self {
            body: Body::new(frames, x, y),
            facing_right: true,
            speed_index: 0,
            flap: FlapPhase::None,
            walking: false,
            spawn_progress: 0,
            last_flap: None,
            last_animate: now,
        }
    }

    fn flap_ready(&self, now: Duration) -> bool {
        self.last_flap
            .map_or(true, |last| now.saturating_sub(last) >= arena::FLAP_COOLDOWN)
    }

    /// The lane-seeking flap decision, throttled to one per cooldown window.
    ///
    /// Finds the nearest of the fixed flight lanes by toroidal distance and
    /// beats upward when that lane lies above the actor. Returns whether a
    /// beat was triggered so callers can raise flight ambience.
    pub(crate) fn seek_lane(&mut self, now: Duration) -> bool {
        if !self.flap_ready(now) {
            return false;
        }

        let mut closest = f32::MAX;
        let mut target = arena::LANES[0];
        for lane in arena::LANES {
            let distance = arena::wrapped_distance(self.body.x, self.body.y, self.body.x, lane);
            if distance < closest {
                closest = distance;
                target = lane;
            }
        }

        if target < self.body.y {
            self.flap = FlapPhase::Down;
            self.walking = false;
            self.body.vy = LANE_FLAP_IMPULSE;
            self.last_flap = Some(now);
            true
        } else {
            if !self.walking {
                self.flap = FlapPhase::None;
            }
            false
        }
    }

    /// One tick of shared locomotion: facing, fall, speed-table lookup and
    /// axis integration, ending with the hard ceiling at the playfield top.
    pub(crate) fn integrate(&mut self) {
        if self.walking {
            if self.speed_index != 0 {
                self.facing_right = self.speed_index > 0;
            }
        } else {
            self.body.fall();
        }

        self.speed_index = self
            .speed_index
            .clamp(-arena::MAX_SPEED_INDEX, arena::MAX_SPEED_INDEX);
        let step = arena::MOVE_SPEED[self.speed_index.unsigned_abs() as usize];
        if self.speed_index < 0 {
            self.body.x -= step;
        } else {
            self.body.x += step;
        }
        self.body.y += self.body.vy;

        self.body.clamp_to_ceiling();
    }

    /// Resolves one confirmed collision against a solid collider.
    ///
    /// Exactly one of four outcomes fires, tested in priority order: rest on
    /// top, shove from below, shove left, shove right. The above test uses a
    /// 3px grace margin on the collider's span, the below test none; the
    /// difference favors safe landings over under-ledge bumps and is kept
    /// deliberately.
    pub(crate) fn bounce(&mut self, collider: &Body) -> BounceOutcome {
        let mut outcome = BounceOutcome::default();
        let span = collider.bounding_rect();
        if self.body.y < collider.center_y() && x_within_span(self.body.x, &span, 3) {
            self.body.vy = RESTING_VY;
            self.body.y = collider.y - (self.body.height / 2) as f32;
            self.walking = true;
            outcome.above = true;
        } else if self.body.y - self.body.vy > collider.y && x_within_span(self.body.x, &span, 0) {
            self.body.y += UNDERSIDE_PUSH;
            self.body.vy = RESTING_VY;
            outcome.bumped = true;
        } else if self.body.center_x() < collider.center_x() {
            self.body.x -= SIDE_PUSH;
            self.speed_index = -SIDE_BOUNCE_SPEED;
            outcome.bumped = true;
        } else if self.body.center_x() > collider.center_x() {
            self.body.x += SIDE_PUSH;
            self.speed_index = SIDE_BOUNCE_SPEED;
            outcome.bumped = true;
        }
        outcome
    }

    /// Forces the animation frame the current flap phase dictates.
    pub(crate) fn force_flap_frame(&mut self) {
        match self.flap {
            FlapPhase::Down => self.body.frame = arena::FRAME_FLAP_DOWN,
            FlapPhase::Up => self.body.frame = arena::FRAME_FLAP_UP,
            FlapPhase::None => {
                if !self.walking {
                    self.body.frame = arena::FRAME_FLAP_UP;
                }
            }
        }
    }

    /// Composites the current mount frame with its rider overlay, mirrored
    /// when the actor faces left.
    pub(crate) fn compose(&self, rider: &SpriteFrame, rider_dy: u32) -> SpriteFrame {
        let base = &self.body.frames[self.body.frame.min(self.body.frames.len() - 1)];
        let composite = base.overlay(rider, RIDER_OFFSET_X, rider_dy);
        if self.facing_right {
            composite
        } else {
            composite.flip_horizontal()
        }
    }
}

fn x_within_span(x: f32, span: &PixelRect, grace: i32) -> bool {
    x <= (span.max_x() - grace) as f32 && x >= (span.min_x() + grace) as f32
}

#[cfg(test)]
mod tests {
    use super::{FlapPhase, MountCore, LANE_FLAP_IMPULSE};
    use crate::body::Body;
    use sky_joust_core::{arena, SpriteFrame};
    use std::time::Duration;

    fn core_at(x: f32, y: f32) -> MountCore {
        let frames = vec![SpriteFrame::solid(8, 8); 7];
        let mut core = MountCore::new(frames, x, y, Duration::ZERO);
        core.body.rendered = Some(SpriteFrame::solid(8, 8));
        core
    }

    fn ledge_at(x: f32, y: f32, width: u32, height: u32) -> Body {
        Body::fixed(SpriteFrame::solid(width, height), x, y)
    }

    #[test]
    fn seek_lane_flaps_upward_toward_a_higher_lane() {
        // Nearest lane (89) sits above y = 100.
        let mut core = core_at(150.0, 100.0);
        let flapped = core.seek_lane(Duration::from_millis(300));
        assert!(flapped);
        assert_eq!(core.flap, FlapPhase::Down);
        assert!(!core.walking);
        assert!((core.body.vy - LANE_FLAP_IMPULSE).abs() < f32::EPSILON);
        assert_eq!(core.last_flap, Some(Duration::from_millis(300)));
    }

    #[test]
    fn seek_lane_glides_when_the_nearest_lane_is_below() {
        // Nearest lane (35) sits below y = 20.
        let mut core = core_at(150.0, 20.0);
        let flapped = core.seek_lane(Duration::from_millis(300));
        assert!(!flapped);
        assert_eq!(core.flap, FlapPhase::None);
        assert!((core.body.vy - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn seek_lane_respects_the_cooldown() {
        let mut core = core_at(150.0, 100.0);
        assert!(core.seek_lane(Duration::from_millis(300)));
        assert!(!core.seek_lane(Duration::from_millis(400)));
        assert!(core.seek_lane(Duration::from_millis(500)));
    }

    #[test]
    fn integrate_moves_by_the_speed_table() {
        for (index, expected) in arena::MOVE_SPEED.iter().enumerate() {
            let mut core = core_at(100.0, 50.0);
            core.walking = true;
            core.speed_index = index as i32;
            core.integrate();
            assert!(
                (core.body.x - (100.0 + expected)).abs() < f32::EPSILON,
                "index {index}"
            );

            let mut core = core_at(100.0, 50.0);
            core.walking = true;
            core.speed_index = -(index as i32);
            core.integrate();
            assert!(
                (core.body.x - (100.0 - expected)).abs() < f32::EPSILON,
                "negative index {index}"
            );
        }
    }

    #[test]
    fn integrate_clamps_runaway_speed_indices() {
        let mut core = core_at(100.0, 50.0);
        core.walking = true;
        core.speed_index = 9;
        core.integrate();
        assert_eq!(core.speed_index, arena::MAX_SPEED_INDEX);
        let expected = 100.0 + arena::MOVE_SPEED[arena::MAX_SPEED_INDEX as usize];
        assert!((core.body.x - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn integrate_updates_facing_from_speed_sign_only_when_walking() {
        let mut core = core_at(100.0, 50.0);
        core.walking = true;
        core.speed_index = -1;
        core.integrate();
        assert!(!core.facing_right);

        core.speed_index = 0;
        core.integrate();
        assert!(!core.facing_right, "zero speed keeps the last facing");
    }

    #[test]
    fn ceiling_turns_flight_back_down() {
        let mut core = core_at(100.0, 0.5);
        core.body.vy = -2.0;
        core.integrate();
        assert!((core.body.y - 0.0).abs() < f32::EPSILON);
        assert!((core.body.vy - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn bounce_prefers_above_when_above_and_left_both_hold() {
        let ledge = ledge_at(100.0, 100.0, 60, 8);
        // Center x (130) is to the right of the actor (110): the side branch
        // would fire, but the actor also sits above the vertical center and
        // inside the graced span, so the landing wins.
        let mut core = core_at(110.0, 98.0);
        let outcome = core.bounce(&ledge);
        assert!(outcome.above);
        assert!(!outcome.bumped);
        assert!(core.walking);
        assert!((core.body.y - (100.0 - 4.0)).abs() < f32::EPSILON);
        assert!((core.body.vy - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn bounce_from_below_shoves_downward() {
        let ledge = ledge_at(100.0, 100.0, 60, 8);
        let mut core = core_at(110.0, 106.0);
        core.body.vy = -2.0;
        let outcome = core.bounce(&ledge);
        assert!(!outcome.above);
        assert!(outcome.bumped);
        assert!((core.body.y - 109.0).abs() < f32::EPSILON);
        assert!((core.body.vy - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn bounce_shoves_sideways_outside_the_span() {
        let ledge = ledge_at(100.0, 100.0, 60, 8);

        let mut core = core_at(99.0, 106.0);
        core.body.vy = 0.25;
        let outcome = core.bounce(&ledge);
        assert!(outcome.bumped);
        assert!((core.body.x - 94.0).abs() < f32::EPSILON);
        assert_eq!(core.speed_index, -2);

        let mut core = core_at(161.0, 106.0);
        core.body.vy = 0.25;
        let outcome = core.bounce(&ledge);
        assert!(outcome.bumped);
        assert!((core.body.x - 166.0).abs() < f32::EPSILON);
        assert_eq!(core.speed_index, 2);
    }

    #[test]
    fn forced_frames_follow_the_flap_phase() {
        let mut core = core_at(100.0, 50.0);
        core.flap = FlapPhase::Down;
        core.force_flap_frame();
        assert_eq!(core.body.frame, arena::FRAME_FLAP_DOWN);

        core.flap = FlapPhase::Up;
        core.force_flap_frame();
        assert_eq!(core.body.frame, arena::FRAME_FLAP_UP);

        core.flap = FlapPhase::None;
        core.walking = false;
        core.force_flap_frame();
        assert_eq!(core.body.frame, arena::FRAME_FLAP_UP);

        core.walking = true;
        core.body.frame = arena::FRAME_STAND;
        core.force_flap_frame();
        assert_eq!(core.body.frame, arena::FRAME_STAND);
    }

    #[test]
    fn compose_mirrors_when_facing_left() {
        let mut frames = vec![SpriteFrame::solid(4, 2); 7];
        frames[0] = SpriteFrame::from_alpha(4, 2, vec![255, 0, 0, 0, 255, 0, 0, 0]);
        let rider = SpriteFrame::from_alpha(1, 1, vec![0]);

        let mut core = MountCore::new(frames, 0.0, 0.0, Duration::ZERO);
        core.body.frame = 0;
        let facing_right = core.compose(&rider, 0);
        assert!(facing_right.opaque_at(0, 0));
        assert!(!facing_right.opaque_at(3, 0));

        core.facing_right = false;
        let facing_left = core.compose(&rider, 0);
        assert!(facing_left.opaque_at(3, 0));
        assert!(!facing_left.opaque_at(0, 0));
    }
}
