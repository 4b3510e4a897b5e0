//! Spatial bodies and the pixel-accurate collision test.

use sky_joust_core::{arena, PixelRect, SpriteFrame};

/// Downward acceleration applied per airborne tick.
pub(crate) const GRAVITY_PER_TICK: f32 = 4.0 * arena::TICK_SECONDS / 2.0;

/// Vertical velocity assigned when the playfield ceiling pushes back.
const CEILING_REBOUND: f32 = 1.0;

/// Anchor mode deciding how a body's position maps to its rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    /// Position marks the sprite's center; mounts use this.
    Centered,
    /// Position marks the sprite's upper-left corner; terrain uses this.
    TopLeft,
}

/// Position, velocity and collision footprint of one on-screen entity.
///
/// Width and height are fixed at creation from the first animation frame;
/// position may exceed the screen bounds transiently, horizontal wrap is
/// corrective rather than constraining.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) alive: bool,
    pub(crate) frames: Vec<SpriteFrame>,
    pub(crate) frame: usize,
    pub(crate) rendered: Option<SpriteFrame>,
    pub(crate) anchor: Anchor,
}

impl Body {
    pub(crate) fn new(frames: Vec<SpriteFrame>, x: f32, y: f32) -> Self {
        let width = frames.first().map_or(0, SpriteFrame::width);
        let height = frames.first().map_or(0, SpriteFrame::height);
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            alive: true,
            frames,
            frame: 0,
            rendered: None,
            anchor: Anchor::Centered,
        }
    }

    /// Builds a top-left anchored body whose rendered pixels never change.
    pub(crate) fn fixed(frame: SpriteFrame, x: f32, y: f32) -> Self {
        let mut body = Body::new(vec![frame.clone()], x, y);
        body.rendered = Some(frame);
        body.anchor = Anchor::TopLeft;
        body
    }

    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Applies one tick of gravity, then integrates the vertical axis.
    pub(crate) fn fall(&mut self) {
        self.vy += GRAVITY_PER_TICK;
        self.y += self.vy;
    }

    /// Wraps the horizontal axis toroidally once the body is fully past an
    /// edge; the vertical axis is never wrapped.
    pub(crate) fn wrap_horizontal(&mut self) {
        let half = (self.width / 2) as f32;
        if self.x > arena::SCREEN_WIDTH + half {
            self.x = -half;
        } else if self.x < -half {
            self.x = arena::SCREEN_WIDTH + half;
        }
    }

    /// Clamps the body below the top of the playfield, pushing it back down.
    pub(crate) fn clamp_to_ceiling(&mut self) {
        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = CEILING_REBOUND;
        }
    }

    pub(crate) fn bounding_rect(&self) -> PixelRect {
        match self.anchor {
            Anchor::Centered => {
                let half_w = self.width as f32 / 2.0;
                let half_h = self.height as f32 / 2.0;
                PixelRect::new(
                    (self.x - half_w) as i32,
                    (self.y - half_h) as i32,
                    (self.x + half_w) as i32,
                    (self.y + half_h) as i32,
                )
            }
            Anchor::TopLeft => PixelRect::new(
                self.x as i32,
                self.y as i32,
                self.x as i32 + self.width as i32,
                self.y as i32 + self.height as i32,
            ),
        }
    }

    pub(crate) fn center_x(&self) -> f32 {
        match self.anchor {
            Anchor::Centered => self.x,
            Anchor::TopLeft => self.x + (self.width / 2) as f32,
        }
    }

    pub(crate) fn center_y(&self) -> f32 {
        match self.anchor {
            Anchor::Centered => self.y,
            Anchor::TopLeft => self.y + (self.height / 2) as f32,
        }
    }

    /// Top edge of the body in playfield coordinates.
    #[allow(dead_code)]
    pub(crate) fn top(&self) -> f32 {
        match self.anchor {
            Anchor::Centered => self.y - (self.height / 2) as f32,
            Anchor::TopLeft => self.y,
        }
    }

    /// Pixel-accurate overlap test.
    ///
    /// A rectangle intersection prefilter rejects the common case cheaply.
    /// Inside the intersection, this body's pixel is consulted first and the
    /// other body's buffer is only read where this one is already opaque;
    /// the short-circuit changes cost, never outcome. Bodies that have not
    /// composited a frame yet count as solid.
    pub(crate) fn collides(&self, other: &Body) -> bool {
        let own_rect = self.bounding_rect();
        let other_rect = other.bounding_rect();
        let overlap = own_rect.intersect(&other_rect);
        if overlap.is_empty() {
            return false;
        }

        let (own_image, other_image) = match (&self.rendered, &other.rendered) {
            (Some(own), Some(other)) => (own, other),
            _ => return true,
        };

        for y in overlap.min_y()..overlap.max_y() {
            for x in overlap.min_x()..overlap.max_x() {
                if own_image.opaque_at(x - own_rect.min_x(), y - own_rect.min_y())
                    && other_image.opaque_at(x - other_rect.min_x(), y - other_rect.min_y())
                {
                    return true;
                }
            }
        }
        false
    }
}

/// Tests `subject` against every member of `group` in array order, skipping
/// identity, and returns the indices of colliding members.
///
/// Callers resolve hits in the returned order, which keeps hit-response
/// ordering deterministic across a run.
pub(crate) fn collisions_against(subject: &Body, group: &[&Body]) -> Vec<usize> {
    let mut matched = Vec::new();
    for (index, candidate) in group.iter().enumerate() {
        if std::ptr::eq(subject, *candidate) {
            continue;
        }
        if subject.collides(candidate) {
            matched.push(index);
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::{collisions_against, Anchor, Body, GRAVITY_PER_TICK};
    use sky_joust_core::{arena, SpriteFrame};

    fn airborne_body(x: f32, y: f32) -> Body {
        let mut body = Body::new(vec![SpriteFrame::solid(4, 4)], x, y);
        body.rendered = Some(SpriteFrame::solid(4, 4));
        body
    }

    #[test]
    fn fall_accumulates_gravity_before_integrating() {
        let mut body = airborne_body(10.0, 10.0);
        body.fall();
        assert!((body.vy - GRAVITY_PER_TICK).abs() < f32::EPSILON);
        assert!((body.y - (10.0 + GRAVITY_PER_TICK)).abs() < f32::EPSILON);

        body.fall();
        assert!((body.vy - 2.0 * GRAVITY_PER_TICK).abs() < f32::EPSILON);
    }

    #[test]
    fn wrap_carries_body_to_the_opposite_edge() {
        let mut body = airborne_body(arena::SCREEN_WIDTH + 3.0, 50.0);
        body.wrap_horizontal();
        assert!((body.x - -2.0).abs() < f32::EPSILON);

        body.x = -3.0;
        body.wrap_horizontal();
        assert!((body.x - (arena::SCREEN_WIDTH + 2.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn wrap_is_idempotent_once_inside_the_band() {
        let mut body = airborne_body(arena::SCREEN_WIDTH + 40.0, 50.0);
        body.wrap_horizontal();
        let once = body.x;
        body.wrap_horizontal();
        assert!((body.x - once).abs() < f32::EPSILON);
        assert!(body.x >= -((body.width / 2) as f32));
        assert!(body.x <= arena::SCREEN_WIDTH + (body.width / 2) as f32);
    }

    #[test]
    fn ceiling_clamp_resets_height_and_pushes_down() {
        let mut body = airborne_body(10.0, -2.5);
        body.vy = -1.0;
        body.clamp_to_ceiling();
        assert!((body.y - 0.0).abs() < f32::EPSILON);
        assert!((body.vy - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn centered_and_top_left_rects_disagree() {
        let centered = airborne_body(10.0, 10.0);
        let rect = centered.bounding_rect();
        assert_eq!(rect.min_x(), 8);
        assert_eq!(rect.max_x(), 12);

        let fixed = Body::fixed(SpriteFrame::solid(4, 4), 10.0, 10.0);
        assert_eq!(fixed.anchor, Anchor::TopLeft);
        let rect = fixed.bounding_rect();
        assert_eq!(rect.min_x(), 10);
        assert_eq!(rect.max_x(), 14);
    }

    #[test]
    fn overlapping_rects_without_shared_opaque_pixels_do_not_collide() {
        // Left half opaque vs right half opaque: rectangles overlap fully,
        // opacity never lines up.
        let left_half = SpriteFrame::from_alpha(4, 1, vec![255, 255, 0, 0]);
        let right_half = SpriteFrame::from_alpha(4, 1, vec![0, 0, 255, 255]);

        let mut first = Body::new(vec![left_half.clone()], 10.0, 10.0);
        first.rendered = Some(left_half);
        let mut second = Body::new(vec![right_half.clone()], 10.0, 10.0);
        second.rendered = Some(right_half);

        assert!(!first.collides(&second));
        assert!(!second.collides(&first));
    }

    #[test]
    fn collision_outcome_is_symmetric_when_pixels_line_up() {
        let first = airborne_body(10.0, 10.0);
        let second = airborne_body(12.0, 11.0);
        assert!(first.collides(&second));
        assert!(second.collides(&first));
    }

    #[test]
    fn unrendered_body_collides_on_rectangle_overlap() {
        let mut ghost = airborne_body(10.0, 10.0);
        ghost.rendered = None;
        let solid = airborne_body(12.0, 10.0);
        assert!(ghost.collides(&solid));
        assert!(solid.collides(&ghost));
    }

    #[test]
    fn disjoint_bodies_never_collide() {
        let first = airborne_body(10.0, 10.0);
        let second = airborne_body(100.0, 10.0);
        assert!(!first.collides(&second));
    }

    #[test]
    fn group_collisions_skip_identity_and_follow_array_order() {
        let subject = airborne_body(10.0, 10.0);
        let near = airborne_body(12.0, 10.0);
        let far = airborne_body(200.0, 10.0);
        let close = airborne_body(9.0, 9.0);

        let group = [&near, &far, &subject, &close];
        let matched = collisions_against(&subject, &group);
        assert_eq!(matched, vec![0, 3]);
    }
}
