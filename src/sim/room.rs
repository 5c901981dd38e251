//! Rectangular mirror cavity
//!
//! The vertical walls are mirrors and always reflect. The horizontal walls
//! absorb the photon or bounce it back, depending on their `WallBehavior`.
//! Every predicate keeps `object_radius` of slack so the photon is treated as
//! a disc rather than a point.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Boundary, MirrorLine};
use crate::error::GeometryError;

/// Height of the band that a re-tilted floor mirror's endpoints are drawn
/// from, measured up from `Room::floor_limit`
pub const FLOOR_TILT_BAND: f32 = 100.0;

/// What a horizontal wall does to a photon that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallBehavior {
    /// Terminate the run
    #[default]
    Absorb,
    /// Reflect like a mirror and keep going
    Bounce,
}

/// Boundaries triggered by a single position, at most one per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crossings {
    /// Left or right mirror
    pub side: Option<Boundary>,
    /// Top or bottom wall
    pub wall: Option<Boundary>,
}

impl Crossings {
    pub fn is_empty(&self) -> bool {
        self.side.is_none() && self.wall.is_none()
    }
}

/// Axis-aligned cavity snapshot
///
/// Immutable once built; the `with_*` and `retilted` methods return new rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    /// Drawn wall thickness (rendering only, does not affect collisions)
    thickness: f32,
    /// Radius of the moving object, used as slack on every boundary
    object_radius: f32,
    top_wall: WallBehavior,
    bottom_wall: WallBehavior,
    floor_mirror: Option<MirrorLine>,
}

impl Room {
    pub fn new(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        thickness: f32,
        object_radius: f32,
    ) -> Result<Self, GeometryError> {
        let values = [left, right, top, bottom, thickness, object_radius];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if left >= right || top >= bottom {
            return Err(GeometryError::EmptyRoom);
        }
        if thickness < 0.0 {
            return Err(GeometryError::NegativeRadius(thickness));
        }
        if object_radius < 0.0 {
            return Err(GeometryError::NegativeRadius(object_radius));
        }

        Ok(Self {
            left,
            right,
            top,
            bottom,
            thickness,
            object_radius,
            top_wall: WallBehavior::Absorb,
            bottom_wall: WallBehavior::Absorb,
            floor_mirror: None,
        })
    }

    /// Same room with different horizontal wall behaviors
    pub fn with_walls(mut self, top: WallBehavior, bottom: WallBehavior) -> Self {
        self.top_wall = top;
        self.bottom_wall = bottom;
        self
    }

    /// Same room with a tilted mirror resting near the floor
    pub fn with_floor_mirror(mut self, line: MirrorLine) -> Self {
        self.floor_mirror = Some(line);
        self
    }

    /// Lowest height a floor mirror may reach
    ///
    /// At or above the edge of the bottom margin, so a photon heading down
    /// meets the mirror before the bottom wall.
    pub fn floor_limit(&self) -> f32 {
        self.bottom - self.object_radius
    }

    /// Same room with a freshly tilted floor mirror
    ///
    /// Each endpoint height is drawn independently from the band just above
    /// `floor_limit`, one endpoint on each side mirror.
    pub fn retilted<R: Rng>(&self, rng: &mut R) -> Self {
        let limit = self.floor_limit();
        let band_top = (limit - FLOOR_TILT_BAND).max(self.top + self.object_radius);
        let mut draw = || {
            if band_top < limit {
                rng.random_range(band_top..=limit)
            } else {
                limit
            }
        };
        let start = Vec2::new(self.left, draw());
        let end = Vec2::new(self.right, draw());

        let mut room = self.clone();
        // left < right, so the endpoints can never coincide
        room.floor_mirror = Some(MirrorLine { start, end });
        log::debug!("Floor mirror re-tilted: {:?} -> {:?}", start, end);
        room
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.right
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    #[inline]
    pub fn object_radius(&self) -> f32 {
        self.object_radius
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn floor_mirror(&self) -> Option<&MirrorLine> {
        self.floor_mirror.as_ref()
    }

    /// Behavior of a horizontal wall (side mirrors always bounce)
    pub fn wall_behavior(&self, boundary: Boundary) -> WallBehavior {
        match boundary {
            Boundary::Top => self.top_wall,
            Boundary::Bottom => self.bottom_wall,
            _ => WallBehavior::Bounce,
        }
    }

    #[inline]
    pub fn is_left_reflection(&self, p: Vec2) -> bool {
        p.x < self.left + self.object_radius
    }

    #[inline]
    pub fn is_right_reflection(&self, p: Vec2) -> bool {
        p.x > self.right - self.object_radius
    }

    #[inline]
    pub fn is_top_absorption(&self, p: Vec2) -> bool {
        p.y < self.top + self.object_radius
    }

    #[inline]
    pub fn is_bottom_absorption(&self, p: Vec2) -> bool {
        p.y > self.bottom - self.object_radius
    }

    /// True if the point sits clear of every boundary margin
    pub fn contains(&self, p: Vec2) -> bool {
        !(self.is_left_reflection(p)
            || self.is_right_reflection(p)
            || self.is_top_absorption(p)
            || self.is_bottom_absorption(p))
    }

    /// Boundaries the photon has run into this step
    ///
    /// A boundary only counts when the position is inside its margin and the
    /// velocity points into it, so a photon leaving a margin never re-triggers.
    /// Each axis is judged on its own.
    pub fn crossings(&self, position: Vec2, velocity: Vec2) -> Crossings {
        let side = if velocity.x < 0.0 && self.is_left_reflection(position) {
            Some(Boundary::Left)
        } else if velocity.x > 0.0 && self.is_right_reflection(position) {
            Some(Boundary::Right)
        } else {
            None
        };

        let wall = if velocity.y < 0.0 && self.is_top_absorption(position) {
            Some(Boundary::Top)
        } else if velocity.y > 0.0 && self.is_bottom_absorption(position) {
            Some(Boundary::Bottom)
        } else {
            None
        };

        Crossings { side, wall }
    }

    /// Coordinate a position is clamped to after touching `boundary`
    ///
    /// An x value for the side mirrors, a y value for the walls. The floor
    /// mirror has no single clamp coordinate.
    pub fn clamp_coordinate(&self, boundary: Boundary) -> Option<f32> {
        match boundary {
            Boundary::Left => Some(self.left + self.object_radius),
            Boundary::Right => Some(self.right - self.object_radius),
            Boundary::Top => Some(self.top + self.object_radius),
            Boundary::Bottom => Some(self.bottom - self.object_radius),
            Boundary::FloorMirror => None,
        }
    }

    /// Move a position back onto the inner edge of `boundary`
    pub fn clamp_to(&self, position: Vec2, boundary: Boundary) -> Vec2 {
        match (boundary, self.clamp_coordinate(boundary)) {
            (Boundary::Left | Boundary::Right, Some(x)) => Vec2::new(x, position.y),
            (Boundary::Top | Boundary::Bottom, Some(y)) => Vec2::new(position.x, y),
            _ => position,
        }
    }
}
