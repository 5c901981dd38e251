//! Reflection laws and mirror geometry
//!
//! Side walls are axis-aligned, so a bounce off them is the special case of
//! v' = v - 2(v·n)n where one velocity component is simply negated. The
//! tilted floor mirror needs the general law.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::{is_finite_vec, reflect_about_line};

/// A cavity boundary the photon can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    /// Left side mirror
    Left,
    /// Right side mirror
    Right,
    /// Top wall
    Top,
    /// Bottom wall
    Bottom,
    /// Tilted mirror line resting on the floor
    FloorMirror,
}

impl Boundary {
    /// True for the vertical side mirrors
    pub fn is_side_mirror(&self) -> bool {
        matches!(self, Boundary::Left | Boundary::Right)
    }

    /// True for the horizontal top/bottom walls
    pub fn is_horizontal_wall(&self) -> bool {
        matches!(self, Boundary::Top | Boundary::Bottom)
    }

    /// Unit normal pointing back into the cavity (screen coordinates, y down)
    ///
    /// The floor mirror has no fixed normal; ask the `MirrorLine` instead.
    pub fn inward_normal(&self) -> Option<Vec2> {
        match self {
            Boundary::Left => Some(Vec2::X),
            Boundary::Right => Some(Vec2::NEG_X),
            Boundary::Top => Some(Vec2::Y),
            Boundary::Bottom => Some(Vec2::NEG_Y),
            Boundary::FloorMirror => None,
        }
    }
}

/// A straight mirror through two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorLine {
    pub start: Vec2,
    pub end: Vec2,
}

impl MirrorLine {
    pub fn new(start: Vec2, end: Vec2) -> Result<Self, GeometryError> {
        if !is_finite_vec(start) || !is_finite_vec(end) {
            return Err(GeometryError::NonFinite);
        }
        if (end - start).length_squared() < f32::EPSILON {
            return Err(GeometryError::DegenerateMirrorLine);
        }
        Ok(Self { start, end })
    }

    /// Unit direction from `start` to `end`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Unit normal, the direction rotated a quarter turn
    ///
    /// For a floor line drawn left to right this points down, away from the cavity.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        let d = self.direction();
        Vec2::new(-d.y, d.x)
    }

    /// Signed offset of the line along its normal
    #[inline]
    pub fn intercept(&self) -> f32 {
        self.start.dot(self.normal())
    }

    /// True if the point lies strictly on the far side of the line
    #[inline]
    pub fn has_crossed(&self, point: Vec2) -> bool {
        self.normal().dot(point) > self.intercept()
    }

    /// Drop a point perpendicularly onto the line
    pub fn project(&self, point: Vec2) -> Vec2 {
        let n = self.normal();
        point - n * (n.dot(point) - self.intercept())
    }

    /// Mirror a point across this line
    pub fn mirror_point(&self, point: Vec2) -> Vec2 {
        self.start + reflect_about_line(self.direction(), point - self.start)
    }
}

/// Negate the velocity component belonging to an axis-aligned wall
#[inline]
pub fn reflect_axis_aligned(velocity: Vec2, boundary: Boundary) -> Vec2 {
    match boundary {
        Boundary::Left | Boundary::Right => Vec2::new(-velocity.x, velocity.y),
        Boundary::Top | Boundary::Bottom => Vec2::new(velocity.x, -velocity.y),
        Boundary::FloorMirror => velocity,
    }
}

/// Reflect off a line with unit normal `normal`, keeping magnitude `speed`
///
/// Works on the reversed incoming direction: r = 2(i·n)n - i with
/// i = normalize(-v), then scales back up to the photon speed.
pub fn reflect_off_line(velocity: Vec2, normal: Vec2, speed: f32) -> Vec2 {
    let incidence = (-velocity).normalize_or_zero();
    let dot = incidence.dot(normal);
    (2.0 * dot * normal - incidence) * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EPSILON;
    use crate::reflect_about_normal;

    #[test]
    fn test_reflect_axis_aligned_negates_one_component() {
        let v = Vec2::new(2.0, -1.5);
        assert_eq!(reflect_axis_aligned(v, Boundary::Left), Vec2::new(-2.0, -1.5));
        assert_eq!(reflect_axis_aligned(v, Boundary::Bottom), Vec2::new(2.0, 1.5));
    }

    #[test]
    fn test_axis_aligned_matches_general_law() {
        let v = Vec2::new(1.25, 3.0);
        for boundary in [Boundary::Left, Boundary::Right, Boundary::Top, Boundary::Bottom] {
            let n = boundary.inward_normal().unwrap();
            let general = reflect_about_normal(v, n);
            assert!(general.abs_diff_eq(reflect_axis_aligned(v, boundary), EPSILON));
        }
    }

    #[test]
    fn test_flat_floor_normal_points_down() {
        let line = MirrorLine::new(Vec2::new(0.0, 300.0), Vec2::new(400.0, 300.0)).unwrap();
        assert!(line.normal().abs_diff_eq(Vec2::Y, EPSILON));
        assert!((line.intercept() - 300.0).abs() < EPSILON);
        assert!(line.has_crossed(Vec2::new(10.0, 301.0)));
        assert!(!line.has_crossed(Vec2::new(10.0, 299.0)));
    }

    #[test]
    fn test_reflect_off_flat_floor_bounces_up() {
        let reflected = reflect_off_line(Vec2::new(0.0, 3.5), Vec2::Y, 3.5);
        assert!(reflected.abs_diff_eq(Vec2::new(0.0, -3.5), EPSILON));
    }

    #[test]
    fn test_reflect_off_tilted_line_keeps_speed() {
        let line = MirrorLine::new(Vec2::new(0.0, 250.0), Vec2::new(400.0, 400.0)).unwrap();
        let v = Vec2::new(1.0, 3.0).normalize() * 3.5;
        let reflected = reflect_off_line(v, line.normal(), 3.5);
        assert!((reflected.length() - 3.5).abs() < EPSILON);
        // Now heading back to the near side of the line
        assert!(reflected.dot(line.normal()) < 0.0);
    }

    #[test]
    fn test_project_and_mirror_point() {
        let line = MirrorLine::new(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0)).unwrap();
        assert!(line.project(Vec2::new(30.0, 120.0)).abs_diff_eq(Vec2::new(30.0, 100.0), EPSILON));
        assert!(line.mirror_point(Vec2::new(30.0, 120.0)).abs_diff_eq(Vec2::new(30.0, 80.0), EPSILON));
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(MirrorLine::new(p, p), Err(GeometryError::DegenerateMirrorLine));
        assert_eq!(
            MirrorLine::new(p, Vec2::new(f32::NAN, 0.0)),
            Err(GeometryError::NonFinite)
        );
    }
}
