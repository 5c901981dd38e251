//! Mirror Room - a photon light clock and a two-mirror kaleidoscope
//!
//! Core modules:
//! - `sim`: Fixed-step photon simulation (room boundaries, reflection, path, detector)
//! - `optics`: Virtual images in parallel mirrors and the folded sight lines
//! - `settings`: Scenario configuration and presets
//! - `error`: Error types shared by the modules above

pub mod error;
pub mod optics;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GeometryError, SimError};
pub use settings::{Scenario, ScenarioConfig, Settings};

use glam::Vec2;

/// Default configuration constants
pub mod consts {
    /// Canvas dimensions of a single demo panel
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// The speed of light, for our purposes (pixels per tick)
    pub const C: f32 = 3.5;

    pub const PHOTON_RADIUS: f32 = 6.0;
    pub const DETECTOR_RADIUS: f32 = 20.0;
    /// Radius of draggable emitter/target objects
    pub const OBJECT_RADIUS: f32 = 12.0;
    pub const WALL_THICKNESS: f32 = 6.0;

    /// Tolerance used when comparing floating point geometry
    pub const EPSILON: f32 = 1e-4;
}

/// Reflect a vector about a unit surface normal
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_about_normal(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Reflect a point about a line through the origin with unit direction `line`
///
/// Equivalent to keeping the in-line component and negating the perpendicular one.
#[inline]
pub fn reflect_about_line(line: Vec2, point: Vec2) -> Vec2 {
    2.0 * point.dot(line) * line - point
}

/// Mirror an x coordinate across the vertical line `x = mirror_x`
#[inline]
pub fn mirror_x(x: f32, mirror_x: f32) -> f32 {
    2.0 * mirror_x - x
}

/// True if every component of the vector is finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_about_normal_vertical_wall() {
        // Moving right, hits a wall whose normal points left
        let v = Vec2::new(3.0, 1.0);
        let r = reflect_about_normal(v, Vec2::NEG_X);
        assert!((r.x + 3.0).abs() < consts::EPSILON);
        assert!((r.y - 1.0).abs() < consts::EPSILON);
    }

    #[test]
    fn test_reflect_about_line_diagonal() {
        let line = Vec2::new(1.0, 1.0).normalize();
        let r = reflect_about_line(line, Vec2::new(1.0, 0.0));
        assert!(r.abs_diff_eq(Vec2::new(0.0, 1.0), consts::EPSILON));
    }

    #[test]
    fn test_mirror_x_twice_is_identity() {
        assert_eq!(mirror_x(mirror_x(37.5, 300.0), 300.0), 37.5);
    }
}
