//! Scenario configuration
//!
//! Dimensions, radii and speed are plain configuration, each overridable per
//! scenario. Loaded from JSON with every field optional.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, GeometryError};
use crate::sim::{MirrorLine, Room, WallBehavior};

/// Which demo arrangement to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Scenario {
    /// Photon bouncing between two side mirrors until it hits the floor or
    /// the detector; the room sits between two panels of its reflections
    #[default]
    LightClock,
    /// Single panel with a tilted mirror on the floor that changes angle
    /// every time the photon bounces off the ceiling. Nothing absorbs, so a
    /// run only ends at the tick cap
    TiltedFloor,
    /// Narrow mirror box in the middle of the canvas, used for the image
    /// alignment game
    Kaleidoscope,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::LightClock => "LightClock",
            Scenario::TiltedFloor => "TiltedFloor",
            Scenario::Kaleidoscope => "Kaleidoscope",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "lightclock" | "clock" => Some(Scenario::LightClock),
            "tiltedfloor" | "tilted" => Some(Scenario::TiltedFloor),
            "kaleidoscope" => Some(Scenario::Kaleidoscope),
            _ => None,
        }
    }

    /// Build the cavity for this scenario
    pub fn room(&self, settings: &Settings) -> Result<Room, GeometryError> {
        let (w, h) = (settings.width, settings.height);
        let (t, r) = (settings.wall_thickness, settings.photon_radius);
        match self {
            Scenario::LightClock => Ok(Room::new(w, w * 2.0, 0.0, h, t, r)?
                .with_walls(WallBehavior::Bounce, WallBehavior::Absorb)),
            Scenario::TiltedFloor => {
                // The floor mirror is the real lower boundary; the bouncing
                // bottom wall only backs it up
                let room = Room::new(0.0, w, 0.0, h, t, r)?
                    .with_walls(WallBehavior::Bounce, WallBehavior::Bounce);
                let floor = MirrorLine::new(
                    Vec2::new(0.0, h - 150.0),
                    Vec2::new(w, room.floor_limit()),
                )?;
                Ok(room.with_floor_mirror(floor))
            }
            Scenario::Kaleidoscope => {
                Room::new(w * 2.0 / 5.0, w * 3.0 / 5.0, h / 4.0, h * 3.0 / 4.0, t, r)
            }
        }
    }

    /// Where the photon starts
    ///
    /// Centered on the ceiling for the bouncing demos, at a random spot inside
    /// the box for the kaleidoscope.
    pub fn start_position<R: Rng>(&self, room: &Room, rng: &mut R) -> Vec2 {
        match self {
            Scenario::LightClock | Scenario::TiltedFloor => Vec2::new(room.center().x, room.top()),
            Scenario::Kaleidoscope => Vec2::new(
                rng.random_range(room.left()..room.right()),
                rng.random_range(room.top()..room.bottom()),
            ),
        }
    }

    /// Detector resting on the floor, if the scenario has one
    pub fn detector_position(&self, room: &Room) -> Option<Vec2> {
        match self {
            Scenario::LightClock | Scenario::Kaleidoscope => Some(Vec2::new(
                room.center().x,
                room.bottom() - room.thickness() / 2.0,
            )),
            Scenario::TiltedFloor => None,
        }
    }

    /// True if the floor mirror is re-tilted on every ceiling bounce
    pub fn retilts_floor(&self) -> bool {
        *self == Scenario::TiltedFloor
    }
}

/// Geometry and speed knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canvas panel width
    pub width: f32,
    /// Canvas panel height
    pub height: f32,
    pub wall_thickness: f32,
    pub photon_radius: f32,
    pub detector_radius: f32,
    pub object_radius: f32,
    /// Distance travelled per tick ("C")
    pub speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            photon_radius: PHOTON_RADIUS,
            detector_radius: DETECTOR_RADIUS,
            object_radius: OBJECT_RADIUS,
            speed: C,
        }
    }
}

impl Settings {
    /// Reject non-positive dimensions, negative radii and bad speeds
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        for (name, value) in [
            ("wall_thickness", self.wall_thickness),
            ("photon_radius", self.photon_radius),
            ("detector_radius", self.detector_radius),
            ("object_radius", self.object_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeRadius { name, value });
            }
        }

        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }

        if self.speed > self.photon_radius {
            log::warn!(
                "speed {} exceeds photon radius {}, photons may tunnel through walls",
                self.speed,
                self.photon_radius
            );
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// One runnable scenario: what to build, with which knobs and seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub scenario: Scenario,
    pub settings: Settings,
    /// Seed for launch direction and random placements
    pub seed: u64,
    /// Tick cap for headless runs (`None` runs until termination)
    pub max_ticks: Option<u64>,
}

/// Default tick cap: a photon stuck between the side mirrors never ends
pub const DEFAULT_MAX_TICKS: u64 = 100_000;

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            settings: Settings::default(),
            seed: 0,
            max_ticks: Some(DEFAULT_MAX_TICKS),
        }
    }
}

impl ScenarioConfig {
    /// Default config for a preset
    pub fn from_preset(scenario: Scenario) -> Self {
        Self {
            scenario,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a scenario file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded scenario {} from {}",
            config.scenario.as_str(),
            path.display()
        );
        Ok(config)
    }
}
