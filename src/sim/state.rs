//! Simulation state and value types
//!
//! The driver owns exactly one `Simulation`. Everything else here is a small
//! value type that `step` consumes and returns.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Boundary;
use super::room::Room;
use crate::error::{ConfigError, GeometryError};
use crate::is_finite_vec;
use crate::settings::ScenarioConfig;

/// The moving point
///
/// Keeps `|velocity| == speed`; only `step` produces new photons mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    position: Vec2,
    velocity: Vec2,
    speed: f32,
}

impl Photon {
    /// Photon at `position` heading along `direction` at `speed`
    ///
    /// `direction` only contributes its heading and must be non-zero.
    pub fn new(position: Vec2, direction: Vec2, speed: f32) -> Result<Self, GeometryError> {
        if !is_finite_vec(position) || !is_finite_vec(direction) {
            return Err(GeometryError::NonFinite);
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(GeometryError::NonPositiveSpeed(speed));
        }
        let direction = direction
            .try_normalize()
            .ok_or(GeometryError::ZeroDirection)?;
        Ok(Self {
            position,
            velocity: direction * speed,
            speed,
        })
    }

    /// Photon launched in a uniformly random direction
    pub fn launch<R: Rng>(position: Vec2, speed: f32, rng: &mut R) -> Result<Self, GeometryError> {
        let angle = rng.random_range(0.0..TAU);
        Self::new(position, Vec2::from_angle(angle), speed)
    }

    /// Used by `step` to hand back the next state
    pub(crate) fn with_motion(&self, position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            speed: self.speed,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }
}

/// Bounce points of one run, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Vec2>,
}

impl Path {
    /// Start a path at the photon's launch position
    pub fn new(start: Vec2) -> Self {
        Self {
            points: vec![start],
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true, a path always holds its start point
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Vec2 {
        self.points[0]
    }

    pub fn last(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    /// Line segments to draw, ending with the open segment to `current`
    pub fn segments_to(&self, current: Vec2) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(std::iter::once((self.last(), current)))
    }

    /// Total polyline length up to `current`
    pub fn length_to(&self, current: Vec2) -> f32 {
        self.segments_to(current).map(|(a, b)| a.distance(b)).sum()
    }
}

/// Circular sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub position: Vec2,
    radius: f32,
}

impl Detector {
    pub fn new(position: Vec2, radius: f32) -> Result<Self, GeometryError> {
        if !radius.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius));
        }
        Ok(Self { position, radius })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Inclusive: a point exactly `radius` away is detected
    pub fn is_detecting(&self, point: Vec2) -> bool {
        point.distance(self.position) <= self.radius
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }
}

/// A draggable round object (emitter or target)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    pub position: Vec2,
    radius: f32,
}

/// The object whose images are shown
pub type Emitter = Thing;
/// The object the emitter must be lined up with
pub type Target = Thing;

impl Thing {
    pub fn new(position: Vec2, radius: f32) -> Result<Self, GeometryError> {
        if !radius.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius));
        }
        Ok(Self { position, radius })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.position) <= self.radius
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepEvent {
    /// Moved without touching anything
    None,
    /// Bounced off a boundary, run continues
    Reflected(Boundary),
    /// Swallowed by an absorbing wall, run is over
    Absorbed(Boundary),
    /// Reached the detector, run is over. `boundary` is whatever the photon
    /// touched on the same step, if anything
    Detected { boundary: Option<Boundary> },
}

impl StepEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepEvent::Absorbed(_) | StepEvent::Detected { .. })
    }

    /// Boundary touched this step
    pub fn boundary(&self) -> Option<Boundary> {
        match *self {
            StepEvent::None => None,
            StepEvent::Reflected(b) | StepEvent::Absorbed(b) => Some(b),
            StepEvent::Detected { boundary } => boundary,
        }
    }

    /// True if the event adds a bounce point to the path
    pub fn records_point(&self) -> bool {
        self.boundary().is_some()
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Absorbed(Boundary),
    Detected,
    /// Hit the configured tick cap
    TickLimit,
}

/// Run lifecycle; `Terminated` is final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Running,
    Terminated(Termination),
}

/// RNG state wrapper for reproducible runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// Generator on its own stream, independent of `to_rng` for the same seed
    pub fn stream(&self, stream: u64) -> Pcg32 {
        Pcg32::new(self.seed, stream)
    }
}

/// Everything the frame driver holds between ticks
#[derive(Debug, Clone)]
pub struct Simulation {
    pub room: Room,
    pub photon: Photon,
    pub(crate) path: Path,
    pub detector: Option<Detector>,
    pub(crate) phase: SimPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Stop with `Termination::TickLimit` after this many ticks
    pub max_ticks: Option<u64>,
    /// Draw a new floor mirror tilt every time the top wall bounces
    pub retilt_on_top_bounce: bool,
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
}

impl Simulation {
    /// Start a run with an already-built photon
    pub fn new(room: Room, photon: Photon, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            path: Path::new(photon.position()),
            rng: rng_state.to_rng(),
            room,
            photon,
            detector: None,
            phase: SimPhase::Running,
            time_ticks: 0,
            max_ticks: None,
            retilt_on_top_bounce: false,
            rng_state,
        }
    }

    /// Start a run with a photon launched at a random angle from `start`
    pub fn launch(room: Room, start: Vec2, speed: f32, seed: u64) -> Result<Self, GeometryError> {
        let mut rng = RngState::new(seed).to_rng();
        let photon = Photon::launch(start, speed, &mut rng)?;
        let mut sim = Self::new(room, photon, seed);
        sim.rng = rng;
        Ok(sim)
    }

    /// Build a run from a validated scenario configuration
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let settings = &config.settings;
        let room = config.scenario.room(settings)?;

        let mut rng = RngState::new(config.seed).to_rng();
        let start = config.scenario.start_position(&room, &mut rng);
        let photon = Photon::launch(start, settings.speed, &mut rng)?;

        let mut sim = Self::new(room, photon, config.seed);
        sim.rng = rng;
        sim.max_ticks = config.max_ticks;
        sim.retilt_on_top_bounce = config.scenario.retilts_floor();
        if let Some(position) = config.scenario.detector_position(&sim.room) {
            sim.detector = Some(Detector::new(position, settings.detector_radius)?);
        }

        log::info!(
            "Simulation ready: scenario={}, seed={}, start={:?}, velocity={:?}",
            config.scenario.as_str(),
            config.seed,
            sim.photon.position(),
            sim.photon.velocity()
        );
        Ok(sim)
    }

    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Bounce points so far, start first
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    pub fn termination(&self) -> Option<Termination> {
        match self.phase {
            SimPhase::Running => None,
            SimPhase::Terminated(t) => Some(t),
        }
    }
}
