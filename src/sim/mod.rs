//! Photon simulation module
//!
//! A photon bounces inside a cavity whose side walls are mirrors. This module
//! must stay pure and deterministic:
//! - One fixed step per tick, no sub-stepping
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod room;
pub mod state;
pub mod tick;

pub use collision::{Boundary, MirrorLine, reflect_axis_aligned, reflect_off_line};
pub use room::{Crossings, FLOOR_TILT_BAND, Room, WallBehavior};
pub use state::{
    Detector, Emitter, Path, Photon, RngState, SimPhase, Simulation, StepEvent, Target,
    Termination, Thing,
};
pub use tick::{run_to_end, step, tick};
