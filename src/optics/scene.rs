//! Interactive two-mirror scene
//!
//! Holds the draggable objects of the kaleidoscope demo and answers the
//! questions the input and render layers ask: what is under the pointer,
//! may it move there, and what should be drawn now.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::images::{self, ImageSet, MirrorPair};
use crate::error::GeometryError;
use crate::settings::Settings;
use crate::sim::{Detector, Emitter, Room, Target, Thing};

/// RNG stream for scene placement, apart from the photon launch stream
pub const SCENE_RNG_STREAM: u64 = 1;

/// Something the pointer can pick up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    Detector,
    Emitter,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    /// Emitter images with their folded sight lines
    pub emitter_images: ImageSet,
    /// Where the target's reflections sit
    pub target_images: Vec<Vec2>,
    /// True once the emitter is lined up with the target
    pub aligned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KaleidoscopeScene {
    pub room: Room,
    pub mirrors: MirrorPair,
    pub emitter: Emitter,
    pub target: Target,
    pub detector: Detector,
    /// Highest reflection order to compute
    pub max_order: usize,
}

impl KaleidoscopeScene {
    pub fn new(room: Room, emitter: Emitter, target: Target, detector: Detector) -> Self {
        Self {
            mirrors: MirrorPair::from_room(&room),
            room,
            emitter,
            target,
            detector,
            max_order: 2,
        }
    }

    /// Scene with emitter and target dropped at random spots inside `room`
    ///
    /// The detector sits on the floor, just left of the canvas center line.
    pub fn randomized<R: Rng>(
        room: Room,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Self, GeometryError> {
        let mut random_spot = || {
            Vec2::new(
                rng.random_range(room.left()..room.right()),
                rng.random_range(room.top()..room.bottom()),
            )
        };
        let emitter = Thing::new(random_spot(), settings.object_radius)?;
        let target = Thing::new(random_spot(), settings.object_radius)?;
        let detector = Detector::new(
            Vec2::new(
                (settings.width - settings.wall_thickness) / 2.0,
                room.bottom() - settings.wall_thickness / 2.0,
            ),
            settings.detector_radius,
        )?;
        Ok(Self::new(room, emitter, target, detector))
    }

    /// What a press at `point` grabs; the detector wins over the emitter
    pub fn grab(&self, point: Vec2) -> Option<Handle> {
        if self.detector.is_detecting(point) {
            Some(Handle::Detector)
        } else if self.emitter.contains(point) {
            Some(Handle::Emitter)
        } else {
            None
        }
    }

    /// Move a grabbed object, refusing positions outside the room
    ///
    /// Returns whether the object moved.
    pub fn drag(&mut self, handle: Handle, point: Vec2) -> bool {
        if !self.room.contains(point) {
            return false;
        }
        match handle {
            Handle::Detector => self.detector.move_to(point),
            Handle::Emitter => self.emitter.move_to(point),
        }
        true
    }

    pub fn is_aligned(&self) -> bool {
        images::is_aligned(&self.emitter, &self.target)
    }

    /// Recompute images for the current object positions
    pub fn frame(&self) -> Result<SceneFrame, GeometryError> {
        let observer = self.detector.position;
        Ok(SceneFrame {
            emitter_images: images::solve_to_order(
                self.emitter.position,
                &self.mirrors,
                observer,
                self.max_order,
            )?,
            target_images: images::image_positions(
                self.target.position,
                &self.mirrors,
                self.max_order,
            ),
            aligned: self.is_aligned(),
        })
    }
}
