//! Virtual images in a pair of parallel vertical mirrors
//!
//! An image is built by mirroring the emitter across a chain of mirrors that
//! alternates sides. For mirrors at `x = L` and `x = R`:
//! - across the left mirror: `x' = 2L - x`
//! - across the right mirror: `x' = 2R - x`
//!
//! Images keep the emitter's `y`. To draw the light path that really reaches
//! the observer, the straight sight line to an image is folded back at each
//! mirror it crosses; those crossings are the fold points.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::mirror_x;
use crate::sim::{MirrorLine, Room, Target, Thing};

/// Which of the two parallel mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorSide {
    Left,
    Right,
}

impl MirrorSide {
    pub fn opposite(self) -> Self {
        match self {
            MirrorSide::Left => MirrorSide::Right,
            MirrorSide::Right => MirrorSide::Left,
        }
    }
}

/// Two parallel vertical mirrors, `left < right`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorPair {
    left: f32,
    right: f32,
}

impl MirrorPair {
    pub fn new(left: f32, right: f32) -> Result<Self, GeometryError> {
        if !left.is_finite() || !right.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if left >= right {
            return Err(GeometryError::DegenerateMirrors { left, right });
        }
        Ok(Self { left, right })
    }

    /// The side mirrors of a room (always well ordered)
    pub fn from_room(room: &Room) -> Self {
        Self {
            left: room.left(),
            right: room.right(),
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    /// x coordinate of one mirror
    pub fn x(&self, side: MirrorSide) -> f32 {
        match side {
            MirrorSide::Left => self.left,
            MirrorSide::Right => self.right,
        }
    }

    /// Mirror a point across one side
    pub fn reflect(&self, point: Vec2, side: MirrorSide) -> Vec2 {
        Vec2::new(mirror_x(point.x, self.x(side)), point.y)
    }
}

/// An apparent copy of the emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualImage {
    /// Where the image appears
    pub position: Vec2,
    /// Mirrors the light bounced off, emitter side first
    pub chain: Vec<MirrorSide>,
    /// Mirror crossings of the folded path, observer side first
    pub fold_points: Vec<Vec2>,
}

impl VirtualImage {
    /// Number of reflections that produced this image
    pub fn order(&self) -> usize {
        self.chain.len()
    }

    /// Polyline of the real light path: observer, fold points, emitter
    pub fn light_path(&self, observer: Vec2, emitter: Vec2) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.fold_points.len() + 2);
        points.push(observer);
        points.extend_from_slice(&self.fold_points);
        points.push(emitter);
        points
    }
}

/// Every image computed for one emitter/observer pair
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageSet {
    /// Sorted by order, then by last mirror (left first)
    pub images: Vec<VirtualImage>,
}

impl ImageSet {
    /// The image produced by exactly this chain, if it was computed
    pub fn get(&self, chain: &[MirrorSide]) -> Option<&VirtualImage> {
        self.images.iter().find(|image| image.chain == chain)
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.images.iter().map(|image| image.position).collect()
    }

    pub fn of_order(&self, order: usize) -> impl Iterator<Item = &VirtualImage> {
        self.images.iter().filter(move |image| image.order() == order)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// The alternating chain of `order` mirrors that ends at `last`
pub fn alternating_chain(order: usize, last: MirrorSide) -> Vec<MirrorSide> {
    let mut chain = Vec::with_capacity(order);
    let mut side = last;
    for _ in 0..order {
        chain.push(side);
        side = side.opposite();
    }
    chain.reverse();
    chain
}

/// Position of the image after reflecting through `chain` in order
pub fn image_position(emitter: Vec2, mirrors: &MirrorPair, chain: &[MirrorSide]) -> Vec2 {
    chain
        .iter()
        .fold(emitter, |point, &side| mirrors.reflect(point, side))
}

/// Where the sight line from `observer` toward `image` crosses `x = mirror_x`
///
/// By similar triangles:
/// `y = observer.y + (mirror_x - observer.x) * (image.y - observer.y) / (image.x - observer.x)`.
/// A sight line parallel to the mirror has no crossing and is reported.
pub fn fold_point(observer: Vec2, image: Vec2, mirror_x: f32) -> Result<Vec2, GeometryError> {
    let dx = image.x - observer.x;
    if dx == 0.0 {
        return Err(GeometryError::VerticalSightLine { x: observer.x });
    }
    let y = observer.y + (mirror_x - observer.x) * (image.y - observer.y) / dx;
    if !y.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    Ok(Vec2::new(mirror_x, y))
}

/// Fold points of the light path from `emitter` through `chain` to `observer`
///
/// Walks back from the observer. The last mirror in the chain is hit first on
/// the way back: aim at the final image, cross that mirror, then aim at the
/// previous image from the crossing, and so on.
pub fn fold_points(
    emitter: Vec2,
    mirrors: &MirrorPair,
    chain: &[MirrorSide],
    observer: Vec2,
) -> Result<Vec<Vec2>, GeometryError> {
    // images[k] is the emitter after the first k reflections
    let mut images = Vec::with_capacity(chain.len() + 1);
    images.push(emitter);
    for &side in chain {
        let previous = images[images.len() - 1];
        images.push(mirrors.reflect(previous, side));
    }

    let mut folds = Vec::with_capacity(chain.len());
    let mut from = observer;
    for (k, &side) in chain.iter().enumerate().rev() {
        let point = fold_point(from, images[k + 1], mirrors.x(side))?;
        folds.push(point);
        from = point;
    }
    Ok(folds)
}

/// Build one image with its folded path
pub fn virtual_image(
    emitter: Vec2,
    mirrors: &MirrorPair,
    chain: Vec<MirrorSide>,
    observer: Vec2,
) -> Result<VirtualImage, GeometryError> {
    let fold_points = fold_points(emitter, mirrors, &chain, observer)?;
    Ok(VirtualImage {
        position: image_position(emitter, mirrors, &chain),
        chain,
        fold_points,
    })
}

/// The four canonical kaleidoscope images
///
/// First order off each mirror, then each first-order image reflected by the
/// opposite mirror:
/// 1. `[Left]`: `2L - ex`
/// 2. `[Right]`: `2R - ex`
/// 3. `[Right, Left]`: `2L - (2R - ex)`
/// 4. `[Left, Right]`: `2R - (2L - ex)`
pub fn solve(
    emitter: Vec2,
    mirrors: &MirrorPair,
    observer: Vec2,
) -> Result<ImageSet, GeometryError> {
    solve_to_order(emitter, mirrors, observer, 2)
}

/// All alternating images up to `max_order` reflections, two per order
pub fn solve_to_order(
    emitter: Vec2,
    mirrors: &MirrorPair,
    observer: Vec2,
    max_order: usize,
) -> Result<ImageSet, GeometryError> {
    let mut images = Vec::with_capacity(max_order * 2);
    for order in 1..=max_order {
        for last in [MirrorSide::Left, MirrorSide::Right] {
            let chain = alternating_chain(order, last);
            images.push(virtual_image(emitter, mirrors, chain, observer)?);
        }
    }
    Ok(ImageSet { images })
}

/// Image positions only, for objects whose sight lines are not drawn
pub fn image_positions(emitter: Vec2, mirrors: &MirrorPair, max_order: usize) -> Vec<Vec2> {
    (1..=max_order)
        .flat_map(|order| {
            [MirrorSide::Left, MirrorSide::Right]
                .map(|last| image_position(emitter, mirrors, &alternating_chain(order, last)))
        })
        .collect()
}

/// Image of a point in a single, arbitrarily tilted mirror
pub fn single_mirror_image(emitter: Vec2, mirror: &MirrorLine) -> Vec2 {
    mirror.mirror_point(emitter)
}

/// The lining-up goal: the real emitter sits inside the target
///
/// A property of the real objects; the images only illustrate it.
pub fn is_aligned(emitter: &Thing, target: &Target) -> bool {
    target.contains(emitter.position)
}
