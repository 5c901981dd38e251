//! Mirror image geometry
//!
//! Time independent: everything here is recomputed from object positions
//! whenever they move.

pub mod images;
pub mod scene;

pub use images::{
    ImageSet, MirrorPair, MirrorSide, VirtualImage, alternating_chain, fold_point, fold_points,
    image_position, image_positions, is_aligned, single_mirror_image, solve, solve_to_order,
};
pub use scene::{Handle, KaleidoscopeScene, SCENE_RNG_STREAM, SceneFrame};
