//! Scene: the trees scattered around the spawn point and the ground they stand on.
//!
//! # Invariants
//! - Placements are generated once and never mutated afterwards.
//! - The scene owns its placements; the generator keeps nothing.

pub mod scene;

pub use scene::{Scene, SceneError};
