//! Rendering adapter: the fly camera and a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - The camera's basis is orthonormal after every mutation and pitch stays
//!   within ±89°, so the view matrix is always invertible.

mod camera;
mod renderer;

pub use camera::{FlyCamera, PITCH_LIMIT, ZOOM_MAX, ZOOM_MIN};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "grove-render v0.1.0"
}
