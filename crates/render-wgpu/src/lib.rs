//! wgpu render backend for the grove scene.
//!
//! Draws a gradient sky, a checkered ground plane and one instanced draw of
//! procedural trees. Meshes are generated in code in place of imported models
//! and textures.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Tree instances are uploaded once; only the camera uniforms change per frame.

mod gpu;
pub mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
