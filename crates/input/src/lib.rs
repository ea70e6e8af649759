//! Desktop input polled once per frame and mapped to camera actions.
//!
//! # Invariants
//! - Window events are only recorded; the camera changes when the main loop polls.
//! - The first cursor sample after mouse look starts is a zero offset.
//! - Key bindings are data, keyed by `winit` key code names.

pub mod action;
pub mod bindings;
pub mod mouse;
pub mod state;

pub use action::{KeyAction, Movement};
pub use bindings::{BindingError, KeyBindings};
pub use mouse::MouseTracker;
pub use state::{CameraControl, FrameInput, InputState};

pub fn crate_info() -> &'static str {
    "grove-input v0.1.0"
}
