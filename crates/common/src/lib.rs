//! Shared types and configuration for the grove workspace.

pub mod config;
mod types;

pub use config::{
    CameraSettings, ConfigError, GroveConfig, ScatterSettings, SceneLayout, WindowSettings,
};
pub use types::{PlacementPoint, Transform};
