//! YAML configuration for the demo.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `scatter.count` is valid and everything else keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroveConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub scatter: ScatterSettings,
    pub scene: SceneLayout,
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Grove".into(),
            vsync: true,
        }
    }
}

/// Initial camera state and control tuning. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view.
    pub zoom: f32,
    pub sprint_multiplier: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 2.5,
            sensitivity: 0.1,
            zoom: 45.0,
            sprint_multiplier: 2.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

/// Parameters for scattering trees around the spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSettings {
    pub count: usize,
    pub exclusion_radius: f32,
    pub max_spawn_radius: f32,
    /// Accepted for forward compatibility; does not bias placement.
    pub density_increase_end_radius: Option<f32>,
    /// Fixed seed for reproducible layouts. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Rejection budget per point.
    pub max_attempts: u32,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            count: 150,
            exclusion_radius: 8.0,
            max_spawn_radius: 60.0,
            density_increase_end_radius: Some(30.0),
            seed: None,
            max_attempts: 10_000,
        }
    }
}

/// Static layout of the scene around the scattered trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub tree_scale: f32,
    /// Yaw applied to every tree so the model faces the right way.
    pub tree_yaw_degrees: f32,
    pub ground_half_extent: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            tree_scale: 1.0,
            tree_yaw_degrees: 90.0,
            ground_half_extent: 80.0,
        }
    }
}

impl GroveConfig {
    /// Load configuration from a YAML file. Missing fields use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Write configuration as YAML, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
