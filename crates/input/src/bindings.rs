use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::action::KeyAction;

/// Errors from loading key bindings.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Maps physical key strings to [`KeyAction`]s.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyW"`, `"ShiftLeft"`, `"Escape"`, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: BTreeMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = BTreeMap::from([
            ("KeyW".into(), KeyAction::MoveForward),
            ("KeyS".into(), KeyAction::MoveBackward),
            ("KeyA".into(), KeyAction::MoveLeft),
            ("KeyD".into(), KeyAction::MoveRight),
            ("KeyQ".into(), KeyAction::MoveUp),
            ("KeyE".into(), KeyAction::MoveDown),
            ("ShiftLeft".into(), KeyAction::Sprint),
            ("Escape".into(), KeyAction::ReleaseCursor),
            ("F1".into(), KeyAction::ToggleOverlay),
        ]);
        Self { bindings }
    }
}

/// The `keybindings` section of the config file; other sections are ignored.
#[derive(Deserialize)]
struct ConfigSection {
    #[serde(default)]
    keybindings: Option<KeyBindings>,
}

impl KeyBindings {
    /// Look up the action for a physical key string.
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, action: KeyAction) {
        self.bindings.insert(key.into(), action);
    }

    /// Keys bound to `action`, in sorted order.
    pub fn keys_for(&self, action: KeyAction) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
    }

    /// Read the `keybindings` section of a YAML config document.
    /// A document without one yields the defaults.
    pub fn from_config_yaml(content: &str) -> Result<Self, BindingError> {
        let section: ConfigSection = serde_yaml::from_str(content)?;
        Ok(section.keybindings.unwrap_or_default())
    }

    /// Load the `keybindings` section of a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BindingError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_config_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookup() {
        let b = KeyBindings::default();
        assert_eq!(b.lookup("KeyW"), Some(KeyAction::MoveForward));
        assert_eq!(b.lookup("KeyQ"), Some(KeyAction::MoveUp));
        assert_eq!(b.lookup("ShiftLeft"), Some(KeyAction::Sprint));
        assert_eq!(b.lookup("KeyZ"), None);
    }

    #[test]
    fn section_replaces_defaults() {
        let b = KeyBindings::from_config_yaml(
            r"
scatter:
  count: 3
keybindings:
  ArrowUp: move_forward
  Space: move_up
",
        )
        .unwrap();
        assert_eq!(b.lookup("ArrowUp"), Some(KeyAction::MoveForward));
        assert_eq!(b.lookup("Space"), Some(KeyAction::MoveUp));
        assert_eq!(b.lookup("KeyW"), None);
    }

    #[test]
    fn missing_section_yields_defaults() {
        let b = KeyBindings::from_config_yaml("camera:\n  speed: 4.0\n").unwrap();
        assert_eq!(b, KeyBindings::default());
    }

    #[test]
    fn unknown_action_is_an_error() {
        let err = KeyBindings::from_config_yaml("keybindings:\n  KeyW: teleport\n").unwrap_err();
        assert!(matches!(err, BindingError::Yaml(_)));
    }

    #[test]
    fn keys_for_action() {
        let mut b = KeyBindings::default();
        b.bind("ArrowUp", KeyAction::MoveForward);
        let keys: Vec<&str> = b.keys_for(KeyAction::MoveForward).collect();
        assert_eq!(keys, vec!["ArrowUp", "KeyW"]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove.yaml");
        std::fs::write(&path, "keybindings:\n  KeyI: move_forward\n").unwrap();
        let b = KeyBindings::load(&path).unwrap();
        assert_eq!(b.lookup("KeyI"), Some(KeyAction::MoveForward));
    }
}
