use serde::{Deserialize, Serialize};

/// Direction of a discrete camera movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    /// All directions, in the order they are applied each frame.
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];
}

/// What a bound key does.
///
/// Movement and sprint act while the key is held; the rest fire once per press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Sprint,
    /// Give the cursor back to the desktop.
    ReleaseCursor,
    /// Show or hide the info overlay.
    ToggleOverlay,
}

impl KeyAction {
    pub fn movement(self) -> Option<Movement> {
        match self {
            Self::MoveForward => Some(Movement::Forward),
            Self::MoveBackward => Some(Movement::Backward),
            Self::MoveLeft => Some(Movement::Left),
            Self::MoveRight => Some(Movement::Right),
            Self::MoveUp => Some(Movement::Up),
            Self::MoveDown => Some(Movement::Down),
            _ => None,
        }
    }

    /// Whether the action fires once on press rather than acting while held.
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::ReleaseCursor | Self::ToggleOverlay)
    }
}
