use glam::{DVec2, Vec2};
use std::collections::BTreeSet;

use crate::action::{KeyAction, Movement};
use crate::bindings::KeyBindings;
use crate::mouse::MouseTracker;

/// Receiver of per-frame input. Implemented by the fly camera.
pub trait CameraControl {
    fn process_keyboard(&mut self, direction: Movement, delta_time: f32, sprinting: bool);
    fn process_mouse_look(&mut self, x_offset: f32, y_offset: f32);
    fn process_scroll(&mut self, y_offset: f32);
}

/// Everything that happened since the previous poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// One entry per held movement key, in [`Movement::ALL`] order.
    pub movements: Vec<Movement>,
    pub sprinting: bool,
    /// Accumulated look offset in pixels, Y already inverted.
    pub look: Vec2,
    pub scroll: f32,
    /// Trigger actions pressed since the last poll, in press order.
    pub triggers: Vec<KeyAction>,
}

impl FrameInput {
    /// Feed this frame's input to `camera`.
    ///
    /// Each held direction is applied separately, so diagonal movement adds
    /// up rather than being normalised.
    pub fn apply<C: CameraControl + ?Sized>(&self, camera: &mut C, delta_time: f32) {
        for &direction in &self.movements {
            camera.process_keyboard(direction, delta_time, self.sprinting);
        }
        if self.look != Vec2::ZERO {
            camera.process_mouse_look(self.look.x, self.look.y);
        }
        if self.scroll != 0.0 {
            camera.process_scroll(self.scroll);
        }
    }
}

/// Input collected between frames, polled once per frame by the main loop.
///
/// Window events are recorded as they arrive; nothing reaches the camera
/// until [`poll`](Self::poll) is called.
#[derive(Debug, Clone)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<String>,
    triggers: Vec<KeyAction>,
    /// Baseline for absolute window cursor positions.
    cursor: MouseTracker,
    /// Baseline for the unbounded position accumulated from raw device motion.
    motion: MouseTracker,
    look_active: bool,
    virtual_cursor: DVec2,
    look: Vec2,
    scroll: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
            triggers: Vec::new(),
            cursor: MouseTracker::new(),
            motion: MouseTracker::new(),
            look_active: false,
            virtual_cursor: DVec2::ZERO,
            look: Vec2::ZERO,
            scroll: 0.0,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn key_pressed(&mut self, key: &str) {
        // Auto-repeat sends presses for keys already held.
        if !self.held.insert(key.to_owned()) {
            return;
        }
        if let Some(action) = self.bindings.lookup(key) {
            if action.is_trigger() {
                self.triggers.push(action);
            }
        }
    }

    pub fn key_released(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Drop all held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn look_active(&self) -> bool {
        self.look_active
    }

    /// Start or stop mouse look. Starting re-baselines the cursor.
    pub fn set_look_active(&mut self, active: bool) {
        if active && !self.look_active {
            self.cursor.reset();
            self.motion.reset();
        }
        if !active {
            self.look = Vec2::ZERO;
        }
        self.look_active = active;
    }

    /// Absolute cursor position in window pixels.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if self.look_active {
            self.look += self.cursor.sample(x, y);
        }
    }

    /// Raw pointer motion, for when the cursor is locked and stops reporting positions.
    /// Tracked apart from [`cursor_moved`](Self::cursor_moved) since the two use
    /// different origins.
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.virtual_cursor += DVec2::new(dx, dy);
        if self.look_active {
            let DVec2 { x, y } = self.virtual_cursor;
            self.look += self.motion.sample(x, y);
        }
    }

    /// Scroll wheel movement in lines; positive is away from the user.
    pub fn scrolled(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Collect this frame's input and clear the per-frame accumulators.
    /// Held keys stay held.
    pub fn poll(&mut self) -> FrameInput {
        let held_actions: Vec<KeyAction> = self
            .held
            .iter()
            .filter_map(|k| self.bindings.lookup(k))
            .collect();

        let movements = Movement::ALL
            .into_iter()
            .filter(|m| held_actions.iter().any(|a| a.movement() == Some(*m)))
            .collect();
        let sprinting = held_actions.contains(&KeyAction::Sprint);

        let frame = FrameInput {
            movements,
            sprinting,
            look: std::mem::take(&mut self.look),
            scroll: std::mem::take(&mut self.scroll),
            triggers: std::mem::take(&mut self.triggers),
        };
        tracing::trace!(?frame, "input polled");
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        moves: Vec<(Movement, f32, bool)>,
        looks: Vec<(f32, f32)>,
        scrolls: Vec<f32>,
    }

    impl CameraControl for Recorder {
        fn process_keyboard(&mut self, direction: Movement, delta_time: f32, sprinting: bool) {
            self.moves.push((direction, delta_time, sprinting));
        }
        fn process_mouse_look(&mut self, x_offset: f32, y_offset: f32) {
            self.looks.push((x_offset, y_offset));
        }
        fn process_scroll(&mut self, y_offset: f32) {
            self.scrolls.push(y_offset);
        }
    }

    #[test]
    fn held_keys_move_every_frame() {
        let mut input = InputState::default();
        input.key_pressed("KeyW");
        input.key_pressed("KeyD");

        let first = input.poll();
        assert_eq!(first.movements, vec![Movement::Forward, Movement::Right]);
        let second = input.poll();
        assert_eq!(second.movements, first.movements);

        input.key_released("KeyW");
        assert_eq!(input.poll().movements, vec![Movement::Right]);
    }

    #[test]
    fn sprint_flag_follows_shift() {
        let mut input = InputState::default();
        input.key_pressed("KeyW");
        assert!(!input.poll().sprinting);
        input.key_pressed("ShiftLeft");
        assert!(input.poll().sprinting);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputState::default();
        input.key_pressed("KeyZ");
        assert_eq!(input.poll(), FrameInput::default());
    }

    #[test]
    fn triggers_fire_once_per_press() {
        let mut input = InputState::default();
        input.key_pressed("F1");
        input.key_pressed("F1"); // auto-repeat
        assert_eq!(input.poll().triggers, vec![KeyAction::ToggleOverlay]);
        assert!(input.poll().triggers.is_empty());

        input.key_released("F1");
        input.key_pressed("F1");
        assert_eq!(input.poll().triggers, vec![KeyAction::ToggleOverlay]);
    }

    #[test]
    fn look_requires_activation_and_skips_first_sample() {
        let mut input = InputState::default();
        input.cursor_moved(10.0, 10.0);
        assert_eq!(input.poll().look, Vec2::ZERO);

        input.set_look_active(true);
        input.cursor_moved(500.0, 300.0);
        assert_eq!(input.poll().look, Vec2::ZERO);

        input.cursor_moved(510.0, 290.0);
        input.cursor_moved(515.0, 295.0);
        assert_eq!(input.poll().look, Vec2::new(15.0, 5.0));
    }

    #[test]
    fn reactivation_rebaselines() {
        let mut input = InputState::default();
        input.set_look_active(true);
        input.cursor_moved(0.0, 0.0);
        input.set_look_active(false);
        input.set_look_active(true);
        input.cursor_moved(800.0, 800.0);
        assert_eq!(input.poll().look, Vec2::ZERO);
    }

    #[test]
    fn raw_motion_drives_virtual_cursor() {
        let mut input = InputState::default();
        input.set_look_active(true);
        input.mouse_motion(3.0, 4.0);
        input.mouse_motion(2.0, 1.0);
        input.mouse_motion(-1.0, 2.0);
        // First motion is the baseline, then (2,1) and (-1,2) with Y inverted.
        assert_eq!(input.poll().look, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn cursor_and_raw_motion_keep_separate_baselines() {
        let mut input = InputState::default();
        input.set_look_active(true);
        input.cursor_moved(500.0, 300.0);
        input.mouse_motion(3.0, 4.0);
        input.cursor_moved(503.0, 304.0);
        input.mouse_motion(2.0, 1.0);
        // Each path skips its own first sample; no jump between window and device origins.
        assert_eq!(input.poll().look, Vec2::new(5.0, -5.0));
    }

    #[test]
    fn apply_feeds_each_direction_separately() {
        let mut input = InputState::default();
        input.key_pressed("KeyW");
        input.key_pressed("KeyA");
        input.key_pressed("ShiftLeft");
        input.set_look_active(true);
        input.cursor_moved(0.0, 0.0);
        input.cursor_moved(4.0, 0.0);
        input.scrolled(1.5);

        let mut rec = Recorder::default();
        input.poll().apply(&mut rec, 0.5);
        assert_eq!(
            rec.moves,
            vec![(Movement::Forward, 0.5, true), (Movement::Left, 0.5, true)]
        );
        assert_eq!(rec.looks, vec![(4.0, 0.0)]);
        assert_eq!(rec.scrolls, vec![1.5]);
    }

    #[test]
    fn idle_frame_applies_nothing() {
        let mut rec = Recorder::default();
        FrameInput::default().apply(&mut rec, 0.016);
        assert!(rec.moves.is_empty() && rec.looks.is_empty() && rec.scrolls.is_empty());
    }
}
