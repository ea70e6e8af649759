use glam::{DVec2, Vec2};

/// Turns absolute cursor positions into frame-to-frame look offsets.
///
/// The first sample after construction or [`reset`](Self::reset) only sets
/// the baseline, so activating mouse look never snaps the view. The vertical
/// offset is inverted: screen Y grows downward, world up is +Y.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<DVec2>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last position; the next sample becomes the new baseline.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Record a cursor position in pixels and return the look offset since the previous one.
    pub fn sample(&mut self, x: f64, y: f64) -> Vec2 {
        let current = DVec2::new(x, y);
        match self.last.replace(current) {
            Some(last) => Vec2::new((current.x - last.x) as f32, (last.y - current.y) as f32),
            None => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_baseline() {
        let mut m = MouseTracker::new();
        assert_eq!(m.sample(640.0, 360.0), Vec2::ZERO);
        assert_eq!(m.sample(641.0, 360.0), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn vertical_offset_is_inverted() {
        let mut m = MouseTracker::new();
        m.sample(100.0, 100.0);
        // Cursor moves right and down on screen.
        assert_eq!(m.sample(110.0, 130.0), Vec2::new(10.0, -30.0));
        // Then left and up.
        assert_eq!(m.sample(105.0, 120.0), Vec2::new(-5.0, 10.0));
    }

    #[test]
    fn reset_prevents_snap() {
        let mut m = MouseTracker::new();
        m.sample(0.0, 0.0);
        m.reset();
        assert_eq!(m.sample(900.0, 500.0), Vec2::ZERO);
        assert_eq!(m.sample(901.0, 500.0), Vec2::new(1.0, 0.0));
    }
}
