use glam::{Mat4, Vec3};
use grove_common::CameraSettings;
use grove_input::{CameraControl, Movement};

/// Pitch is kept inside this many degrees of the horizon so the view basis never flips.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view reachable by zooming, in degrees.
pub const ZOOM_MIN: f32 = 1.0;
/// Widest field of view reachable by zooming, in degrees.
pub const ZOOM_MAX: f32 = 45.0;

/// Free-flying camera driven by keyboard steps and mouse-look offsets.
///
/// Yaw and pitch are in degrees. `front`, `right` and `up` are derived from
/// them after every orientation change and always form an orthonormal basis.
/// Yaw is left unbounded; the trigonometry wraps it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub sprint_multiplier: f32,
    zoom: f32,
    aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, -90.0, 0.0)
    }
}

impl FlyCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            sprint_multiplier: 2.0,
            zoom: ZOOM_MAX,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn from_settings(s: &CameraSettings) -> Self {
        let mut camera = Self::new(Vec3::from_array(s.position), s.yaw, s.pitch);
        camera.movement_speed = s.speed;
        camera.mouse_sensitivity = s.sensitivity;
        camera.sprint_multiplier = s.sprint_multiplier;
        camera.zoom = s.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        camera.near = s.near;
        camera.far = s.far;
        tracing::debug!(
            position = ?camera.position,
            yaw = camera.yaw,
            pitch = camera.pitch,
            fov = camera.zoom,
            "camera created"
        );
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Track the viewport size. A zero-height viewport (minimised window) is ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Move one step in `direction`, scaled by speed, sprint and frame time.
    pub fn process_keyboard(&mut self, direction: Movement, delta_time: f32, sprinting: bool) {
        let multiplier = if sprinting { self.sprint_multiplier } else { 1.0 };
        let velocity = self.movement_speed * multiplier * delta_time;
        let step = match direction {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right,
            Movement::Right => self.right,
            Movement::Up => self.world_up,
            Movement::Down => -self.world_up,
        };
        self.position += step * velocity;
    }

    /// Turn by pixel offsets. Positive `y_offset` looks up.
    pub fn process_mouse_look(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrow or widen the field of view. Positive `y_offset` zooms in.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl CameraControl for FlyCamera {
    fn process_keyboard(&mut self, direction: Movement, delta_time: f32, sprinting: bool) {
        FlyCamera::process_keyboard(self, direction, delta_time, sprinting);
    }

    fn process_mouse_look(&mut self, x_offset: f32, y_offset: f32) {
        FlyCamera::process_mouse_look(self, x_offset, y_offset);
    }

    fn process_scroll(&mut self, y_offset: f32) {
        FlyCamera::process_scroll(self, y_offset);
    }
}
