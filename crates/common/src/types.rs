use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A point on the ground plane where one instance of a repeated model is placed.
///
/// Produced once by the scatter generator and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PlacementPoint {
    /// A point on the ground plane (y = 0).
    pub fn on_ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance from the world origin.
    pub fn distance_from_origin(&self) -> f32 {
        self.position().length()
    }
}

impl From<PlacementPoint> for Vec3 {
    fn from(p: PlacementPoint) -> Self {
        p.position()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Model matrix composed as translate, then scale, then rotate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_scale(self.scale)
            * Mat4::from_quat(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_point_lies_on_ground() {
        let p = PlacementPoint::on_ground(3.0, 4.0);
        assert_eq!(p.y, 0.0);
        assert!((p.distance_from_origin() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_translates_last() {
        let t = Transform {
            position: Vec3::new(5.0, 0.0, -2.0),
            rotation: Quat::from_rotation_y(90.0_f32.to_radians()),
            scale: Vec3::splat(2.0),
        };
        let origin = t.model_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - t.position).length() < 1e-5);

        // +X rotates to -Z, then doubles, then moves.
        let x = t.model_matrix().transform_point3(Vec3::X);
        assert!((x - Vec3::new(5.0, 0.0, -4.0)).length() < 1e-5);
    }
}
