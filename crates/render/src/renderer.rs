use glam::{Mat4, Vec3};
use grove_scene::Scene;
use std::fmt::Write;

use crate::camera::FlyCamera;

/// Per-frame camera matrices handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub front: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl RenderView {
    pub fn from_camera(camera: &FlyCamera) -> Self {
        Self {
            eye: camera.position,
            front: camera.front(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            zoom: camera.zoom(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Whether a world-space point falls inside the view frustum.
    pub fn is_visible(&self, point: Vec3) -> bool {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return false;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z)
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&FlyCamera::default())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs: a readable summary of the frame.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List at most this many trees; `None` lists all of them.
    pub max_trees: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_trees(max_trees: usize) -> Self {
        Self {
            max_trees: Some(max_trees),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let visible = scene
            .placements()
            .filter(|p| view.is_visible(p.position()))
            .count();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (seed={}, trees={}, visible={}) ===",
            scene.seed(),
            scene.tree_count(),
            visible
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) front=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.front.x, view.front.y, view.front.z, view.zoom
        );

        let limit = self.max_trees.unwrap_or(usize::MAX);
        for (i, p) in scene.placements().enumerate().take(limit) {
            let _ = writeln!(
                out,
                "  [{i:>4}] pos=({:.2}, {:.2}) dist={:.2}{}",
                p.x,
                p.z,
                p.distance_from_origin(),
                if view.is_visible(p.position()) { " *" } else { "" }
            );
        }
        if scene.tree_count() > limit {
            let _ = writeln!(out, "  ... {} more", scene.tree_count() - limit);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_common::{PlacementPoint, SceneLayout};
    use grove_scatter::ScatterConstraints;

    fn scene_with(points: Vec<PlacementPoint>) -> Scene {
        let n = points.len();
        Scene::from_placements(
            points,
            ScatterConstraints::new(n, 1.0, 50.0),
            &SceneLayout::default(),
            5,
        )
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&scene_with(vec![]), &RenderView::default());
        assert!(output.contains("trees=0"));
        assert!(output.contains("visible=0"));
        assert!(output.contains("fov=45"));
    }

    #[test]
    fn debug_renderer_marks_visible_trees() {
        // Default camera looks down -Z from the origin.
        let scene = scene_with(vec![
            PlacementPoint::on_ground(0.0, -10.0),
            PlacementPoint::on_ground(0.0, 10.0),
        ]);
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("trees=2, visible=1"));
        assert!(output.contains("pos=(0.00, -10.00) dist=10.00 *"));
        assert!(output.contains("pos=(0.00, 10.00) dist=10.00\n"));
    }

    #[test]
    fn debug_renderer_truncates_listing() {
        let scene = scene_with(
            (1..=5)
                .map(|i| PlacementPoint::on_ground(i as f32 * 2.0, 0.0))
                .collect(),
        );
        let output = DebugTextRenderer::with_max_trees(2).render(&scene, &RenderView::default());
        assert_eq!(output.matches("pos=").count(), 2);
        assert!(output.contains("... 3 more"));
    }

    #[test]
    fn visibility_respects_far_plane() {
        let view = RenderView::default();
        assert!(view.is_visible(Vec3::new(0.0, 0.0, -150.0)));
        assert!(!view.is_visible(Vec3::new(0.0, 0.0, -250.0)));
        assert!(!view.is_visible(Vec3::new(0.0, 0.0, 5.0)));
    }
}
