use glam::{Mat4, Quat, Vec3};
use grove_common::{PlacementPoint, ScatterSettings, SceneLayout, Transform};
use grove_scatter::{ScatterConstraints, ScatterError};

/// Errors from building a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scatter failed: {0}")]
    Scatter(#[from] ScatterError),
}

/// One placed tree: where it was scattered and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TreeInstance {
    placement: PlacementPoint,
    transform: Transform,
}

/// Scene state, built once before the frame loop and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Scene {
    trees: Vec<TreeInstance>,
    ground_half_extent: f32,
    seed: u64,
}

impl Scene {
    /// Scatter trees according to `scatter` and lay them out per `layout`.
    ///
    /// Without a configured seed one is drawn from entropy; either way the
    /// seed used is recorded so the layout can be reproduced.
    pub fn generate(scatter: &ScatterSettings, layout: &SceneLayout) -> Result<Self, SceneError> {
        let constraints = ScatterConstraints::from(scatter);
        let seed = scatter.seed.unwrap_or_else(rand::random);
        let points = grove_scatter::generate_seeded(&constraints, seed)?;
        tracing::info!(
            trees = points.len(),
            seed,
            "scattered trees between r={} and r={}",
            constraints.exclusion_radius,
            constraints.max_spawn_radius
        );
        Ok(Self::from_placements(points, constraints, layout, seed))
    }

    /// Build a scene from already generated placements.
    pub fn from_placements(
        points: Vec<PlacementPoint>,
        constraints: ScatterConstraints,
        layout: &SceneLayout,
        seed: u64,
    ) -> Self {
        if layout.ground_half_extent < constraints.max_spawn_radius {
            tracing::warn!(
                ground = layout.ground_half_extent,
                spawn = constraints.max_spawn_radius,
                "some trees may stand past the edge of the ground"
            );
        }

        let rotation = Quat::from_rotation_y(layout.tree_yaw_degrees.to_radians());
        let scale = Vec3::splat(layout.tree_scale);
        let trees = points
            .into_iter()
            .map(|placement| TreeInstance {
                placement,
                transform: Transform {
                    position: placement.position(),
                    rotation,
                    scale,
                },
            })
            .collect();

        Self {
            trees,
            ground_half_extent: layout.ground_half_extent,
            seed,
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn placements(&self) -> impl Iterator<Item = &PlacementPoint> + '_ {
        self.trees.iter().map(|t| &t.placement)
    }

    /// Per-instance model matrices, in placement order.
    pub fn tree_model_matrices(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.trees.iter().map(|t| t.transform.model_matrix())
    }

    pub fn ground_half_extent(&self) -> f32 {
        self.ground_half_extent
    }

    /// Seed the placements were generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index and distance of the tree closest to `position` on the ground plane.
    pub fn nearest_tree(&self, position: Vec3) -> Option<(usize, f32)> {
        let flat = Vec3::new(position.x, 0.0, position.z);
        self.trees
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.placement.position().distance(flat)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Deterministic fingerprint of the placements, for comparing layouts.
    pub fn layout_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.seed.to_le_bytes());
        for p in self.placements() {
            mix(&p.x.to_le_bytes());
            mix(&p.z.to_le_bytes());
        }
        h
    }
}
