//! Procedural meshes standing in for imported models.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TreeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GroundVertex {
    pub position: [f32; 3],
}

/// Shape of the procedural tree, in model units. The base sits at the origin.
#[derive(Debug, Clone, Copy)]
pub struct TreeShape {
    pub segments: u16,
    pub trunk_radius: f32,
    pub trunk_height: f32,
    /// Stacked cones from bottom to top: (base height, base radius, tip height).
    pub canopy: [(f32, f32, f32); 2],
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            segments: 10,
            trunk_radius: 0.15,
            trunk_height: 1.2,
            canopy: [(0.9, 1.0, 2.6), (1.9, 0.7, 3.4)],
        }
    }
}

const TRUNK_COLOR: [f32; 3] = [0.40, 0.26, 0.14];
const CANOPY_COLOR: [f32; 3] = [0.16, 0.42, 0.20];

/// Trunk cylinder plus stacked canopy cones, counter-clockwise seen from outside.
pub fn tree_mesh(shape: &TreeShape) -> (Vec<TreeVertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let n = shape.segments.max(3);
    let angle = |i: u16| i as f32 / n as f32 * TAU;

    // Trunk sides: bottom/top pairs per segment edge.
    let base = vertices.len() as u16;
    for i in 0..=n {
        let (s, c) = angle(i).sin_cos();
        let normal = [c, 0.0, s];
        let (x, z) = (c * shape.trunk_radius, s * shape.trunk_radius);
        vertices.push(TreeVertex {
            position: [x, 0.0, z],
            normal,
            color: TRUNK_COLOR,
        });
        vertices.push(TreeVertex {
            position: [x, shape.trunk_height, z],
            normal,
            color: TRUNK_COLOR,
        });
    }
    for i in 0..n {
        let b0 = base + i * 2;
        let (t0, b1, t1) = (b0 + 1, b0 + 2, b0 + 3);
        indices.extend_from_slice(&[b0, t0, t1, b0, t1, b1]);
    }

    for &(y0, radius, y1) in &shape.canopy {
        push_cone(&mut vertices, &mut indices, n, y0, radius, y1);
    }

    (vertices, indices)
}

fn push_cone(
    vertices: &mut Vec<TreeVertex>,
    indices: &mut Vec<u16>,
    n: u16,
    y0: f32,
    radius: f32,
    y1: f32,
) {
    let height = y1 - y0;
    let angle = |i: u16| i as f32 / n as f32 * TAU;
    let slanted = |a: f32| {
        let (s, c) = a.sin_cos();
        let len = (height * height + radius * radius).sqrt();
        [c * height / len, radius / len, s * height / len]
    };

    // Sides: one base vertex per edge and one apex per segment so the apex normal follows the face.
    let base = vertices.len() as u16;
    for i in 0..=n {
        let a = angle(i);
        let (s, c) = a.sin_cos();
        vertices.push(TreeVertex {
            position: [c * radius, y0, s * radius],
            normal: slanted(a),
            color: CANOPY_COLOR,
        });
    }
    let apex = vertices.len() as u16;
    for i in 0..n {
        let mid = (angle(i) + angle(i + 1)) * 0.5;
        vertices.push(TreeVertex {
            position: [0.0, y1, 0.0],
            normal: slanted(mid),
            color: CANOPY_COLOR,
        });
    }
    for i in 0..n {
        indices.extend_from_slice(&[base + i, apex + i, base + i + 1]);
    }

    // Underside cap, facing down.
    let center = vertices.len() as u16;
    vertices.push(TreeVertex {
        position: [0.0, y0, 0.0],
        normal: [0.0, -1.0, 0.0],
        color: CANOPY_COLOR,
    });
    let ring = vertices.len() as u16;
    for i in 0..=n {
        let (s, c) = angle(i).sin_cos();
        vertices.push(TreeVertex {
            position: [c * radius, y0, s * radius],
            normal: [0.0, -1.0, 0.0],
            color: CANOPY_COLOR,
        });
    }
    for i in 0..n {
        indices.extend_from_slice(&[center, ring + i, ring + i + 1]);
    }
}

/// Square ground quad on y = 0, counter-clockwise seen from above.
pub fn ground_mesh(half_extent: f32) -> (Vec<GroundVertex>, Vec<u16>) {
    let e = half_extent;
    let vertices = vec![
        GroundVertex { position: [-e, 0.0, -e] },
        GroundVertex { position: [e, 0.0, -e] },
        GroundVertex { position: [e, 0.0, e] },
        GroundVertex { position: [-e, 0.0, e] },
    ];
    let indices = vec![0, 3, 2, 0, 2, 1];
    (vertices, indices)
}
