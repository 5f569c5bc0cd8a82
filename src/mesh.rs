//! Tiny indexed meshes for instanced drawing.

use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// xyz per vertex.
    pub positions: Vec<f32>,
    /// uv per vertex; empty for untextured meshes.
    pub uvs: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Latitude/longitude sphere. Low segment counts are plenty for dots a few
/// pixels wide.
pub fn uv_sphere(radius: f32, segments: u16, rings: u16) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut positions = Vec::with_capacity((segments as usize + 1) * (rings as usize + 1) * 3);
    for ring in 0..=rings {
        let theta = ring as f32 / rings as f32 * PI;
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * TAU;
            positions.extend_from_slice(&[
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity(segments as usize * rings as usize * 6);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg + 1;
            let b = ring * stride + seg;
            let c = (ring + 1) * stride + seg;
            let d = (ring + 1) * stride + seg + 1;
            if ring != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh {
        positions,
        uvs: Vec::new(),
        indices,
    }
}

/// Unit square in the XY plane centred on the origin, facing +Z.
pub fn quad(size: f32) -> Mesh {
    let h = size * 0.5;
    Mesh {
        positions: vec![-h, -h, 0.0, h, -h, 0.0, h, h, 0.0, -h, h, 0.0],
        uvs: vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
