//! Base geometry shared by every instance: one unit quad.

use bytemuck::{Pod, Zeroable};

/// Corners of the unit quad: top-right, bottom-right, bottom-left, top-left.
pub const QUAD_CORNERS: [[f32; 2]; 4] = [[1.0, 1.0], [1.0, -1.0], [-1.0, -1.0], [-1.0, 1.0]];

/// Two triangles: (0, 1, 3) and (1, 2, 3).
pub(crate) const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

/// Every edge of both triangles, diagonal included.
pub(crate) const WIRE_INDICES: [u16; 12] = [0, 1, 1, 3, 3, 0, 1, 2, 2, 3, 3, 1];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(crate) fn quad_vertices() -> [QuadVertex; 4] {
    QUAD_CORNERS.map(|pos| QuadVertex { pos })
}

/// Projection uniform (mat4, column-major).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ProjectionUniform {
    pub projection: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_cover_the_quad_once() {
        let area = |t: &[u16]| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| QUAD_CORNERS[i as usize]);
            ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() * 0.5
        };
        let total: f32 = QUAD_INDICES.chunks(3).map(area).sum();
        assert_eq!(total, 4.0);
    }

    #[test]
    fn wire_edges_come_from_the_fill_triangles() {
        for edge in WIRE_INDICES.chunks(2) {
            let shared = QUAD_INDICES
                .chunks(3)
                .any(|tri| tri.contains(&edge[0]) && tri.contains(&edge[1]));
            assert!(shared, "edge {edge:?} is not part of a triangle");
        }
    }
}
