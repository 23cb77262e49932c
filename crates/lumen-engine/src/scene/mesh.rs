use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Interleaved vertex: position, normal, texture coordinate (32-byte stride).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // tex_coord
    ];

    #[inline]
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list referencing one material of its model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Index into `Model::materials`.
    pub material: usize,
}

impl Mesh {
    /// Unit cube centered at the origin. Faces are split so each has its own
    /// normals and a full `[0, 1]` texture square; CCW winding seen from outside.
    pub fn cube() -> Self {
        // (normal, tangent u, tangent v) per face; u x v == normal.
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (n, u, v) in FACES {
            let (n, u, v) = (Vec3::from(n), Vec3::from(u), Vec3::from(v));
            let base = vertices.len() as u32;
            let center = n * 0.5;
            for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
                let position = center + u * su + v * sv;
                // Texture v grows downward.
                let uv = Vec2::new(su + 0.5, 0.5 - sv);
                vertices.push(Vertex::new(position, n, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            name: "cube".to_string(),
            vertices,
            indices,
            material: 0,
        }
    }

    /// Replaces vertex normals with area-weighted face normals.
    ///
    /// Vertices shared between triangles get smoothed normals. Vertices that
    /// belong to no (non-degenerate) triangle keep +Y.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            // Unnormalized cross product weights by triangle area.
            let face = (pb - pa).cross(pc - pa);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }

        for (vertex, n) in self.vertices.iter_mut().zip(acc) {
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::layout().array_stride, 32);
    }

    #[test]
    fn cube_topology() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }

    #[test]
    fn cube_normals_are_unit_and_outward() {
        let cube = Mesh::cube();
        for v in &cube.vertices {
            let n = Vec3::from(v.normal);
            let p = Vec3::from(v.position);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.dot(p) > 0.0);
        }
    }

    #[test]
    fn cube_winding_is_ccw_from_outside() {
        let cube = Mesh::cube();
        for tri in cube.indices.chunks_exact(3) {
            let p: Vec<Vec3> = tri.iter().map(|&i| Vec3::from(cube.vertices[i as usize].position)).collect();
            let face = (p[1] - p[0]).cross(p[2] - p[0]);
            let n = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!(face.dot(n) > 0.0);
        }
    }

    #[test]
    fn recompute_normals_matches_flat_faces() {
        let mut cube = Mesh::cube();
        let expected: Vec<[f32; 3]> = cube.vertices.iter().map(|v| v.normal).collect();
        for v in &mut cube.vertices {
            v.normal = [0.0; 3];
        }
        cube.recompute_normals();
        for (v, n) in cube.vertices.iter().zip(expected) {
            assert!((Vec3::from(v.normal) - Vec3::from(n)).length() < 1e-6);
        }
    }
}
