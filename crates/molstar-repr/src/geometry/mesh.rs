//! Triangle mesh with per-vertex group ids

use lin_alg::f32::Vec3;

use super::sphere::sphere;

/// Indexed triangle mesh
///
/// Positions and normals are flat `xyz` arrays. Every vertex carries the
/// id of the group (structure element) it was generated for, which drives
/// per-group coloring, marking and picking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub groups: Vec<f32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `vertex_count` vertices and `triangle_count` triangles
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(triangle_count * 3),
            groups: Vec::with_capacity(vertex_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a tessellated sphere tagged with `group`
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, detail: usize, group: u32) {
        let tessellation = sphere(detail);
        let offset = self.vertex_count() as u32;

        for v in &tessellation.vertices {
            self.vertices.extend_from_slice(&[
                center.x + v[0] * radius,
                center.y + v[1] * radius,
                center.z + v[2] * radius,
            ]);
            self.normals.extend_from_slice(v);
            self.groups.push(group as f32);
        }
        for t in &tessellation.triangles {
            self.indices
                .extend_from_slice(&[t[0] + offset, t[1] + offset, t[2] + offset]);
        }
    }
}
