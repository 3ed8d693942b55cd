//! Icosahedral sphere tessellations
//!
//! Each detail level splits every triangle of the previous level into four.
//!
//! | Detail | Vertices | Triangles |
//! |--------|----------|-----------|
//! | 0      | 12       | 20        |
//! | 1      | 42       | 80        |
//! | 2      | 162      | 320       |
//! | 3      | 642      | 1280      |

use std::sync::OnceLock;

use ahash::AHashMap;

/// Highest supported detail level
pub const MAX_DETAIL: usize = 3;

/// Unit sphere mesh; vertex positions double as normals
#[derive(Debug, Clone)]
pub struct SphereTessellation {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl SphereTessellation {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn icosahedron() -> Self {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let norm = (1.0 + phi * phi).sqrt();
        let (a, b) = (1.0 / norm, phi / norm);

        SphereTessellation {
            vertices: vec![
                [-a, b, 0.0],
                [a, b, 0.0],
                [-a, -b, 0.0],
                [a, -b, 0.0],
                [0.0, -a, b],
                [0.0, a, b],
                [0.0, -a, -b],
                [0.0, a, -b],
                [b, 0.0, -a],
                [b, 0.0, a],
                [-b, 0.0, -a],
                [-b, 0.0, a],
            ],
            triangles: vec![
                [0, 11, 5],
                [0, 5, 1],
                [0, 1, 7],
                [0, 7, 10],
                [0, 10, 11],
                [1, 5, 9],
                [5, 11, 4],
                [11, 10, 2],
                [10, 7, 6],
                [7, 1, 8],
                [3, 9, 4],
                [3, 4, 2],
                [3, 2, 6],
                [3, 6, 8],
                [3, 8, 9],
                [4, 9, 5],
                [2, 4, 11],
                [6, 2, 10],
                [8, 6, 7],
                [9, 8, 1],
            ],
        }
    }

    fn subdivided(&self) -> Self {
        let mut vertices = self.vertices.clone();
        let mut triangles = Vec::with_capacity(self.triangles.len() * 4);
        let mut midpoints: AHashMap<(u32, u32), u32> = AHashMap::new();

        let mut midpoint = |i: u32, j: u32, vertices: &mut Vec<[f32; 3]>| -> u32 {
            let key = (i.min(j), i.max(j));
            *midpoints.entry(key).or_insert_with(|| {
                let (p, q) = (vertices[i as usize], vertices[j as usize]);
                vertices.push(normalize([p[0] + q[0], p[1] + q[1], p[2] + q[2]]));
                (vertices.len() - 1) as u32
            })
        };

        for &[a, b, c] in &self.triangles {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            triangles.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }

        SphereTessellation {
            vertices,
            triangles,
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const UNINIT: OnceLock<SphereTessellation> = OnceLock::new();
static SPHERES: [OnceLock<SphereTessellation>; MAX_DETAIL + 1] = [UNINIT; MAX_DETAIL + 1];

/// Tessellation at `detail` (clamped to [`MAX_DETAIL`]), built once per level
pub fn sphere(detail: usize) -> &'static SphereTessellation {
    let detail = detail.min(MAX_DETAIL);
    SPHERES[detail].get_or_init(|| {
        log::debug!("Tessellating sphere at detail {}", detail);
        match detail {
            0 => SphereTessellation::icosahedron(),
            _ => sphere(detail - 1).subdivided(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_detail() {
        let expected = [(12, 20), (42, 80), (162, 320), (642, 1280)];
        for (detail, (vertices, triangles)) in expected.into_iter().enumerate() {
            let s = sphere(detail);
            assert_eq!(s.vertex_count(), vertices);
            assert_eq!(s.triangle_count(), triangles);
        }
        assert!(std::ptr::eq(sphere(9), sphere(MAX_DETAIL)));
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for v in &sphere(2).vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let s = sphere(1);
        let n = s.vertex_count() as u32;
        assert!(s.triangles.iter().flatten().all(|&i| i < n));
    }
}
