//! Mesh renderables and render objects
//!
//! A [`MeshRenderable`] is the backend-independent description of one
//! instanced mesh draw: its attribute values plus the derived instance and
//! draw counts. A [`RenderObject`] gives it an id and visibility state and is
//! shared with the render backend, which reads it through a lock while the
//! owning visual swaps geometry in place.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::color::Color;
use crate::geometry::Mesh;

/// Column-major 4x4 identity
pub const IDENTITY_TRANSFORM: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Attribute and uniform values of a mesh draw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshValues {
    /// Vertex positions, `xyz` per vertex
    pub position: Vec<f32>,
    /// Vertex normals, `xyz` per vertex
    pub normal: Vec<f32>,
    /// Instance transforms, 16 floats per instance
    pub transform: Vec<f32>,
    /// Group colors, `rgb` per group
    pub color: Vec<f32>,
    /// Group id per vertex
    pub group: Vec<f32>,
    /// Marker flags per group
    pub marker: Vec<u8>,
    /// Triangle indices; when absent vertices are drawn in order
    pub elements: Option<Vec<u32>>,
    pub alpha: f32,
}

impl MeshValues {
    /// Values for a single, untransformed instance of `mesh`
    pub fn from_mesh(mesh: Mesh, colors: &[Color], alpha: f32) -> Self {
        let Mesh {
            vertices,
            normals,
            indices,
            groups,
        } = mesh;
        Self {
            position: vertices,
            normal: normals,
            transform: IDENTITY_TRANSFORM.to_vec(),
            color: flatten_colors(colors),
            group: groups,
            marker: vec![0; colors.len()],
            elements: Some(indices),
            alpha,
        }
    }

    /// Number of groups with a color
    pub fn group_count(&self) -> usize {
        self.color.len() / 3
    }
}

/// Flatten colors into an `rgb` array
pub fn flatten_colors(colors: &[Color]) -> Vec<f32> {
    colors.iter().flat_map(|c| c.to_array()).collect()
}

/// One instanced mesh draw
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderable {
    values: MeshValues,
    instance_count: usize,
    instance_id: Vec<f32>,
    draw_count: usize,
}

impl MeshRenderable {
    /// Derive instance ids and counts from `values`
    pub fn create(values: MeshValues) -> Self {
        let instance_count = values.transform.len() / 16;
        let instance_id = (0..instance_count).map(|i| i as f32).collect();
        let draw_count = match &values.elements {
            Some(elements) => elements.len(),
            None => values.position.len() / 3,
        };
        Self {
            values,
            instance_count,
            instance_id,
            draw_count,
        }
    }

    pub fn values(&self) -> &MeshValues {
        &self.values
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    /// Serial instance ids `0..instance_count`
    pub fn instance_id(&self) -> &[f32] {
        &self.instance_id
    }

    /// Number of vertices (or indices) per instance
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Issue the draw call for this renderable
    pub fn draw(&self, object_id: u32, pickable: bool, backend: &mut dyn DrawBackend) {
        backend.draw(&DrawCall {
            object_id,
            pickable,
            draw_count: self.draw_count,
            instance_count: self.instance_count,
            instance_id: &self.instance_id,
            values: &self.values,
        });
    }
}

/// Everything a backend needs to issue one draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub object_id: u32,
    pub pickable: bool,
    pub draw_count: usize,
    pub instance_count: usize,
    pub instance_id: &'a [f32],
    pub values: &'a MeshValues,
}

/// Render backend consuming draw calls
pub trait DrawBackend {
    fn draw(&mut self, call: &DrawCall<'_>);
}

#[derive(Debug)]
struct RenderObjectState {
    renderable: MeshRenderable,
    visible: bool,
    pickable: bool,
    geometry_version: u64,
}

/// A renderable with an id and display state, shared with the backend
#[derive(Debug)]
pub struct RenderObject {
    id: u32,
    state: RwLock<RenderObjectState>,
}

impl RenderObject {
    pub fn new(id: u32, renderable: MeshRenderable) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: RwLock::new(RenderObjectState {
                renderable,
                visible: true,
                pickable: true,
                geometry_version: 0,
            }),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.state.read().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.write().visible = visible;
    }

    pub fn is_pickable(&self) -> bool {
        self.state.read().pickable
    }

    pub fn set_pickable(&self, pickable: bool) {
        self.state.write().pickable = pickable;
    }

    /// Incremented every time the geometry is replaced
    pub fn geometry_version(&self) -> u64 {
        self.state.read().geometry_version
    }

    /// Swap in new geometry
    pub fn replace_renderable(&self, renderable: MeshRenderable) {
        let mut state = self.state.write();
        state.renderable = renderable;
        state.geometry_version += 1;
    }

    /// Read the current renderable
    pub fn with_renderable<R>(&self, f: impl FnOnce(&MeshRenderable) -> R) -> R {
        f(&self.state.read().renderable)
    }

    /// Replace group colors and alpha without touching geometry
    pub fn update_color(&self, colors: &[Color], alpha: f32) {
        let mut state = self.state.write();
        let values = &mut state.renderable.values;
        values.color = flatten_colors(colors);
        values.alpha = alpha;
    }

    /// Modify marker flags; `f` reports whether it changed anything
    pub fn update_marker(&self, f: impl FnOnce(&mut [u8]) -> bool) -> bool {
        f(&mut self.state.write().renderable.values.marker)
    }

    /// Draw if visible
    pub fn draw(&self, backend: &mut dyn DrawBackend) {
        let state = self.state.read();
        if state.visible {
            state.renderable.draw(self.id, state.pickable, backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lin_alg::f32::Vec3;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(u32, usize, usize)>,
    }

    impl DrawBackend for Recorder {
        fn draw(&mut self, call: &DrawCall<'_>) {
            self.calls.push((call.object_id, call.draw_count, call.instance_count));
        }
    }

    fn values_without_elements() -> MeshValues {
        MeshValues {
            position: vec![0.0; 9 * 3],
            transform: [IDENTITY_TRANSFORM, IDENTITY_TRANSFORM].concat(),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_without_elements() {
        let renderable = MeshRenderable::create(values_without_elements());
        assert_eq!(renderable.instance_count(), 2);
        assert_eq!(renderable.instance_id(), &[0.0, 1.0]);
        assert_eq!(renderable.draw_count(), 9);
    }

    #[test]
    fn test_counts_with_elements() {
        let mut mesh = Mesh::new();
        mesh.add_sphere(Vec3::new(0.0, 0.0, 0.0), 1.0, 0, 0);
        let values = MeshValues::from_mesh(mesh, &[Color::WHITE], 1.0);
        let renderable = MeshRenderable::create(values);
        assert_eq!(renderable.instance_count(), 1);
        assert_eq!(renderable.draw_count(), 60);
        assert_eq!(renderable.values().group_count(), 1);
        assert_eq!(renderable.values().marker, vec![0]);
    }

    #[test]
    fn test_render_object_draws_only_when_visible() {
        let object = RenderObject::new(7, MeshRenderable::create(values_without_elements()));
        let mut backend = Recorder::default();

        object.draw(&mut backend);
        object.set_visible(false);
        object.draw(&mut backend);
        assert_eq!(backend.calls, vec![(7, 9, 2)]);
    }

    #[test]
    fn test_replace_and_recolor() {
        let object = RenderObject::new(1, MeshRenderable::create(values_without_elements()));
        assert_eq!(object.geometry_version(), 0);

        object.replace_renderable(MeshRenderable::create(MeshValues::default()));
        assert_eq!(object.geometry_version(), 1);
        assert_eq!(object.with_renderable(|r| r.instance_count()), 0);

        object.update_color(&[Color::WHITE, Color::GRAY], 0.5);
        assert_eq!(object.geometry_version(), 1);
        object.with_renderable(|r| {
            assert_eq!(r.values().group_count(), 2);
            assert_eq!(r.values().alpha, 0.5);
        });
    }
}
