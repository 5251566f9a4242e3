use crate::coords::{Affine, TransformStack};
use crate::geometry::Geometry;
use crate::shader::ShaderKey;

use super::{Material, TextureKey};

/// Per-frame state threaded through `draw` calls.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub transform_stack: TransformStack,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One mesh submitted for drawing.
///
/// Carries everything an upload needs: vertex count, floats, indices,
/// primitive type, attribute names and buffer layout (all on `geometry`).
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Accumulated model transform.
    pub transform: Affine,
    pub material: &'a Material,
    pub geometry: &'a Geometry,
}

/// Receives draw calls. Implementations own all graphics API interaction.
pub trait MeshSink {
    fn draw(&mut self, call: DrawCall<'_>);
}

/// Owned snapshot of a [`DrawCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub transform: Affine,
    pub shader: ShaderKey,
    pub textures: Vec<(String, TextureKey)>,
    pub color: Option<[f32; 4]>,
    pub geometry: Geometry,
}

/// Sink that keeps a copy of everything it is asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Vec<DrawRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    /// Returns the recorded calls and starts over.
    pub fn take(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.records)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl MeshSink for RecordingSink {
    fn draw(&mut self, call: DrawCall<'_>) {
        self.records.push(DrawRecord {
            transform: call.transform,
            shader: call.material.shader().clone(),
            textures: call.material.textures().to_vec(),
            color: call.material.uniform4("color"),
            geometry: call.geometry.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Transform, Vec2};
    use crate::geometry::{BufferLayout, PrimitiveType};

    #[test]
    fn records_transform_and_geometry() {
        let mut material = Material::new(ShaderKey::new("col_2d"));
        material.set_uniform4("color", [1.0, 0.0, 0.0, 1.0]);
        let geometry = Geometry::new(2, vec![0.0, 0.0, 1.0, 1.0], None, PrimitiveType::Lines, &["position"], BufferLayout::Interleaved)
            .unwrap();

        let mut state = RenderState::new();
        let mut t = Transform::IDENTITY;
        t.move_xy(3.0, 4.0);
        state.transform_stack.push_mul_right(t.matrix());

        let mut sink = RecordingSink::new();
        sink.draw(DrawCall {
            transform: state.transform_stack.top(),
            material: &material,
            geometry: &geometry,
        });

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].color, Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(records[0].geometry, geometry);
        assert_eq!(records[0].transform.transform_point(Vec2::zero()), Vec2::new(3.0, 4.0));
        assert!(sink.records().is_empty());
    }
}
