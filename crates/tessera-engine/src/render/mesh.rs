use std::fmt;
use std::sync::Arc;

use super::{DrawCall, Material, MeshSink, RenderState};
use crate::geometry::{validate_geometry, BufferLayout, Geometry, GeometryError, PrimitiveType};
use crate::shader::ShaderResolver;

/// Geometry bound to a material.
///
/// Every geometry change is validated against the material's shader before
/// it is committed; a rejected change leaves the mesh as it was.
pub struct Mesh {
    material: Material,
    geometry: Geometry,
    shaders: Arc<dyn ShaderResolver>,
}

impl Mesh {
    pub fn new(material: Material, shaders: Arc<dyn ShaderResolver>) -> Self {
        Self {
            material,
            geometry: Geometry::default(),
            shaders,
        }
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replaces the geometry with a new run.
    pub fn set_vertex_data<S: AsRef<str>>(
        &mut self,
        vertex_count: usize,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        primitive: PrimitiveType,
        attributes: &[S],
        layout: BufferLayout,
    ) -> Result<(), GeometryError> {
        let geometry = Geometry::new(vertex_count, vertices, indices, primitive, attributes, layout)?;
        self.set_geometry(geometry)
    }

    /// Replaces the geometry with an already built one.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<(), GeometryError> {
        validate_geometry(&geometry, Some((self.material.shader(), &*self.shaders)))?;
        self.geometry = geometry;
        Ok(())
    }

    /// Merges `other` onto the current geometry.
    pub fn append_geometry(&mut self, other: &Geometry) -> Result<(), GeometryError> {
        let mut merged = self.geometry.clone();
        merged.append_geometry(other)?;
        self.set_geometry(merged)
    }

    /// Hands the mesh to `sink` with the current model transform. Empty meshes are skipped.
    pub fn draw(&self, state: &RenderState, sink: &mut dyn MeshSink) {
        if self.geometry.is_empty() {
            return;
        }
        sink.draw(DrawCall {
            transform: state.transform_stack.top(),
            material: &self.material,
            geometry: &self.geometry,
        });
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("material", &self.material)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShaderMismatchError;
    use crate::render::RecordingSink;
    use crate::shader::{builtin, ShaderKey, ShaderLibrary};

    fn mesh(shader: &str) -> Mesh {
        Mesh::new(Material::new(ShaderKey::new(shader)), Arc::new(ShaderLibrary::with_builtins()))
    }

    #[test]
    fn set_vertex_data_checks_shader() {
        let mut m = mesh(builtin::COL_2D);
        m.set_vertex_data(3, vec![0.0; 6], None, PrimitiveType::Triangles, &["position"], BufferLayout::Interleaved)
            .unwrap();
        let before = m.geometry().clone();

        let err = m.set_vertex_data(
            3,
            vec![0.0; 12],
            None,
            PrimitiveType::Triangles,
            &["position", "texCoord"],
            BufferLayout::Interleaved,
        );
        assert!(matches!(err, Err(GeometryError::Shader(ShaderMismatchError::AttributeMismatch { .. }))));
        assert_eq!(m.geometry(), &before);
    }

    #[test]
    fn unknown_shader_rejects_data() {
        let mut m = mesh("not_loaded");
        let err = m.set_vertex_data(3, vec![0.0; 6], None, PrimitiveType::Triangles, &["position"], BufferLayout::Interleaved);
        assert!(matches!(err, Err(GeometryError::Shader(ShaderMismatchError::UnknownShader(_)))));
        assert!(m.geometry().is_empty());
    }

    #[test]
    fn append_merges_and_validates() {
        let mut m = mesh(builtin::COL_2D);
        let tri = Geometry::new(3, vec![0.0; 6], None, PrimitiveType::Triangles, &["position"], BufferLayout::Interleaved)
            .unwrap();
        m.append_geometry(&tri).unwrap();
        m.append_geometry(&tri).unwrap();
        assert_eq!(m.geometry().vertex_count(), 6);
    }

    #[test]
    fn empty_mesh_is_not_drawn() {
        let m = mesh(builtin::COL_2D);
        let mut sink = RecordingSink::new();
        m.draw(&RenderState::new(), &mut sink);
        assert!(sink.records().is_empty());
    }
}
