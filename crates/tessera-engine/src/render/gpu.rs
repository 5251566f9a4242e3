//! wgpu upload of validated geometry.
//!
//! Pipelines, uniforms and bind groups stay with the caller: this module only
//! turns a [`Geometry`] into vertex/index buffers plus the matching
//! `wgpu::VertexBufferLayout`s, and replays them into a render pass.

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::{DrawCall, MeshSink};
use crate::coords::Affine;
use crate::geometry::{AttributeType, BufferLayout, Geometry, PrimitiveType, ShaderLayout};
use crate::shader::{ShaderKey, ShaderResolver};

const F32_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Why a geometry could not be turned into GPU buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("primitive type {0} has no wgpu topology")]
    UnsupportedPrimitive(PrimitiveType),

    #[error("vertex attribute {0:?} is not declared by the shader")]
    UnknownAttribute(String),

    #[error("vertex attribute {name:?} of type {ty:?} has no single-location vertex format")]
    UnsupportedAttribute { name: String, ty: AttributeType },

    #[error("shader {0} is not loaded")]
    UnknownShader(ShaderKey),

    #[error("attributes describe {expected} floats per vertex, geometry has {actual}")]
    VertexSize { expected: usize, actual: usize },
}

/// Owned counterpart of `wgpu::VertexBufferLayout`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferDesc {
    pub array_stride: wgpu::BufferAddress,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexBufferDesc {
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Buffer layouts for `geometry` drawn with a shader declaring `shader`.
///
/// Interleaved geometry uses one buffer with per-attribute offsets; separate
/// geometry uses one tightly packed buffer per attribute. Shader locations
/// follow the shader's declaration order.
pub fn vertex_buffer_layouts(
    geometry: &Geometry,
    shader: &ShaderLayout,
) -> Result<Vec<VertexBufferDesc>, UploadError> {
    let mut attrs = Vec::with_capacity(geometry.attributes().len());
    for name in geometry.attributes() {
        let (Some(ty), Some(location)) = (shader.get(name), shader.location(name)) else {
            return Err(UploadError::UnknownAttribute(name.clone()));
        };
        let format = ty
            .vertex_format()
            .ok_or_else(|| UploadError::UnsupportedAttribute { name: name.clone(), ty })?;
        attrs.push((ty, format, location));
    }

    let expected: usize = attrs.iter().map(|(ty, _, _)| ty.components()).sum();
    if !geometry.is_empty() && expected != geometry.vertex_size() {
        return Err(UploadError::VertexSize { expected, actual: geometry.vertex_size() });
    }

    let layouts = match geometry.layout() {
        BufferLayout::Interleaved => {
            let mut offset = 0;
            let attributes = attrs
                .iter()
                .map(|&(ty, format, shader_location)| {
                    let attr = wgpu::VertexAttribute { format, offset, shader_location };
                    offset += ty.components() as u64 * F32_SIZE;
                    attr
                })
                .collect();
            vec![VertexBufferDesc { array_stride: offset, attributes }]
        }
        BufferLayout::Separate => attrs
            .iter()
            .map(|&(ty, format, shader_location)| VertexBufferDesc {
                array_stride: ty.components() as u64 * F32_SIZE,
                attributes: vec![wgpu::VertexAttribute { format, offset: 0, shader_location }],
            })
            .collect(),
    };
    Ok(layouts)
}

/// Splits separate-layout vertex data into one float block per attribute.
fn separate_blocks<'a>(geometry: &'a Geometry, layouts: &[VertexBufferDesc]) -> Vec<&'a [f32]> {
    let n = geometry.vertex_count();
    let mut start = 0;
    layouts
        .iter()
        .map(|l| {
            let len = n * (l.array_stride / F32_SIZE) as usize;
            let block = &geometry.vertices()[start..start + len];
            start += len;
            block
        })
        .collect()
}

/// Geometry resident in GPU buffers.
#[derive(Debug)]
pub struct GpuMesh {
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
    topology: wgpu::PrimitiveTopology,
    layouts: Vec<VertexBufferDesc>,
}

impl GpuMesh {
    /// Uploads `geometry`. The geometry is expected to be valid for `shader`.
    pub fn upload(
        device: &wgpu::Device,
        geometry: &Geometry,
        shader: &ShaderLayout,
    ) -> Result<Self, UploadError> {
        let topology = geometry
            .primitive()
            .topology()
            .ok_or(UploadError::UnsupportedPrimitive(geometry.primitive()))?;
        let layouts = vertex_buffer_layouts(geometry, shader)?;

        let blocks = match geometry.layout() {
            BufferLayout::Interleaved => vec![geometry.vertices()],
            BufferLayout::Separate => separate_blocks(geometry, &layouts),
        };
        let vertex_buffers = blocks
            .into_iter()
            .map(|block| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("tessera mesh vbo"),
                    contents: bytemuck::cast_slice(block),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();

        let index_buffer = geometry.indices().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessera mesh ibo"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::trace!(
            "GpuMesh::upload: {} vertices, {} indices, {:?}",
            geometry.vertex_count(),
            geometry.index_count(),
            topology
        );

        Ok(Self {
            vertex_buffers,
            index_buffer,
            vertex_count: geometry.vertex_count() as u32,
            index_count: geometry.index_count() as u32,
            topology,
            layouts,
        })
    }

    #[inline]
    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    /// Layouts the render pipeline must be created with.
    #[inline]
    pub fn layouts(&self) -> &[VertexBufferDesc] {
        &self.layouts
    }

    /// Binds the buffers and issues the draw. The pipeline must already be set.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        for (slot, vbo) in self.vertex_buffers.iter().enumerate() {
            rpass.set_vertex_buffer(slot as u32, vbo.slice(..));
        }
        match self.index_buffer.as_ref() {
            Some(ibo) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => rpass.draw(0..self.vertex_count, 0..1),
        }
    }
}

/// A mesh uploaded by [`GpuSink`], waiting to be encoded.
#[derive(Debug)]
pub struct QueuedDraw {
    pub transform: Affine,
    pub shader: ShaderKey,
    pub color: Option<[f32; 4]>,
    pub mesh: GpuMesh,
}

/// Sink that uploads each draw call and queues it for a later render pass.
///
/// Calls that cannot be uploaded are logged and dropped.
pub struct GpuSink<'a> {
    device: &'a wgpu::Device,
    shaders: &'a dyn ShaderResolver,
    queued: Vec<QueuedDraw>,
}

impl<'a> GpuSink<'a> {
    pub fn new(device: &'a wgpu::Device, shaders: &'a dyn ShaderResolver) -> Self {
        Self {
            device,
            shaders,
            queued: Vec::new(),
        }
    }

    #[inline]
    pub fn queued(&self) -> &[QueuedDraw] {
        &self.queued
    }

    /// Replays queued draws. `bind` sets pipeline and uniforms for each one.
    pub fn encode<F>(&self, rpass: &mut wgpu::RenderPass<'_>, mut bind: F)
    where
        F: FnMut(&mut wgpu::RenderPass<'_>, &QueuedDraw),
    {
        for draw in &self.queued {
            bind(rpass, draw);
            draw.mesh.draw(rpass);
        }
    }

    fn upload(&self, call: &DrawCall<'_>) -> Result<QueuedDraw, UploadError> {
        let key = call.material.shader();
        let layout = self
            .shaders
            .resolve(key)
            .ok_or_else(|| UploadError::UnknownShader(key.clone()))?;
        Ok(QueuedDraw {
            transform: call.transform,
            shader: key.clone(),
            color: call.material.uniform4("color"),
            mesh: GpuMesh::upload(self.device, call.geometry, layout)?,
        })
    }
}

impl MeshSink for GpuSink<'_> {
    fn draw(&mut self, call: DrawCall<'_>) {
        match self.upload(&call) {
            Ok(draw) => self.queued.push(draw),
            Err(e) => log::warn!("GpuSink: dropping draw call: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{builtin, ShaderLibrary};

    fn tex_layout() -> ShaderLayout {
        let lib = ShaderLibrary::with_builtins();
        lib.resolve(&ShaderKey::new(builtin::COL_TEX_2D)).unwrap().clone()
    }

    fn quad(layout: BufferLayout) -> Geometry {
        Geometry::new(4, (0..16).map(|i| i as f32).collect(), Some(vec![0, 1, 2, 2, 3, 0]), PrimitiveType::Triangles, &["position", "texCoord"], layout)
            .unwrap()
    }

    #[test]
    fn interleaved_layout_has_offsets() {
        let layouts = vertex_buffer_layouts(&quad(BufferLayout::Interleaved), &tex_layout()).unwrap();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].array_stride, 16);
        assert_eq!(
            layouts[0].attributes,
            vec![
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 0 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 8, shader_location: 1 },
            ]
        );
    }

    #[test]
    fn separate_layout_has_one_buffer_per_attribute() {
        let g = quad(BufferLayout::Separate);
        let layouts = vertex_buffer_layouts(&g, &tex_layout()).unwrap();
        assert_eq!(layouts.len(), 2);
        assert!(layouts.iter().all(|l| l.array_stride == 8 && l.attributes[0].offset == 0));
        assert_eq!(layouts[1].attributes[0].shader_location, 1);

        let blocks = separate_blocks(&g, &layouts);
        assert_eq!(blocks[0], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(blocks[1][0], 8.0);
    }

    #[test]
    fn locations_follow_shader_not_geometry_order() {
        let g = Geometry::new(3, vec![0.0; 12], None, PrimitiveType::Triangles, &["texCoord", "position"], BufferLayout::Interleaved)
            .unwrap();
        let layouts = vertex_buffer_layouts(&g, &tex_layout()).unwrap();
        let locs: Vec<_> = layouts[0].attributes.iter().map(|a| (a.offset, a.shader_location)).collect();
        assert_eq!(locs, vec![(0, 1), (8, 0)]);
    }

    #[test]
    fn unknown_and_matrix_attributes_are_rejected() {
        let g = Geometry::new(3, vec![0.0; 6], None, PrimitiveType::Triangles, &["normal"], BufferLayout::Interleaved)
            .unwrap();
        assert_eq!(
            vertex_buffer_layouts(&g, &tex_layout()),
            Err(UploadError::UnknownAttribute("normal".into()))
        );

        let g = Geometry::new(3, vec![0.0; 9], None, PrimitiveType::Triangles, &["position"], BufferLayout::Interleaved)
            .unwrap();
        assert_eq!(
            vertex_buffer_layouts(&g, &tex_layout()),
            Err(UploadError::VertexSize { expected: 2, actual: 3 })
        );

        let shader = ShaderLayout::new().with_attribute("xform", AttributeType::Mat2);
        let g = Geometry::new(1, vec![0.0; 4], None, PrimitiveType::Points, &["xform"], BufferLayout::Interleaved)
            .unwrap();
        assert!(matches!(
            vertex_buffer_layouts(&g, &shader),
            Err(UploadError::UnsupportedAttribute { ty: AttributeType::Mat2, .. })
        ));
    }
}
