use std::fmt;

/// How per-attribute data is arranged inside the vertex array.
///
/// - `Interleaved`: `[p0 t0 | p1 t1 | ...]`, one vertex after another.
/// - `Separate`: `[p0 p1 ... | t0 t1 ...]`, one block per attribute.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BufferLayout {
    #[default]
    Interleaved,
    Separate,
}

impl fmt::Display for BufferLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferLayout::Interleaved => f.write_str("interleaved"),
            BufferLayout::Separate => f.write_str("separate"),
        }
    }
}

/// Shader-side type of a vertex attribute. All components are `f32`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    /// Number of `f32` components one vertex stores for this attribute.
    pub const fn components(self) -> usize {
        match self {
            AttributeType::Float => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 | AttributeType::Mat2 => 4,
            AttributeType::Mat3 => 9,
            AttributeType::Mat4 => 16,
        }
    }

    /// Single-location wgpu vertex format. Matrices span several locations and have none.
    pub fn vertex_format(self) -> Option<wgpu::VertexFormat> {
        match self {
            AttributeType::Float => Some(wgpu::VertexFormat::Float32),
            AttributeType::Vec2 => Some(wgpu::VertexFormat::Float32x2),
            AttributeType::Vec3 => Some(wgpu::VertexFormat::Float32x3),
            AttributeType::Vec4 => Some(wgpu::VertexFormat::Float32x4),
            AttributeType::Mat2 | AttributeType::Mat3 | AttributeType::Mat4 => None,
        }
    }
}

/// Attribute names of any string-like list.
pub(crate) fn attribute_names<S: AsRef<str>>(attributes: &[S]) -> impl Iterator<Item = &str> {
    attributes.iter().map(|a| a.as_ref())
}

/// Vertex inputs declared by a shader program, in declaration order.
///
/// The position of an attribute in this list is its shader location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderLayout {
    attributes: Vec<(String, AttributeType)>,
}

impl ShaderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or retypes) an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = ty,
            None => self.attributes.push((name, ty)),
        }
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<AttributeType> {
        self.attributes.iter().find(|(n, _)| n == name).map(|&(_, ty)| ty)
    }

    /// Shader location of `name`.
    #[inline]
    pub fn location(&self, name: &str) -> Option<u32> {
        self.attributes.iter().position(|(n, _)| n == name).map(|i| i as u32)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeType)> {
        self.attributes.iter().map(|(n, ty)| (n.as_str(), *ty))
    }

    /// Floats per vertex for the given attribute names. Unknown names count as zero.
    pub fn vertex_size<S: AsRef<str>>(&self, names: &[S]) -> usize {
        attribute_names(names)
            .filter_map(|n| self.get(n))
            .map(AttributeType::components)
            .sum()
    }
}
