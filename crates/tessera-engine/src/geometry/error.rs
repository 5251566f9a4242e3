use std::fmt;

use thiserror::Error;

use super::{BufferLayout, PrimitiveType};
use crate::shader::ShaderKey;

/// A vertex/index run that is inconsistent in itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{floats} floats of vertex data do not split into {vertex_count} vertices")]
    SizeMismatch { vertex_count: usize, floats: usize },

    #[error("{vertex_count} vertices declared without vertex attributes")]
    MissingAttributes { vertex_count: usize },

    #[error("vertex size {vertex_size} is too small for {attributes} vertex attributes")]
    AttributeSizeMismatch { vertex_size: usize, attributes: usize },

    #[error("{vertex_count} vertices cannot be addressed by 16-bit indices")]
    TooManyVertices { vertex_count: usize },

    #[error("index {index} at position {position} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { position: usize, index: u16, vertex_count: usize },

    #[error("obsolete vertices: {0}")]
    ObsoleteVertices(ObsoleteVertices),

    #[error("index count {count} is incompatible with primitive type {primitive}")]
    IndexCountMismatch { count: usize, primitive: PrimitiveType },

    #[error("primitive type {0} cannot be appended")]
    UnsupportedPrimitiveType(PrimitiveType),
}

/// Which unreferenced-vertex heuristic fired.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObsoleteVertices {
    /// The last `n` vertices are never referenced.
    Trailing(usize),
    /// The first `n` vertices are never referenced.
    Leading(usize),
    /// Fewer indices than vertices: some vertex in between is unreferenced.
    Holes { indices: usize, vertices: usize },
}

impl fmt::Display for ObsoleteVertices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObsoleteVertices::Trailing(n) => write!(f, "the last {n} vertices are not referenced"),
            ObsoleteVertices::Leading(n) => write!(f, "the first {n} vertices are not referenced"),
            ObsoleteVertices::Holes { indices, vertices } => {
                write!(f, "{indices} indices cannot reference all {vertices} vertices")
            }
        }
    }
}

/// Existing and incoming geometry cannot be merged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompatibilityError {
    #[error("incompatible primitive type {existing} <> {incoming}")]
    PrimitiveType { existing: PrimitiveType, incoming: PrimitiveType },

    #[error("incompatible vertex attributes {existing:?} <> {incoming:?}")]
    Attributes { existing: Vec<String>, incoming: Vec<String> },

    #[error("merged geometry with {combined} vertices would not be indexable by u16")]
    TooManyVertices { combined: usize },

    #[error("cannot merge indexed and non-indexed geometry (existing indexed: {existing_indexed})")]
    Indexing { existing_indexed: bool },

    #[error("incompatible buffer layout {existing} <> {incoming}; only interleaved buffers can be merged")]
    BufferLayout { existing: BufferLayout, incoming: BufferLayout },

    #[error("incompatible vertex size {existing} <> {incoming}")]
    VertexSize { existing: usize, incoming: usize },
}

/// How geometry attributes disagree with a shader's vertex inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeMismatch {
    #[error("shader does not support vertex attribute {attribute:?}")]
    Unsupported { attribute: String },

    #[error("geometry lacks shader vertex attribute {attribute:?}")]
    Missing { attribute: String },

    #[error("shader expects {expected} floats per vertex, geometry has {actual}")]
    VertexSize { expected: usize, actual: usize },

    #[error("{floats} floats do not split evenly into {vertex_count} vertices")]
    UnevenVertexData { vertex_count: usize, floats: usize },
}

/// Geometry does not fit the shader it is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderMismatchError {
    #[error("shader {0} is not loaded")]
    UnknownShader(ShaderKey),

    #[error("shader {shader}: {reason}")]
    AttributeMismatch { shader: ShaderKey, reason: AttributeMismatch },
}

/// Any rejected geometry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Incompatible(#[from] IncompatibilityError),

    #[error(transparent)]
    Shader(#[from] ShaderMismatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = ValidationError::IndexCountMismatch { count: 4, primitive: PrimitiveType::Triangles };
        assert_eq!(err.to_string(), "index count 4 is incompatible with primitive type triangles");

        let err = ValidationError::ObsoleteVertices(ObsoleteVertices::Trailing(2));
        assert_eq!(err.to_string(), "obsolete vertices: the last 2 vertices are not referenced");

        let err = ShaderMismatchError::AttributeMismatch {
            shader: ShaderKey::new("col_tex_2d"),
            reason: AttributeMismatch::VertexSize { expected: 4, actual: 5 },
        };
        assert_eq!(err.to_string(), "shader col_tex_2d: shader expects 4 floats per vertex, geometry has 5");
    }

    #[test]
    fn geometry_error_is_transparent() {
        let inner = IncompatibilityError::Indexing { existing_indexed: true };
        let err = GeometryError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
