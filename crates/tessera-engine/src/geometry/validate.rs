//! Pure consistency checks for vertex/index runs.
//!
//! Checks run in a fixed order and the first violation is reported.

use super::layout::attribute_names;
use super::{
    AttributeMismatch, Geometry, GeometryError, ObsoleteVertices, PrimitiveType, ShaderMismatchError,
    ValidationError, MAX_INDEXED_VERTICES,
};
use crate::shader::{ShaderKey, ShaderResolver};

/// Floats per vertex, or `SizeMismatch` if the data does not split evenly.
pub(super) fn vertex_size(vertex_count: usize, floats: usize) -> Result<usize, ValidationError> {
    if vertex_count == 0 {
        return if floats == 0 {
            Ok(0)
        } else {
            Err(ValidationError::SizeMismatch { vertex_count, floats })
        };
    }
    if floats % vertex_count != 0 {
        return Err(ValidationError::SizeMismatch { vertex_count, floats });
    }
    Ok(floats / vertex_count)
}

/// Checks a run for internal consistency. No shader is involved.
///
/// `indices = None` (or an empty slice) means non-indexed drawing; the
/// vertex count then stands in for the index count.
pub fn validate<S: AsRef<str>>(
    vertex_count: usize,
    vertices: &[f32],
    indices: Option<&[u16]>,
    primitive: PrimitiveType,
    attributes: &[S],
) -> Result<(), ValidationError> {
    let vertex_size = vertex_size(vertex_count, vertices.len())?;

    if vertex_count > 0 {
        if attributes.is_empty() {
            return Err(ValidationError::MissingAttributes { vertex_count });
        }
        // zero-sized attributes don't exist
        if vertex_size < attributes.len() {
            return Err(ValidationError::AttributeSizeMismatch {
                vertex_size,
                attributes: attributes.len(),
            });
        }
    }

    let indices = indices.unwrap_or_default();
    if !indices.is_empty() {
        check_indices(vertex_count, indices)?;
    }

    let effective = if indices.is_empty() { vertex_count } else { indices.len() };
    if !primitive.accepts_index_count(effective) {
        return Err(ValidationError::IndexCountMismatch { count: effective, primitive });
    }
    Ok(())
}

fn check_indices(vertex_count: usize, indices: &[u16]) -> Result<(), ValidationError> {
    if vertex_count > MAX_INDEXED_VERTICES {
        return Err(ValidationError::TooManyVertices { vertex_count });
    }

    let mut min = u16::MAX;
    let mut max = 0u16;
    for (position, &index) in indices.iter().enumerate() {
        if index as usize >= vertex_count {
            return Err(ValidationError::IndexOutOfBounds { position, index, vertex_count });
        }
        min = min.min(index);
        max = max.max(index);
    }

    // Best-effort dead-vertex detection; holes in the middle are only caught
    // when there are fewer indices than vertices.
    let trailing = vertex_count - 1 - max as usize;
    if trailing > 0 {
        return Err(ValidationError::ObsoleteVertices(ObsoleteVertices::Trailing(trailing)));
    }
    if min > 0 {
        return Err(ValidationError::ObsoleteVertices(ObsoleteVertices::Leading(min as usize)));
    }
    if indices.len() < vertex_count {
        return Err(ValidationError::ObsoleteVertices(ObsoleteVertices::Holes {
            indices: indices.len(),
            vertices: vertex_count,
        }));
    }
    Ok(())
}

/// Checks a run against the vertex inputs of the shader registered under `key`.
///
/// Every geometry attribute must exist in the shader, every shader attribute
/// must be provided, and the shader-derived vertex size must match the data.
/// The last two checks are skipped for empty geometry. Vertex data that does
/// not divide evenly by `vertex_count` is rejected as well.
pub fn validate_against_shader<S: AsRef<str>>(
    key: &ShaderKey,
    resolver: &dyn ShaderResolver,
    vertex_count: usize,
    vertices: &[f32],
    attributes: &[S],
) -> Result<(), ShaderMismatchError> {
    let layout = resolver
        .resolve(key)
        .ok_or_else(|| ShaderMismatchError::UnknownShader(key.clone()))?;
    let mismatch = |reason| ShaderMismatchError::AttributeMismatch { shader: key.clone(), reason };

    if let Some(attr) = attribute_names(attributes).find(|a| layout.get(a).is_none()) {
        return Err(mismatch(AttributeMismatch::Unsupported { attribute: attr.to_owned() }));
    }

    if vertex_count == 0 {
        return Ok(());
    }

    if let Some((name, _)) = layout
        .iter()
        .find(|(name, _)| !attribute_names(attributes).any(|a| a == *name))
    {
        return Err(mismatch(AttributeMismatch::Missing { attribute: name.to_owned() }));
    }

    if vertices.len() % vertex_count != 0 {
        return Err(mismatch(AttributeMismatch::UnevenVertexData { vertex_count, floats: vertices.len() }));
    }
    let expected = layout.vertex_size(attributes);
    let actual = vertices.len() / vertex_count;
    if expected != actual {
        return Err(mismatch(AttributeMismatch::VertexSize { expected, actual }));
    }
    Ok(())
}

/// Runs both validation phases over an existing [`Geometry`].
pub fn validate_geometry(
    geometry: &Geometry,
    shader: Option<(&ShaderKey, &dyn ShaderResolver)>,
) -> Result<(), GeometryError> {
    validate(
        geometry.vertex_count(),
        geometry.vertices(),
        geometry.indices(),
        geometry.primitive(),
        geometry.attributes(),
    )?;
    if let Some((key, resolver)) = shader {
        validate_against_shader(
            key,
            resolver,
            geometry.vertex_count(),
            geometry.vertices(),
            geometry.attributes(),
        )?;
    }
    Ok(())
}
