use super::layout::attribute_names;
use super::validate::{validate, vertex_size};
use super::{
    BufferLayout, GeometryError, IncompatibilityError, PrimitiveType, ValidationError,
    MAX_INDEXED_VERTICES,
};

/// Owned vertex/index data plus the description needed to draw it.
///
/// Invariants (checked by [`validate`] on every mutation):
/// - `vertices.len() == vertex_count * vertex_size`
/// - non-empty geometry has attributes, and at least one float per attribute
/// - indices, when present, reference every vertex and nothing beyond
/// - the index (or vertex) count forms whole primitives
///
/// The container takes ownership of the arrays handed to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    vertex_count: usize,
    vertices: Vec<f32>,
    indices: Option<Vec<u16>>,
    primitive: PrimitiveType,
    attributes: Vec<String>,
    layout: BufferLayout,
}

impl Geometry {
    /// Same as `Geometry::default()` followed by [`set`](Self::set).
    pub fn new<S: AsRef<str>>(
        vertex_count: usize,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        primitive: PrimitiveType,
        attributes: &[S],
        layout: BufferLayout,
    ) -> Result<Self, GeometryError> {
        let mut g = Self::default();
        g.set(vertex_count, vertices, indices, primitive, attributes, layout)?;
        Ok(g)
    }

    /// Replaces the whole geometry. On error the previous contents are kept.
    pub fn set<S: AsRef<str>>(
        &mut self,
        vertex_count: usize,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        primitive: PrimitiveType,
        attributes: &[S],
        layout: BufferLayout,
    ) -> Result<(), GeometryError> {
        let indices = indices.filter(|i| !i.is_empty());
        validate(vertex_count, &vertices, indices.as_deref(), primitive, attributes).inspect_err(|e| {
            log::debug!("Geometry::set rejected: {e}");
        })?;

        self.vertex_count = vertex_count;
        self.vertices = vertices;
        self.indices = indices;
        self.primitive = primitive;
        self.attributes = attribute_names(attributes).map(str::to_owned).collect();
        self.layout = layout;

        log::debug!(
            "Geometry::set: {} vertices, {} indices, {}",
            self.vertex_count,
            self.index_count(),
            self.primitive
        );
        Ok(())
    }

    /// Merges a run onto the end of this geometry.
    ///
    /// Empty geometry is simply replaced. Otherwise both sides must agree on
    /// primitive type, attribute list (order-sensitive), vertex size and
    /// indexed-ness, and multi-attribute runs must be interleaved.
    ///
    /// Triangle strips are joined with degenerate triangles so the result
    /// stays one strip with consistent winding. A zero-vertex run must still
    /// be compatible (indexed-ness aside, as it carries no indices) and is
    /// then a no-op.
    ///
    /// Nothing is modified unless every check passes.
    pub fn append<S: AsRef<str>>(
        &mut self,
        vertex_count: usize,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        primitive: PrimitiveType,
        attributes: &[S],
        layout: BufferLayout,
    ) -> Result<&mut Self, GeometryError> {
        if self.vertex_count == 0 {
            self.set(vertex_count, vertices, indices, primitive, attributes, layout)?;
            return Ok(self);
        }

        let indices = indices.filter(|i| !i.is_empty());
        validate(vertex_count, &vertices, indices.as_deref(), primitive, attributes)
            .map_err(GeometryError::from)
            .and_then(|()| {
                self.check_appendable(vertex_count, &vertices, indices.is_some(), primitive, attributes, layout)
            })
            .inspect_err(|e| log::debug!("Geometry::append rejected: {e}"))?;
        if vertex_count == 0 {
            return Ok(self);
        }

        let base = self.vertex_count;

        if primitive == PrimitiveType::TriangleStrip {
            match indices.as_deref() {
                Some(incoming) => self.stitch_strip_indices(incoming),
                None => self.stitch_strip_vertices(&vertices),
            }
        }

        // Real data follows any stitching; indices are offset past the
        // vertices that were already present.
        let offset = self.vertex_count as u16;
        self.vertices.extend_from_slice(&vertices);
        if let (Some(existing), Some(incoming)) = (self.indices.as_mut(), indices) {
            existing.extend(incoming.into_iter().map(|i| i + offset));
        }
        self.vertex_count += vertex_count;

        log::trace!(
            "Geometry::append: {} + {} -> {} vertices ({})",
            base,
            vertex_count,
            self.vertex_count,
            self.primitive
        );
        Ok(self)
    }

    /// [`append`](Self::append) with the contents of another geometry.
    pub fn append_geometry(&mut self, other: &Geometry) -> Result<&mut Self, GeometryError> {
        self.append(
            other.vertex_count,
            other.vertices.clone(),
            other.indices.clone(),
            other.primitive,
            &other.attributes,
            other.layout,
        )
    }

    /// Drops all data. Primitive type and layout reset to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn check_appendable<S: AsRef<str>>(
        &self,
        vertex_count: usize,
        vertices: &[f32],
        indexed: bool,
        primitive: PrimitiveType,
        attributes: &[S],
        layout: BufferLayout,
    ) -> Result<(), GeometryError> {
        if self.primitive != primitive {
            return Err(IncompatibilityError::PrimitiveType {
                existing: self.primitive,
                incoming: primitive,
            }
            .into());
        }
        if !self.attributes.iter().map(String::as_str).eq(attribute_names(attributes)) {
            return Err(IncompatibilityError::Attributes {
                existing: self.attributes.clone(),
                incoming: attribute_names(attributes).map(str::to_owned).collect(),
            }
            .into());
        }
        // +2 reserves room for the degenerate strip join.
        let combined = self.vertex_count + vertex_count + 2;
        if combined > MAX_INDEXED_VERTICES {
            return Err(IncompatibilityError::TooManyVertices { combined }.into());
        }
        if vertex_count > 0 && self.indices.is_some() != indexed {
            return Err(IncompatibilityError::Indexing { existing_indexed: self.indices.is_some() }.into());
        }
        if attributes.len() > 1
            && (self.layout != layout || layout != BufferLayout::Interleaved)
        {
            return Err(IncompatibilityError::BufferLayout { existing: self.layout, incoming: layout }.into());
        }
        if !primitive.is_appendable() {
            return Err(ValidationError::UnsupportedPrimitiveType(primitive).into());
        }
        if vertex_count == 0 {
            return Ok(());
        }
        let existing = self.vertex_size();
        let incoming = vertices.len() / vertex_count;
        if existing != incoming {
            return Err(IncompatibilityError::VertexSize { existing, incoming }.into());
        }
        Ok(())
    }

    /// Degenerate join for non-indexed strips.
    ///
    /// Repeats the last existing vertex and the first incoming one (the
    /// latter twice if the existing count is odd) so the incoming strip
    /// starts on an even position and keeps its winding.
    fn stitch_strip_vertices(&mut self, incoming: &[f32]) {
        let size = self.vertex_size();
        let odd = self.vertex_count % 2 != 0;
        let last_start = self.vertices.len() - size;
        self.vertices.extend_from_within(last_start..);
        self.vertices.extend_from_slice(&incoming[..size]);
        if odd {
            self.vertices.extend_from_slice(&incoming[..size]);
        }
        self.vertex_count += 2 + usize::from(odd);
    }

    /// Degenerate join for indexed strips. Same pattern as
    /// [`stitch_strip_vertices`](Self::stitch_strip_vertices) on indices;
    /// parity follows the existing index count and no vertices are added.
    fn stitch_strip_indices(&mut self, incoming: &[u16]) {
        let base = self.vertex_count as u16;
        let Some(existing) = self.indices.as_mut() else {
            return;
        };
        let (Some(&last), Some(&first)) = (existing.last(), incoming.first()) else {
            return;
        };
        let first = first + base;
        let odd = existing.len() % 2 != 0;
        existing.extend([last, first]);
        if odd {
            existing.push(first);
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[inline]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    #[inline]
    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Floats per vertex (0 for empty geometry).
    #[inline]
    pub fn vertex_size(&self) -> usize {
        vertex_size(self.vertex_count, self.vertices.len()).unwrap_or(0)
    }

    /// Number of indices the draw call consumes: the index count when
    /// indexed, the vertex count otherwise.
    #[inline]
    pub fn index_count(&self) -> usize {
        match self.indices.as_deref() {
            Some(i) if !i.is_empty() => i.len(),
            _ => self.vertex_count,
        }
    }
}
