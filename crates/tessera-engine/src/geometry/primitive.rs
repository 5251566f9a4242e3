use std::fmt;

/// How a draw call assembles vertices (or indices) into primitives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Points,
        PrimitiveType::Lines,
        PrimitiveType::LineStrip,
        PrimitiveType::LineLoop,
        PrimitiveType::Triangles,
        PrimitiveType::TriangleStrip,
        PrimitiveType::TriangleFan,
    ];

    /// Whether `count` indices (or vertices, for non-indexed runs) form whole primitives.
    ///
    /// Strips and fans need at least two entries once they are non-empty.
    pub fn accepts_index_count(self, count: usize) -> bool {
        match self {
            PrimitiveType::Points | PrimitiveType::LineLoop => true,
            PrimitiveType::Lines => count % 2 == 0,
            PrimitiveType::Triangles => count % 3 == 0,
            PrimitiveType::LineStrip | PrimitiveType::TriangleStrip | PrimitiveType::TriangleFan => {
                count == 0 || count >= 2
            }
        }
    }

    /// Primitive types that [`Geometry::append`](super::Geometry::append) can merge.
    #[inline]
    pub fn is_appendable(self) -> bool {
        matches!(
            self,
            PrimitiveType::Points
                | PrimitiveType::Lines
                | PrimitiveType::Triangles
                | PrimitiveType::TriangleStrip
        )
    }

    /// Matching wgpu topology. Loops and fans have no wgpu equivalent.
    pub fn topology(self) -> Option<wgpu::PrimitiveTopology> {
        match self {
            PrimitiveType::Points => Some(wgpu::PrimitiveTopology::PointList),
            PrimitiveType::Lines => Some(wgpu::PrimitiveTopology::LineList),
            PrimitiveType::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
            PrimitiveType::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
            PrimitiveType::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
            PrimitiveType::LineLoop | PrimitiveType::TriangleFan => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Points => "points",
            PrimitiveType::Lines => "lines",
            PrimitiveType::LineStrip => "line strip",
            PrimitiveType::LineLoop => "line loop",
            PrimitiveType::Triangles => "triangles",
            PrimitiveType::TriangleStrip => "triangle strip",
            PrimitiveType::TriangleFan => "triangle fan",
        };
        f.write_str(name)
    }
}
