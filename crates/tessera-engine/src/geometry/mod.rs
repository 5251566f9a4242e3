//! Geometry buffer model.
//!
//! Responsibilities:
//! - describe vertex memory (`layout`) and primitive assembly (`primitive`)
//! - validate raw vertex/index runs, optionally against a shader (`validate`)
//! - own and merge geometry runs (`container`)
//!
//! Every mutating operation is transactional: on error the container keeps
//! its previous contents untouched.

mod container;
mod error;
mod layout;
mod primitive;
mod validate;

pub use container::Geometry;
pub use error::{
    AttributeMismatch, GeometryError, IncompatibilityError, ObsoleteVertices, ShaderMismatchError,
    ValidationError,
};
pub use layout::{AttributeType, BufferLayout, ShaderLayout};
pub use primitive::PrimitiveType;
pub use validate::{validate, validate_against_shader, validate_geometry};

/// Largest vertex count addressable by 16-bit indices.
pub const MAX_INDEXED_VERTICES: usize = u16::MAX as usize;
