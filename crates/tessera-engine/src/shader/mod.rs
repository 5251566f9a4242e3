//! Shader resolution.
//!
//! Geometry validation only needs to know which vertex inputs a shader
//! declares. Program compilation and uniform binding belong to the draw sink.
//! Lookups go through an injected [`ShaderResolver`] rather than global state.

mod library;

pub use library::{builtin, ShaderLibrary};

use std::fmt;

pub use crate::geometry::ShaderLayout;

/// Opaque key a shader program is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderKey(String);

impl ShaderKey {
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShaderKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Looks up the vertex layout of a loaded shader program.
pub trait ShaderResolver {
    /// `None` if no program is loaded under `key`.
    fn resolve(&self, key: &ShaderKey) -> Option<&ShaderLayout>;
}
