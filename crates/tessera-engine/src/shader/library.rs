use std::collections::HashMap;

use super::{ShaderKey, ShaderLayout, ShaderResolver};
use crate::geometry::AttributeType;

/// Keys and layouts of the programs every renderer is expected to provide.
pub mod builtin {
    use super::{AttributeType, ShaderKey, ShaderLayout};

    /// Solid colour, 2D positions. Uniform: `color`.
    pub const COL_2D: &str = "col_2d";
    /// Textured and tinted, 2D positions. Uniform: `color`; texture: `sampler`.
    pub const COL_TEX_2D: &str = "col_tex_2d";

    pub fn col_2d() -> (ShaderKey, ShaderLayout) {
        (
            ShaderKey::new(COL_2D),
            ShaderLayout::new().with_attribute("position", AttributeType::Vec2),
        )
    }

    pub fn col_tex_2d() -> (ShaderKey, ShaderLayout) {
        (
            ShaderKey::new(COL_TEX_2D),
            ShaderLayout::new()
                .with_attribute("position", AttributeType::Vec2)
                .with_attribute("texCoord", AttributeType::Vec2),
        )
    }
}

/// In-memory shader registry.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    layouts: HashMap<ShaderKey, ShaderLayout>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library preloaded with the [`builtin`] programs.
    pub fn with_builtins() -> Self {
        let mut lib = Self::new();
        for (key, layout) in [builtin::col_2d(), builtin::col_tex_2d()] {
            lib.register(key, layout);
        }
        lib
    }

    /// Registers `layout` under `key`, returning the layout it replaced.
    pub fn register(&mut self, key: ShaderKey, layout: ShaderLayout) -> Option<ShaderLayout> {
        let previous = self.layouts.insert(key.clone(), layout);
        if previous.is_some() {
            log::debug!("ShaderLibrary: replaced layout for {key}");
        }
        previous
    }

    pub fn unregister(&mut self, key: &ShaderKey) -> Option<ShaderLayout> {
        self.layouts.remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl ShaderResolver for ShaderLibrary {
    fn resolve(&self, key: &ShaderKey) -> Option<&ShaderLayout> {
        self.layouts.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve() {
        let lib = ShaderLibrary::with_builtins();
        assert_eq!(lib.len(), 2);
        let tex = lib.resolve(&ShaderKey::new(builtin::COL_TEX_2D)).unwrap();
        assert_eq!(tex.vertex_size(&["position", "texCoord"]), 4);
        assert!(lib.resolve(&ShaderKey::new("nope")).is_none());
    }

    #[test]
    fn register_replaces_and_unregister_removes() {
        let mut lib = ShaderLibrary::with_builtins();
        let key = ShaderKey::new(builtin::COL_2D);
        let old = lib.register(key.clone(), ShaderLayout::new().with_attribute("position", AttributeType::Vec3));
        assert!(old.is_some());
        assert_eq!(lib.resolve(&key).unwrap().get("position"), Some(AttributeType::Vec3));
        assert!(lib.unregister(&key).is_some());
        assert!(lib.resolve(&key).is_none());
    }
}
