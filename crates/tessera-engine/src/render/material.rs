use std::collections::HashMap;
use std::fmt;

use crate::paint::Color;
use crate::shader::ShaderKey;

/// Opaque key of a texture owned by the draw sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey(String);

impl TextureKey {
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shader program plus the bindings it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    shader: ShaderKey,
    textures: Vec<(String, TextureKey)>,
    uniforms: HashMap<String, [f32; 4]>,
}

impl Material {
    pub fn new(shader: ShaderKey) -> Self {
        Self {
            shader,
            textures: Vec::new(),
            uniforms: HashMap::new(),
        }
    }

    #[inline]
    pub fn shader(&self) -> &ShaderKey {
        &self.shader
    }

    /// Binds `texture` to the sampler `name`, replacing an earlier binding.
    pub fn add_texture_binding(&mut self, name: impl Into<String>, texture: TextureKey) {
        let name = name.into();
        match self.textures.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = texture,
            None => self.textures.push((name, texture)),
        }
    }

    #[inline]
    pub fn textures(&self) -> &[(String, TextureKey)] {
        &self.textures
    }

    pub fn texture(&self, name: &str) -> Option<&TextureKey> {
        self.textures.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn set_uniform4(&mut self, name: impl Into<String>, value: [f32; 4]) {
        self.uniforms.insert(name.into(), value);
    }

    #[inline]
    pub fn set_uniform4_color(&mut self, name: impl Into<String>, color: Color) {
        self.set_uniform4(name, color.to_array());
    }

    #[inline]
    pub fn uniform4(&self, name: &str) -> Option<[f32; 4]> {
        self.uniforms.get(name).copied()
    }
}
