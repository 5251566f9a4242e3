use std::fmt;
use std::sync::Arc;

use crate::coords::{Bounds, Transform};
use crate::geometry::{BufferLayout, GeometryError, PrimitiveType};
use crate::paint::Color;
use crate::render::{Material, Mesh, MeshSink, RenderState};
use crate::shader::{builtin, ShaderKey, ShaderResolver};
use crate::text::{layout_text, Font, TEXT_ATTRIBUTES};

/// Tab stop width, in average glyph widths.
pub const DEFAULT_TAB_WIDTH: u32 = 4;

const SAMPLER: &str = "sampler";
const COLOR: &str = "color";

/// A run of text drawn with a baked font.
///
/// One line of text is one unit tall in model space; scale it with
/// [`Text::transform_mut`]. Every setter that affects layout regenerates the
/// mesh immediately. A rejected regeneration leaves the component unchanged.
pub struct Text {
    transform: Transform,
    font: Arc<Font>,
    tab_width: u32,
    text: String,
    bounds: Bounds,
    color: Color,
    mesh: Mesh,
}

impl Text {
    pub fn new(
        font: Arc<Font>,
        text: impl Into<String>,
        shaders: Arc<dyn ShaderResolver>,
    ) -> Result<Self, GeometryError> {
        let text = text.into();
        let color = Color::WHITE;

        let mut material = Material::new(ShaderKey::new(builtin::COL_TEX_2D));
        material.add_texture_binding(SAMPLER, font.texture().clone());
        material.set_uniform4_color(COLOR, color);

        let mut mesh = Mesh::new(material, shaders);
        let bounds = Self::regenerate(&mut mesh, &font, &text, DEFAULT_TAB_WIDTH)?;

        Ok(Self {
            transform: Transform::IDENTITY,
            font,
            tab_width: DEFAULT_TAB_WIDTH,
            text,
            bounds,
            color,
            mesh,
        })
    }

    fn regenerate(mesh: &mut Mesh, font: &Font, text: &str, tab_width: u32) -> Result<Bounds, GeometryError> {
        let out = layout_text(font, text, tab_width);
        for miss in &out.missing {
            log::warn!("Text: {font}: {miss}");
        }

        mesh.set_vertex_data(
            out.vertex_count,
            out.vertices,
            Some(out.indices),
            PrimitiveType::Triangles,
            &TEXT_ATTRIBUTES,
            BufferLayout::Interleaved,
        )?;
        log::trace!("Text: {} quads for {:?}", out.vertex_count / 4, text);
        Ok(out.bounds)
    }

    /// Replaces the string.
    pub fn set(&mut self, text: impl Into<String>) -> Result<(), GeometryError> {
        let text = text.into();
        self.bounds = Self::regenerate(&mut self.mesh, &self.font, &text, self.tab_width)?;
        self.text = text;
        Ok(())
    }

    #[inline]
    pub fn get(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn font(&self) -> &Arc<Font> {
        &self.font
    }

    /// Switches fonts and rebinds the atlas texture.
    pub fn set_font(&mut self, font: Arc<Font>) -> Result<(), GeometryError> {
        self.bounds = Self::regenerate(&mut self.mesh, &font, &self.text, self.tab_width)?;
        self.mesh.material_mut().add_texture_binding(SAMPLER, font.texture().clone());
        self.font = font;
        Ok(())
    }

    #[inline]
    pub fn tab_width(&self) -> u32 {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: u32) -> Result<(), GeometryError> {
        self.bounds = Self::regenerate(&mut self.mesh, &self.font, &self.text, tab_width)?;
        self.tab_width = tab_width;
        Ok(())
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.mesh.material_mut().set_uniform4_color(COLOR, color);
    }

    /// Model-space extent: first line's ascender down to the last line's descender.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Font pixels to model units.
    #[inline]
    pub fn font_scaling(&self) -> f32 {
        1.0 / self.font.height() as f32
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn draw(&self, state: &mut RenderState, sink: &mut dyn MeshSink) {
        state.transform_stack.push_mul_right(self.transform.matrix());
        self.mesh.draw(state, sink);
        state.transform_stack.pop();
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.text)
            .field("font", &format_args!("{}", self.font))
            .field("tab_width", &self.tab_width)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.text, self.font)
    }
}
