use std::collections::HashMap;
use std::fmt;

use crate::render::TextureKey;

/// Metrics of one glyph, in font pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Horizontal cursor advance.
    pub advance: i32,
    /// Top-left corner of the glyph box relative to the cursor on the baseline (+Y up).
    pub offset: [i32; 2],
    /// Top-left corner of the glyph in the atlas texture (+Y down).
    pub pos: [i32; 2],
    /// Width and height of the glyph box.
    pub size: [i32; 2],
}

/// Vertical font metrics, in font pixels. `descender` is usually negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LineMetrics {
    pub height: i32,
    pub ascender: i32,
    pub descender: i32,
}

/// Bitmap font description: metrics for each code point plus the atlas they live in.
///
/// Immutable once built; share it through `Arc<Font>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    style: String,
    size: u32,
    monospace: bool,
    line: LineMetrics,
    texture: TextureKey,
    texture_size: [u32; 2],
    glyphs: HashMap<char, Glyph>,
    avg_width: f32,
}

impl Font {
    pub fn builder(family: impl Into<String>, style: impl Into<String>, size: u32) -> FontBuilder {
        FontBuilder {
            family: family.into(),
            style: style.into(),
            size,
            line: LineMetrics::default(),
            texture: TextureKey::new(""),
            texture_size: [1, 1],
            glyphs: HashMap::new(),
        }
    }

    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    pub fn style(&self) -> &str {
        &self.style
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// True when every glyph has the same advance.
    #[inline]
    pub fn is_monospace(&self) -> bool {
        self.monospace
    }

    #[inline]
    pub fn line_metrics(&self) -> LineMetrics {
        self.line
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.line.height
    }

    #[inline]
    pub fn ascender(&self) -> i32 {
        self.line.ascender
    }

    #[inline]
    pub fn descender(&self) -> i32 {
        self.line.descender
    }

    #[inline]
    pub fn texture(&self) -> &TextureKey {
        &self.texture
    }

    #[inline]
    pub fn texture_size(&self) -> [u32; 2] {
        self.texture_size
    }

    #[inline]
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Mean advance over all glyphs; used as the width of one tab column.
    #[inline]
    pub fn avg_width(&self) -> f32 {
        self.avg_width
    }

    /// Normalized (top-left, bottom-right) texture coordinates of `ch`.
    pub fn tex_coord(&self, ch: char) -> Option<([f32; 2], [f32; 2])> {
        self.glyph(ch).map(|g| self.glyph_tex_coord(g))
    }

    pub(crate) fn glyph_tex_coord(&self, g: &Glyph) -> ([f32; 2], [f32; 2]) {
        let w = self.texture_size[0] as f32;
        let h = self.texture_size[1] as f32;
        (
            [g.pos[0] as f32 / w, g.pos[1] as f32 / h],
            [(g.pos[0] + g.size[0]) as f32 / w, (g.pos[1] + g.size[1]) as f32 / h],
        )
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, self.style, self.size)
    }
}

/// Collects font data; see [`Font::builder`].
#[derive(Debug, Clone)]
pub struct FontBuilder {
    family: String,
    style: String,
    size: u32,
    line: LineMetrics,
    texture: TextureKey,
    texture_size: [u32; 2],
    glyphs: HashMap<char, Glyph>,
}

impl FontBuilder {
    pub fn line_metrics(mut self, line: LineMetrics) -> Self {
        self.line = line;
        self
    }

    pub fn texture(mut self, key: TextureKey, width: u32, height: u32) -> Self {
        self.texture = key;
        self.texture_size = [width.max(1), height.max(1)];
        self
    }

    pub fn glyph(mut self, ch: char, glyph: Glyph) -> Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    pub fn glyphs(mut self, glyphs: impl IntoIterator<Item = (char, Glyph)>) -> Self {
        self.glyphs.extend(glyphs);
        self
    }

    pub fn build(self) -> Font {
        let mut line = self.line;
        if line.height <= 0 {
            log::warn!(
                "Font {} {} {}: non-positive line height {}, using 1",
                self.family, self.style, self.size, line.height
            );
            line.height = 1;
        }

        let mut advances = self.glyphs.values().map(|g| g.advance);
        let monospace = match advances.next() {
            Some(first) => advances.all(|a| a == first),
            None => true,
        };
        let avg_width = if self.glyphs.is_empty() {
            0.0
        } else {
            self.glyphs.values().map(|g| g.advance as f32).sum::<f32>() / self.glyphs.len() as f32
        };

        Font {
            family: self.family,
            style: self.style,
            size: self.size,
            monospace,
            line,
            texture: self.texture,
            texture_size: self.texture_size,
            glyphs: self.glyphs,
            avg_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(advance: i32) -> Glyph {
        Glyph { advance, offset: [0, 10], pos: [0, 0], size: [advance, 10] }
    }

    #[test]
    fn monospace_and_average_width() {
        let mono = Font::builder("Mono", "Regular", 12).glyph('a', glyph(8)).glyph('b', glyph(8)).build();
        assert!(mono.is_monospace());
        assert_eq!(mono.avg_width(), 8.0);

        let prop = Font::builder("Sans", "Regular", 12).glyph('i', glyph(4)).glyph('m', glyph(12)).build();
        assert!(!prop.is_monospace());
        assert_eq!(prop.avg_width(), 8.0);
    }

    #[test]
    fn tex_coords_are_normalized() {
        let f = Font::builder("Sans", "Regular", 12)
            .texture(TextureKey::new("atlas"), 100, 50)
            .glyph('x', Glyph { advance: 10, offset: [0, 10], pos: [10, 5], size: [20, 10] })
            .build();
        assert_eq!(f.tex_coord('x'), Some(([0.1, 0.1], [0.3, 0.3])));
        assert_eq!(f.tex_coord('y'), None);
    }

    #[test]
    fn zero_height_is_clamped() {
        let f = Font::builder("Sans", "Regular", 12).build();
        assert_eq!(f.height(), 1);
        assert_eq!(f.avg_width(), 0.0);
        assert_eq!(f.to_string(), "Sans Regular 12");
    }
}
