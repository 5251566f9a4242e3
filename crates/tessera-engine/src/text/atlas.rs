use crate::render::TextureKey;

use super::font::{Font, Glyph, LineMetrics};

/// Parameters for [`bake_font`].
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    pub family: String,
    pub style: String,
    /// Rasterization size in pixels per em.
    pub px_size: f32,
    /// Width and height of the square atlas.
    pub atlas_size: u32,
    /// Empty pixels between packed glyphs.
    pub padding: u32,
    pub charset: Vec<char>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            style: "Regular".to_string(),
            px_size: 32.0,
            atlas_size: 1024,
            padding: 1,
            charset: (' '..='~').collect(),
        }
    }
}

impl AtlasConfig {
    pub fn with_name(mut self, family: impl Into<String>, style: impl Into<String>) -> Self {
        self.family = family.into();
        self.style = style.into();
        self
    }

    pub fn with_px_size(mut self, px_size: f32) -> Self {
        self.px_size = px_size;
        self
    }

    pub fn with_atlas_size(mut self, atlas_size: u32) -> Self {
        self.atlas_size = atlas_size;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_charset(mut self, charset: impl IntoIterator<Item = char>) -> Self {
        self.charset = charset.into_iter().collect();
        self
    }
}

/// Single-channel (R8) coverage image backing a baked font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl AtlasImage {
    fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize] }
    }

    fn blit(&mut self, x: u32, y: u32, w: usize, bitmap: &[u8]) {
        if w == 0 {
            return;
        }
        for (row, src) in bitmap.chunks_exact(w).enumerate() {
            let start = (y as usize + row) * self.width as usize + x as usize;
            self.pixels[start..start + w].copy_from_slice(src);
        }
    }
}

/// Error returned by [`bake_font`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Row-based glyph packer: fills left to right, opens a new shelf when a row is full.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32, padding: u32) -> Self {
        Self { size, padding, cursor_x: padding, cursor_y: padding, row_height: 0, full: false }
    }

    fn place(&mut self, w: u32, h: u32) -> Option<[u32; 2]> {
        if self.full || w + 2 * self.padding > self.size {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_y + h + self.padding > self.size {
            self.full = true;
            return None;
        }

        let at = [self.cursor_x, self.cursor_y];
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

/// Parses a TrueType/OpenType font and rasterizes `config.charset` into a glyph atlas.
///
/// Characters the font has no outline for are left out of the result. Glyphs
/// that no longer fit in the atlas are skipped with a warning.
pub fn bake_font(
    bytes: &[u8],
    config: &AtlasConfig,
    texture: TextureKey,
) -> Result<(Font, AtlasImage), FontLoadError> {
    if !(config.px_size.is_finite() && config.px_size > 0.0) {
        return Err(FontLoadError(format!("invalid pixel size {}", config.px_size)));
    }
    if config.atlas_size == 0 {
        return Err(FontLoadError("atlas size must be non-zero".to_string()));
    }

    let settings = fontdue::FontSettings { scale: config.px_size, ..fontdue::FontSettings::default() };
    let source = fontdue::Font::from_bytes(bytes, settings).map_err(|e| FontLoadError(e.to_string()))?;

    let line = match source.horizontal_line_metrics(config.px_size) {
        Some(m) => LineMetrics {
            height: m.new_line_size.round() as i32,
            ascender: m.ascent.round() as i32,
            descender: m.descent.round() as i32,
        },
        None => {
            log::warn!("bake_font: {} has no horizontal metrics, deriving from size", config.family);
            let px = config.px_size.round() as i32;
            LineMetrics { height: px, ascender: px * 4 / 5, descender: -(px / 5) }
        }
    };

    let mut image = AtlasImage::new(config.atlas_size, config.atlas_size);
    let mut packer = ShelfPacker::new(config.atlas_size, config.padding);
    let mut glyphs = Vec::with_capacity(config.charset.len());
    let mut skipped = 0usize;

    for &ch in &config.charset {
        if ch != ' ' && source.lookup_glyph_index(ch) == 0 {
            log::debug!("bake_font: {} has no glyph for {ch:?}", config.family);
            continue;
        }

        let (metrics, bitmap) = source.rasterize(ch, config.px_size);
        let (w, h) = (metrics.width as u32, metrics.height as u32);

        let pos = if w == 0 || h == 0 {
            [0, 0]
        } else {
            match packer.place(w, h) {
                Some(at) => {
                    image.blit(at[0], at[1], metrics.width, &bitmap);
                    at
                }
                None => {
                    skipped += 1;
                    continue;
                }
            }
        };

        glyphs.push((
            ch,
            Glyph {
                advance: metrics.advance_width.round() as i32,
                offset: [metrics.xmin, metrics.ymin + metrics.height as i32],
                pos: [pos[0] as i32, pos[1] as i32],
                size: [w as i32, h as i32],
            },
        ));
    }

    if skipped > 0 {
        log::warn!(
            "bake_font: glyph atlas is full ({0}×{0}); {skipped} glyphs will not be rendered",
            config.atlas_size
        );
    }

    let font = Font::builder(config.family.clone(), config.style.clone(), config.px_size.round() as u32)
        .line_metrics(line)
        .texture(texture, image.width, image.height)
        .glyphs(glyphs)
        .build();

    log::debug!("bake_font: {font}: {} glyphs", font.glyph_count());
    Ok((font, image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_then_opens_a_shelf() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(6, 4), Some([1, 1]));
        assert_eq!(p.place(6, 2), Some([8, 1]));
        // 15 + 6 + 1 > 16: next shelf below the tallest glyph of the row
        assert_eq!(p.place(6, 3), Some([1, 6]));
    }

    #[test]
    fn packer_reports_full() {
        let mut p = ShelfPacker::new(8, 1);
        assert_eq!(p.place(6, 6), Some([1, 1]));
        assert_eq!(p.place(6, 6), None);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn packer_rejects_oversized_glyph() {
        let mut p = ShelfPacker::new(8, 1);
        assert_eq!(p.place(7, 1), None);
        assert_eq!(p.place(2, 2), Some([1, 1]));
    }

    #[test]
    fn blit_copies_rows() {
        let mut img = AtlasImage::new(4, 3);
        img.blit(1, 1, 2, &[1, 2, 3, 4]);
        assert_eq!(img.pixels, vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0]);
    }

    #[test]
    fn default_charset_is_printable_ascii() {
        let cfg = AtlasConfig::default();
        assert_eq!(cfg.charset.len(), 95);
        assert_eq!(cfg.charset.first(), Some(&' '));
        assert_eq!(cfg.charset.last(), Some(&'~'));
    }

    #[test]
    fn rejects_invalid_input() {
        let err = bake_font(b"not a font", &AtlasConfig::default(), TextureKey::new("atlas")).unwrap_err();
        assert!(err.to_string().starts_with("font load error"));

        let cfg = AtlasConfig::default().with_px_size(0.0);
        assert!(bake_font(&[], &cfg, TextureKey::new("atlas")).is_err());
    }
}
