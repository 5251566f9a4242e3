use bytemuck::{Pod, Zeroable};

use crate::coords::{Bounds, Vec2};
use crate::geometry::MAX_INDEXED_VERTICES;

use super::font::Font;

/// Attribute names of a text vertex, in interleaved order.
pub const TEXT_ATTRIBUTES: [&str; 2] = ["position", "texCoord"];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];
const MAX_QUADS: usize = MAX_INDEXED_VERTICES / 4;

/// One interleaved text vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

/// A code point the font has no glyph for. Recovered locally: the character is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no glyph for {ch:?} at character {position}")]
pub struct GlyphMiss {
    pub ch: char,
    /// Index of the character within the laid-out string.
    pub position: usize,
}

/// Output of [`layout_text`]: an indexed triangle list of textured quads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMesh {
    pub vertex_count: usize,
    /// Interleaved `x, y, u, v`.
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    pub bounds: Bounds,
    pub missing: Vec<GlyphMiss>,
}

impl TextMesh {
    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertex_count / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Lays `text` out as one quad per glyph, one line of text per output unit.
///
/// The first line sits on `y = 0` and later lines descend. `\r` is ignored,
/// `\t` advances by `tab_width` average glyph widths. Characters without a
/// glyph emit nothing and do not move the cursor; they are reported in
/// [`TextMesh::missing`].
pub fn layout_text(font: &Font, text: &str, tab_width: u32) -> TextMesh {
    let scale = 1.0 / font.height() as f32;
    let line_height = font.height() as f32 * scale;
    let tab_advance = tab_width as f32 * font.avg_width() * scale;

    let capacity = text.len().min(MAX_QUADS);
    let mut vertices: Vec<TextVertex> = Vec::with_capacity(capacity * 4);
    let mut indices: Vec<u16> = Vec::with_capacity(capacity * 6);
    let mut missing = Vec::new();

    let mut cursor = 0.0_f32;
    let mut baseline = 0.0_f32;
    let mut max_width = 0.0_f32;
    let mut truncated = false;

    for (position, ch) in text.chars().enumerate() {
        match ch {
            '\r' => {}
            '\n' => {
                max_width = max_width.max(cursor);
                cursor = 0.0;
                baseline -= line_height;
            }
            '\t' => cursor += tab_advance,
            _ => {
                let Some(glyph) = font.glyph(ch) else {
                    missing.push(GlyphMiss { ch, position });
                    continue;
                };
                if vertices.len() / 4 >= MAX_QUADS {
                    truncated = true;
                    break;
                }

                let (tl, br) = font.glyph_tex_coord(glyph);
                let xl = cursor + glyph.offset[0] as f32 * scale;
                let xr = xl + glyph.size[0] as f32 * scale;
                let yt = baseline + glyph.offset[1] as f32 * scale;
                let yb = yt - glyph.size[1] as f32 * scale;

                let base = vertices.len() as u16;
                vertices.extend_from_slice(&[
                    TextVertex { position: [xl, yb], tex_coord: [tl[0], br[1]] },
                    TextVertex { position: [xr, yb], tex_coord: [br[0], br[1]] },
                    TextVertex { position: [xr, yt], tex_coord: [br[0], tl[1]] },
                    TextVertex { position: [xl, yt], tex_coord: [tl[0], tl[1]] },
                ]);
                indices.extend(QUAD_INDICES.iter().map(|i| base + i));

                cursor += glyph.advance as f32 * scale;
            }
        }
    }
    max_width = max_width.max(cursor);

    if truncated {
        log::warn!(
            "layout_text: {font}: text exceeds {MAX_QUADS} glyphs, remainder dropped"
        );
    }

    let bounds = Bounds::new(
        Vec2::new(0.0, baseline + font.descender() as f32 * scale),
        Vec2::new(max_width, font.ascender() as f32 * scale),
    );

    TextMesh {
        vertex_count: vertices.len(),
        vertices: bytemuck::cast_slice(&vertices).to_vec(),
        indices,
        bounds,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureKey;
    use crate::text::{Glyph, LineMetrics};

    fn font() -> Font {
        let glyph = |i: i32| Glyph { advance: 10, offset: [0, 15], pos: [i * 10, 0], size: [10, 20] };
        Font::builder("Test", "Regular", 20)
            .line_metrics(LineMetrics { height: 20, ascender: 15, descender: -5 })
            .texture(TextureKey::new("atlas"), 40, 20)
            .glyph('A', glyph(0))
            .glyph('B', glyph(1))
            .glyph('C', glyph(2))
            .build()
    }

    fn quad_x(mesh: &TextMesh, quad: usize) -> f32 {
        mesh.vertices[quad * 16]
    }

    fn quad_top(mesh: &TextMesh, quad: usize) -> f32 {
        mesh.vertices[quad * 16 + 9]
    }

    #[test]
    fn two_lines() {
        let mesh = layout_text(&font(), "AB\nC", 4);
        assert_eq!(mesh.vertex_count, 12);
        assert_eq!(mesh.vertices.len(), 48);
        assert_eq!(mesh.indices.len(), 18);
        assert!(mesh.missing.is_empty());

        assert_eq!(quad_x(&mesh, 0), 0.0);
        assert_eq!(quad_x(&mesh, 1), 0.5);
        // cursor reset, baseline one line down
        assert_eq!(quad_x(&mesh, 2), 0.0);
        assert_eq!(quad_top(&mesh, 2), -1.0 + 0.75);

        assert_eq!(mesh.bounds.max.x, 1.0);
        assert_eq!(mesh.bounds.max.y, 0.75);
        assert_eq!(mesh.bounds.min, Vec2::new(0.0, -1.25));
    }

    #[test]
    fn quad_winding_and_tex_coords() {
        let mesh = layout_text(&font(), "B", 4);
        assert_eq!(
            mesh.vertices,
            vec![
                0.0, -0.25, 0.25, 1.0, //
                0.5, -0.25, 0.5, 1.0, //
                0.5, 0.75, 0.5, 0.0, //
                0.0, 0.75, 0.25, 0.0,
            ]
        );
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn missing_glyph_is_skipped_without_advance() {
        let mesh = layout_text(&font(), "AxB", 4);
        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(mesh.missing, vec![GlyphMiss { ch: 'x', position: 1 }]);
        assert_eq!(quad_x(&mesh, 1), 0.5);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn tab_and_carriage_return() {
        let mesh = layout_text(&font(), "\tA\r", 2);
        assert_eq!(mesh.quad_count(), 1);
        assert_eq!(quad_x(&mesh, 0), 1.0);
        assert_eq!(mesh.bounds.max.x, 1.5);

        let crlf = layout_text(&font(), "A\r\nB", 4);
        assert_eq!(crlf.quad_count(), 2);
        assert_eq!(quad_x(&crlf, 1), 0.0);
    }

    #[test]
    fn widest_line_wins() {
        let mesh = layout_text(&font(), "A\nABC", 4);
        assert_eq!(mesh.bounds.max.x, 1.5);
        let mesh = layout_text(&font(), "ABC\nA", 4);
        assert_eq!(mesh.bounds.max.x, 1.5);
    }

    #[test]
    fn empty_text() {
        let mesh = layout_text(&font(), "", 4);
        assert!(mesh.is_empty());
        assert!(mesh.indices.is_empty());
        assert_eq!(mesh.bounds.max, Vec2::new(0.0, 0.75));
    }
}
