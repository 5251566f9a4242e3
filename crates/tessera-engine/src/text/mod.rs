//! Fonts and text meshing.
//!
//! - `font`: immutable glyph/line metrics plus the atlas texture they index
//! - `layout`: turns a string into one textured quad per glyph
//! - `atlas`: bakes a [`Font`] and its atlas image from TrueType/OpenType bytes

mod atlas;
mod font;
mod layout;

pub use atlas::{bake_font, AtlasConfig, AtlasImage, FontLoadError};
pub use font::{Font, FontBuilder, Glyph, LineMetrics};
pub use layout::{layout_text, GlyphMiss, TextMesh, TextVertex, TEXT_ATTRIBUTES};
