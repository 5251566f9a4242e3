use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tessera_engine::geometry::Geometry;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::paint::Color;
use tessera_engine::render::{Material, Mesh, RecordingSink, RenderState, TextureKey};
use tessera_engine::shader::{builtin, ShaderKey, ShaderLibrary, ShaderResolver};
use tessera_engine::shapes::Text;
use tessera_engine::text::{bake_font, AtlasConfig};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

const TODO: &str = "To-Do:\n\
    \t ✓ Support textures\n\
    \t ✓ Support fonts\n\
    \t ❌ Support truetype fonts with kerning and hinting\n\
    \t ✓ Feed the dog\n\
    \t ❌ Water the plant\n\
    \t ✓ Test with special characters: ⇆ ‡ ⅑ ↶ ₹\n\
    \t - Make something nice with it\n\
    \t - Buy new plant\n";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let path = font_path()?;
    let bytes = std::fs::read(&path).with_context(|| format!("reading font {}", path.display()))?;

    let config = AtlasConfig::default()
        .with_name(font_name(&path), "Regular")
        .with_charset((' '..='~').chain("✓❌⇆‡⅑↶₹".chars()));
    let (font, atlas) = bake_font(&bytes, &config, TextureKey::new("body_atlas"))
        .with_context(|| format!("baking {}", path.display()))?;
    log::info!("baked {font}: {} glyphs, {}×{} atlas", font.glyph_count(), atlas.width, atlas.height);
    let font = Arc::new(font);

    let shaders: Arc<dyn ShaderResolver> = Arc::new(ShaderLibrary::with_builtins());

    let mut title = Text::new(font.clone(), "Tessera rendering engine", shaders.clone())
        .context("laying out title")?;
    title.transform_mut().set_uniform_scale(0.05);
    title.transform_mut().move_xy(-1.01, 0.775);

    let mut todo = Text::new(font.clone(), TODO, shaders.clone()).context("laying out to-do list")?;
    todo.transform_mut().set_uniform_scale(0.05);
    todo.transform_mut().move_xy(-1.01, 0.65);
    todo.set_color(Color::gray(0.8));

    for text in [&title, &todo] {
        let g = text.mesh().geometry();
        let b = text.bounds();
        log::info!(
            "{text}: {} vertices, {} indices, bounds ({:.3}, {:.3})..({:.3}, {:.3})",
            g.vertex_count(),
            g.index_count(),
            b.min.x,
            b.min.y,
            b.max.x,
            b.max.y,
        );
    }

    let mut batch = Geometry::default();
    batch
        .append_geometry(title.mesh().geometry())?
        .append_geometry(todo.mesh().geometry())?;

    let mut material = Material::new(ShaderKey::new(builtin::COL_TEX_2D));
    material.add_texture_binding("sampler", font.texture().clone());
    let mut batched = Mesh::new(material, shaders);
    batched.set_geometry(batch).context("validating batched text")?;
    log::info!(
        "batch: {} vertices, {} indices",
        batched.geometry().vertex_count(),
        batched.geometry().index_count()
    );

    let mut state = RenderState::new();
    let mut sink = RecordingSink::new();
    title.draw(&mut state, &mut sink);
    todo.draw(&mut state, &mut sink);
    batched.draw(&state, &mut sink);

    for (i, rec) in sink.records().iter().enumerate() {
        log::info!(
            "draw {i}: shader {}, {} vertices, {} primitive",
            rec.shader,
            rec.geometry.vertex_count(),
            rec.geometry.primitive()
        );
    }
    Ok(())
}

/// First CLI argument, or the first well-known system font that exists.
fn font_path() -> Result<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }
    FONT_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
        .with_context(|| format!("no system font found; pass a .ttf path (tried {})", FONT_PATHS.join(", ")))
}

fn font_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("font")
        .to_string()
}
