use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::{CaptureBackend, CaptureSettings, CaptureTarget, FrameRGBA};
use crate::scene::composition::Composition;

/// Largest capture side accepted, in pixels.
pub const MAX_DIM: u32 = 16_384;

/// CPU capture backend: composition -> SVG -> `usvg` tree -> `resvg` pixmap.
pub struct ResvgBackend {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgBackend {
    pub fn new(settings: &CaptureSettings) -> Self {
        let fontdb = build_fontdb(settings);
        tracing::debug!(faces = fontdb.len(), "capture font database ready");
        Self { fontdb }
    }

    pub fn font_face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for ResvgBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgBackend")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl CaptureBackend for ResvgBackend {
    fn capture(
        &mut self,
        composition: &Composition,
        target: CaptureTarget,
    ) -> ExportResult<FrameRGBA> {
        let CaptureTarget { width, height } = target;
        if width == 0 || height == 0 {
            return Err(ExportError::capture(anyhow::anyhow!(
                "capture target is empty: {width}x{height}"
            )));
        }
        if width > MAX_DIM || height > MAX_DIM {
            return Err(ExportError::capture(anyhow::anyhow!(
                "capture size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }

        let svg = composition.to_svg(1.0);
        let tree = usvg::Tree::from_str(&svg, &self.options())
            .context("parse composition svg")
            .map_err(ExportError::capture)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ExportError::capture(anyhow::anyhow!("allocate {width}x{height} pixmap")))?;

        let size = tree.size();
        let sx = width as f32 / size.width();
        let sy = height as f32 / size.height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

fn build_fontdb(settings: &CaptureSettings) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if settings.load_system_fonts {
        db.load_system_fonts();
    }
    for dir in &settings.font_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && path.is_file() && db.load_font_file(&path).is_err() {
            tracing::warn!(path = %path.display(), "skipping unreadable font");
        }
    }
}

/// Resolve requested families, then generic families, then any face at all.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();
            families.extend([
                usvg::fontdb::Family::SansSerif,
                usvg::fontdb::Family::Serif,
            ]);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
