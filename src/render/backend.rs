use std::path::PathBuf;

use crate::foundation::error::ExportResult;
use crate::scene::composition::Composition;

/// A captured frame as RGBA8 pixels.
///
/// Captures are premultiplied alpha; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Pixel size of one capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureTarget {
    pub width: u32,
    pub height: u32,
}

impl CaptureTarget {
    /// The composition's own bounding box times `oversampling`.
    pub fn for_composition(composition: &Composition, oversampling: u32) -> Self {
        let c = composition.canvas().scaled(oversampling.max(1));
        Self {
            width: c.width,
            height: c.height,
        }
    }

    /// Explicit output size, falling back to the composition box when either side is missing.
    pub fn with_override(composition: &Composition, width: Option<u32>, height: Option<u32>) -> Self {
        let canvas = composition.canvas();
        match (width, height) {
            (Some(w), Some(h)) => Self {
                width: w,
                height: h,
            },
            // keep the aspect ratio when only one side is given
            (Some(w), None) if canvas.width > 0 => Self {
                width: w,
                height: scale_side(canvas.height, w, canvas.width),
            },
            (None, Some(h)) if canvas.height > 0 => Self {
                width: scale_side(canvas.width, h, canvas.height),
                height: h,
            },
            _ => Self::for_composition(composition, 1),
        }
    }
}

fn scale_side(side: u32, num: u32, den: u32) -> u32 {
    ((u64::from(side) * u64::from(num)).div_ceil(u64::from(den))).clamp(1, u64::from(u32::MAX)) as u32
}

/// Rasterizes a composition into a frame.
pub trait CaptureBackend: Send {
    /// Capture `composition` into a `target`-sized frame.
    fn capture(&mut self, composition: &Composition, target: CaptureTarget)
    -> ExportResult<FrameRGBA>;
}

/// Available capture backends.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU rasterizer built on `resvg`.
    #[default]
    Resvg,
}

/// Backend-agnostic capture settings.
#[derive(Clone, Debug)]
pub struct CaptureSettings {
    /// Load the host's system fonts for text nodes.
    pub load_system_fonts: bool,
    /// Extra directories scanned for `.ttf` / `.otf` / `.ttc` files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

pub fn create_backend(
    kind: BackendKind,
    settings: &CaptureSettings,
) -> ExportResult<Box<dyn CaptureBackend>> {
    match kind {
        BackendKind::Resvg => Ok(Box::new(crate::render::svg::ResvgBackend::new(settings))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
