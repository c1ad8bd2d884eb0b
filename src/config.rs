//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) yields a working engine.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::CaptureSettings;

/// Tunables for captures, encoders and output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Upper bound on frames sampled from a pipeline.
    pub max_frames: usize,
    /// Display time of each animation frame.
    pub frame_delay_ms: u32,
    /// Pause between highlighting a cell and capturing it.
    pub settle_delay_ms: u64,
    /// GIF quantization workers.
    pub workers: usize,
    /// 1..=30, lower is better and slower.
    pub gif_quality: u8,
    /// 1..=100.
    pub jpeg_quality: u8,
    /// Page colour, also used to flatten formats without alpha.
    pub background: String,
    pub output_dir: PathBuf,
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_frames: 50,
            frame_delay_ms: 200,
            settle_delay_ms: 50,
            workers: 4,
            gif_quality: 10,
            jpeg_quality: 90,
            background: "#ffffff".to_owned(),
            output_dir: PathBuf::from("./exports"),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_reader(reader: impl Read) -> ExportResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| ExportError::config(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open engine config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn validate(&self) -> ExportResult<()> {
        if self.max_frames == 0 {
            return Err(ExportError::config("maxFrames must be >= 1"));
        }
        if self.workers == 0 {
            return Err(ExportError::config("workers must be >= 1"));
        }
        if self.frame_delay_ms == 0 {
            return Err(ExportError::config("frameDelayMs must be >= 1"));
        }
        if !(1..=30).contains(&self.gif_quality) {
            return Err(ExportError::config(format!(
                "gifQuality must be in 1..=30, got {}",
                self.gif_quality
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ExportError::config(format!(
                "jpegQuality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.background_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> ExportResult<Rgba8> {
        Rgba8::parse_hex(&self.background)
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            load_system_fonts: self.load_system_fonts,
            font_dirs: self.font_dirs.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
