//! Capability set consumed from the account/permission subsystem.
//!
//! The engine performs no authorization itself: callers filter `format` and `quality` against
//! [`Capabilities`] before invoking an export. Only `watermark_customizable` changes engine
//! behaviour (it forces the system watermark).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ExportError;

/// Output file formats known to the platform.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    Svg,
    Gif,
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 8] = [
        Self::Png,
        Self::Jpeg,
        Self::Pdf,
        Self::Svg,
        Self::Gif,
        Self::Csv,
        Self::Json,
        Self::Html,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
            Self::Gif => "gif",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Html => "html",
        }
    }

    /// Formats the static exporter can produce from a captured composition.
    pub fn is_image(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Svg | Self::Gif)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
            Self::Gif => "gif",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Html => "html",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            "gif" => Ok(Self::Gif),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(ExportError::config(format!("unknown export format '{other}'"))),
        }
    }
}

/// Export quality tier. The only lever at the raster layer is the oversampling factor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Standard,
    High,
}

impl QualityTier {
    /// Raster oversampling factor: 2x standard, 3x high.
    pub fn oversampling(self) -> u32 {
        match self {
            Self::Standard => 2,
            Self::High => 3,
        }
    }
}

impl FromStr for QualityTier {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "high" => Ok(Self::High),
            other => Err(ExportError::config(format!("unknown quality tier '{other}'"))),
        }
    }
}

/// Capability flags computed by the account subsystem for the current user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub allowed_formats: BTreeSet<ExportFormat>,
    pub quality_tier: QualityTier,
    pub watermark_customizable: bool,
    pub custom_layout_allowed: bool,
}

impl Capabilities {
    /// The most restrictive set: PNG/JPEG only, standard quality, forced watermark.
    pub fn restricted() -> Self {
        Self {
            allowed_formats: [ExportFormat::Png, ExportFormat::Jpeg].into_iter().collect(),
            quality_tier: QualityTier::Standard,
            watermark_customizable: false,
            custom_layout_allowed: false,
        }
    }

    pub fn allows(&self, format: ExportFormat) -> bool {
        self.allowed_formats.contains(&format)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::restricted()
    }
}

#[cfg(test)]
#[path = "../tests/unit/capabilities.rs"]
mod tests;
