//! Watermark compositor.
//!
//! The overlay is chosen once per export from the capability set and written into the
//! composition's single overlay slot, so a forced and a custom watermark can never stack.

use std::fmt::Write as _;

use crate::capabilities::Capabilities;
use crate::foundation::core::{Canvas, Rgba8};
use crate::scene::composition::{Composition, escape_xml, num};

/// Text of the watermark forced on accounts without watermark customization.
pub const SYSTEM_WATERMARK_TEXT: &str = "Terpologie";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

/// Center of the watermark, in percent of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WatermarkPosition {
    pub x: f64,
    pub y: f64,
}

/// User-editable watermark settings, owned by the export session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Watermark {
    pub kind: WatermarkKind,
    pub content: String,
    pub image_ref: Option<String>,
    pub position: WatermarkPosition,
    pub size_percent: f64,
    pub opacity_percent: f64,
    pub rotation_degrees: f64,
    pub color: Option<Rgba8>,
    pub visible: bool,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::Text,
            content: String::new(),
            image_ref: None,
            position: WatermarkPosition { x: 50.0, y: 90.0 },
            size_percent: 20.0,
            opacity_percent: 30.0,
            rotation_degrees: 0.0,
            color: Some(Rgba8::WHITE),
            visible: true,
        }
    }
}

impl Watermark {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            kind: WatermarkKind::Image,
            image_ref: Some(image_ref.into()),
            ..Self::default()
        }
    }

    /// Fixed settings of the system watermark.
    pub fn system() -> Self {
        Self {
            kind: WatermarkKind::Text,
            content: SYSTEM_WATERMARK_TEXT.to_string(),
            image_ref: None,
            position: WatermarkPosition { x: 88.0, y: 96.0 },
            size_percent: 12.0,
            opacity_percent: 25.0,
            rotation_degrees: 0.0,
            color: Some(Rgba8::rgb(0x6b, 0x72, 0x80)),
            visible: true,
        }
    }

    /// Has something to draw for its kind.
    fn has_content(&self) -> bool {
        match self.kind {
            WatermarkKind::Text => !self.content.trim().is_empty(),
            WatermarkKind::Image => self.image_ref.as_deref().is_some_and(|s| !s.trim().is_empty()),
        }
    }
}

/// The overlay actually drawn for one export.
#[derive(Clone, Debug, PartialEq)]
pub enum WatermarkOverlay {
    UserDefined(Watermark),
    SystemForced(Watermark),
}

impl WatermarkOverlay {
    /// Pick the overlay for an export.
    ///
    /// Without customization rights the system watermark is always drawn, whatever the user
    /// watermark says (including `visible: false`). Otherwise the user watermark is drawn when
    /// visible and non-empty.
    pub fn select(user: Option<&Watermark>, caps: &Capabilities) -> Option<Self> {
        if !caps.watermark_customizable {
            return Some(Self::SystemForced(Watermark::system()));
        }
        user.filter(|w| w.visible && w.has_content())
            .cloned()
            .map(Self::UserDefined)
    }

    pub fn watermark(&self) -> &Watermark {
        match self {
            Self::UserDefined(w) | Self::SystemForced(w) => w,
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, Self::SystemForced(_))
    }

    pub(crate) fn write_svg(&self, out: &mut String, canvas: Canvas) {
        let w = self.watermark();
        let cx = f64::from(canvas.width) * w.position.x.clamp(0.0, 100.0) / 100.0;
        let cy = f64::from(canvas.height) * w.position.y.clamp(0.0, 100.0) / 100.0;
        let opacity = (w.opacity_percent / 100.0).clamp(0.0, 1.0);
        let size = w.size_percent.clamp(1.0, 100.0) / 100.0;
        let rotate = if w.rotation_degrees == 0.0 {
            String::new()
        } else {
            format!(
                r#" transform="rotate({} {} {})""#,
                num(w.rotation_degrees),
                num(cx),
                num(cy)
            )
        };
        match (w.kind, w.image_ref.as_deref()) {
            (WatermarkKind::Image, Some(href)) => {
                let side = f64::from(canvas.width) * size;
                let _ = write!(
                    out,
                    r#"<image data-watermark="{}" x="{}" y="{}" width="{}" height="{}" href="{}" opacity="{}" preserveAspectRatio="xMidYMid meet"{rotate}/>"#,
                    self.tag(),
                    num(cx - side / 2.0),
                    num(cy - side / 2.0),
                    num(side),
                    num(side),
                    escape_xml(href),
                    num(opacity),
                );
            }
            _ => {
                let font_size = canvas.min_side() * size * 0.25;
                let color = w.color.unwrap_or(Rgba8::WHITE);
                let _ = write!(
                    out,
                    r#"<text data-watermark="{}" x="{}" y="{}" font-family="sans-serif" font-size="{}" fill="{}" opacity="{}" text-anchor="middle" dominant-baseline="middle"{rotate}>{}</text>"#,
                    self.tag(),
                    num(cx),
                    num(cy),
                    num(font_size),
                    color.to_hex_rgb(),
                    num(opacity),
                    escape_xml(&w.content),
                );
            }
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::UserDefined(_) => "user",
            Self::SystemForced(_) => "system",
        }
    }
}

/// Write the selected overlay into `composition`, replacing any previous one.
///
/// Returns the overlay that was applied, if any.
pub fn apply<'a>(
    composition: &'a mut Composition,
    user: Option<&Watermark>,
    caps: &Capabilities,
) -> Option<&'a WatermarkOverlay> {
    composition.set_overlay(WatermarkOverlay::select(user, caps));
    composition.overlay()
}

#[cfg(test)]
#[path = "../tests/unit/watermark/watermark.rs"]
mod tests;
