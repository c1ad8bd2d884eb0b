use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::capabilities::ExportFormat;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::{
    flatten_premul_over_bg, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::render::backend::FrameRGBA;
use crate::scene::composition::Composition;

/// Encodes one captured frame into a still image.
pub trait ImageCodec: Send + Sync {
    /// Encode `frame` as `format`. Formats the codec does not produce fail with
    /// [`ExportError::UnsupportedFormat`].
    fn encode(&self, frame: &FrameRGBA, format: ExportFormat) -> ExportResult<Vec<u8>>;
}

/// Raster codec built on the `image` and `gif` crates.
#[derive(Clone, Debug)]
pub struct RasterCodec {
    jpeg_quality: u8,
    gif_speed: i32,
    background: Rgba8,
}

impl Default for RasterCodec {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            gif_speed: 10,
            background: Rgba8::WHITE,
        }
    }
}

impl RasterCodec {
    pub fn new(jpeg_quality: u8, gif_quality: u8, background: Rgba8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
            gif_speed: i32::from(gif_quality.clamp(1, 30)),
            background,
        }
    }

    fn png(&self, frame: &FrameRGBA) -> anyhow::Result<Vec<u8>> {
        let mut rgba = frame.data.clone();
        if frame.premultiplied {
            unpremultiply_rgba8_in_place(&mut rgba);
        }
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
            .context("write png")?;
        Ok(out)
    }

    fn jpeg(&self, frame: &FrameRGBA) -> anyhow::Result<Vec<u8>> {
        let opaque = opaque_rgba(frame, self.background)?;
        let rgb: Vec<u8> = opaque
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
            .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
            .context("write jpeg")?;
        Ok(out)
    }

    fn gif(&self, frame: &FrameRGBA) -> anyhow::Result<Vec<u8>> {
        let (w, h) = gif_dims(frame.width, frame.height)?;
        let mut opaque = opaque_rgba(frame, self.background)?;
        let gif_frame = ::gif::Frame::from_rgba_speed(w, h, &mut opaque, self.gif_speed);
        let mut encoder = ::gif::Encoder::new(Vec::new(), w, h, &[]).context("open gif stream")?;
        encoder.write_frame(&gif_frame).context("write gif frame")?;
        encoder.into_inner().context("finish gif stream")
    }
}

impl ImageCodec for RasterCodec {
    fn encode(&self, frame: &FrameRGBA, format: ExportFormat) -> ExportResult<Vec<u8>> {
        check_frame(frame)?;
        let bytes = match format {
            ExportFormat::Png => self.png(frame),
            ExportFormat::Jpeg => self.jpeg(frame),
            ExportFormat::Gif => self.gif(frame),
            other => return Err(ExportError::UnsupportedFormat(other)),
        }
        .map_err(ExportError::encoding)?;

        if bytes.is_empty() {
            return Err(ExportError::EncodingProducedEmptyOutput(format.to_string()));
        }
        Ok(bytes)
    }
}

/// Vector export: the composition's SVG scene at `scale` times its canvas size.
pub fn svg_document(composition: &Composition, scale: f64) -> ExportResult<Vec<u8>> {
    let svg = composition.to_svg(scale);
    if svg.is_empty() {
        return Err(ExportError::EncodingProducedEmptyOutput(
            ExportFormat::Svg.to_string(),
        ));
    }
    Ok(svg.into_bytes())
}

pub(crate) fn check_frame(frame: &FrameRGBA) -> ExportResult<()> {
    let expected = u64::from(frame.width) * u64::from(frame.height) * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() as u64 != expected {
        return Err(ExportError::encoding(anyhow::anyhow!(
            "frame buffer does not match {}x{} rgba8 ({} bytes)",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }
    Ok(())
}

/// Flatten a frame over `background` so formats without alpha get the page colour.
pub(crate) fn opaque_rgba(frame: &FrameRGBA, background: Rgba8) -> anyhow::Result<Vec<u8>> {
    let mut src = frame.data.clone();
    if !frame.premultiplied {
        premultiply_rgba8_in_place(&mut src);
    }
    let mut dst = vec![0u8; src.len()];
    flatten_premul_over_bg(&mut dst, &src, background.to_array())?;
    Ok(dst)
}

pub(crate) fn gif_dims(width: u32, height: u32) -> anyhow::Result<(u16, u16)> {
    let w = u16::try_from(width).context("gif width exceeds 65535")?;
    let h = u16::try_from(height).context("gif height exceeds 65535")?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
