use super::*;
use crate::foundation::core::Canvas;

fn solid(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn png_is_written_with_straight_alpha() {
    let codec = RasterCodec::default();
    let bytes = codec.encode(&solid(3, 2, [64, 0, 0, 128]), ExportFormat::Png).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn jpeg_is_flattened_over_background() {
    let codec = RasterCodec::new(90, 10, Rgba8::WHITE);
    let bytes = codec.encode(&solid(8, 8, [0, 0, 0, 0]), ExportFormat::Jpeg).unwrap();
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let [r, g, b] = decoded.get_pixel(4, 4).0;
    assert!(r > 245 && g > 245 && b > 245, "got {r},{g},{b}");
}

#[test]
fn gif_still_has_gif_header() {
    let codec = RasterCodec::default();
    let bytes = codec.encode(&solid(4, 4, [0, 128, 0, 255]), ExportFormat::Gif).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}

#[test]
fn non_raster_formats_are_rejected() {
    let codec = RasterCodec::default();
    let frame = solid(2, 2, [0, 0, 0, 255]);
    for format in [
        ExportFormat::Pdf,
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Html,
        ExportFormat::Svg,
    ] {
        assert!(matches!(
            codec.encode(&frame, format),
            Err(ExportError::UnsupportedFormat(f)) if f == format
        ));
    }
}

#[test]
fn mismatched_buffer_is_an_encoding_error() {
    let mut frame = solid(2, 2, [0, 0, 0, 255]);
    frame.data.pop();
    let err = RasterCodec::default().encode(&frame, ExportFormat::Png).unwrap_err();
    assert!(matches!(err, ExportError::Encoding(_)));
}

#[test]
fn straight_alpha_frames_are_flattened_too() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![255, 0, 0, 0],
        premultiplied: false,
    };
    let out = opaque_rgba(&frame, Rgba8::rgb(0, 0, 255)).unwrap();
    assert_eq!(out, vec![0, 0, 255, 255]);
}

#[test]
fn svg_document_is_scaled_scene() {
    let comp = Composition::new(Canvas::new(100, 50), Rgba8::WHITE);
    let bytes = svg_document(&comp, 2.0).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains(r#"width="200" height="100""#));
}
