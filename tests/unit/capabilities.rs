use super::*;

#[test]
fn restricted_set_is_png_jpeg_standard_forced_watermark() {
    let caps = Capabilities::restricted();
    assert!(caps.allows(ExportFormat::Png));
    assert!(caps.allows(ExportFormat::Jpeg));
    assert!(!caps.allows(ExportFormat::Gif));
    assert_eq!(caps.quality_tier.oversampling(), 2);
    assert!(!caps.watermark_customizable);
    assert_eq!(Capabilities::default(), caps);
}

#[test]
fn formats_parse_with_aliases() {
    assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
    assert_eq!(" gif ".parse::<ExportFormat>().unwrap(), ExportFormat::Gif);
    assert!("tiff".parse::<ExportFormat>().is_err());
    for f in ExportFormat::ALL {
        assert_eq!(f.to_string().parse::<ExportFormat>().unwrap(), f);
    }
}

#[test]
fn only_raster_and_vector_images_are_static_outputs() {
    let images: Vec<_> = ExportFormat::ALL.into_iter().filter(|f| f.is_image()).collect();
    assert_eq!(
        images,
        vec![ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Svg, ExportFormat::Gif]
    );
    assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
}

#[test]
fn high_tier_oversamples_three_times() {
    assert_eq!("high".parse::<QualityTier>().unwrap().oversampling(), 3);
}

#[test]
fn capabilities_deserialize_camel_case() {
    let caps: Capabilities = serde_json::from_str(
        r#"{"allowedFormats":["png","gif"],"qualityTier":"high","watermarkCustomizable":true,"customLayoutAllowed":false}"#,
    )
    .unwrap();
    assert!(caps.allows(ExportFormat::Gif));
    assert_eq!(caps.quality_tier, QualityTier::High);
}
