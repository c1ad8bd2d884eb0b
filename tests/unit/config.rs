use super::*;

#[test]
fn empty_object_is_all_defaults() {
    let cfg = EngineConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.max_frames, 50);
    assert_eq!(cfg.frame_delay_ms, 200);
    assert_eq!(cfg.workers, 4);
    assert_eq!(cfg.gif_quality, 10);
    assert_eq!(cfg.jpeg_quality, 90);
    assert_eq!(cfg.background_color().unwrap(), Rgba8::WHITE);
}

#[test]
fn camel_case_fields_override_defaults() {
    let cfg = EngineConfig::from_reader(
        r##"{"maxFrames": 12, "settleDelayMs": 0, "background": "#000", "fontDirs": ["fonts"]}"##
            .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.max_frames, 12);
    assert_eq!(cfg.settle_delay_ms, 0);
    assert_eq!(cfg.background_color().unwrap(), Rgba8::BLACK);
    assert_eq!(cfg.capture_settings().font_dirs, vec![PathBuf::from("fonts")]);
}

#[test]
fn out_of_range_values_are_config_errors() {
    for json in [
        r#"{"workers": 0}"#,
        r#"{"maxFrames": 0}"#,
        r#"{"gifQuality": 31}"#,
        r#"{"gifQuality": 0}"#,
        r#"{"jpegQuality": 0}"#,
        r#"{"background": "white"}"#,
        r#"{"unknownKnob": 1}"#,
    ] {
        let err = EngineConfig::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)), "{json}: {err}");
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = EngineConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ExportError::Other(_)));
}
