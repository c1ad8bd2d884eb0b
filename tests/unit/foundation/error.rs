use super::*;

#[test]
fn display_messages_distinguish_the_four_user_facing_failures() {
    let no_preview = ExportError::NoPreviewAvailable.to_string();
    let no_pipeline = ExportError::invalid_pipeline("cells are empty").to_string();
    let capture = ExportError::capture(anyhow::anyhow!("pixmap")).to_string();
    let encode = ExportError::encoding(anyhow::anyhow!("worker")).to_string();

    assert!(no_preview.contains("no preview available"));
    assert!(no_pipeline.contains("no pipeline data"));
    assert!(capture.contains("capture failed:"));
    assert!(encode.contains("encoding failed:"));

    let all = [&no_preview, &no_pipeline, &capture, &encode];
    for (i, a) in all.iter().enumerate() {
        for b in all.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn capture_and_encoding_preserve_cause_chain() {
    let base = std::io::Error::other("disk on fire");
    let err = ExportError::capture(anyhow::Error::new(base).context("rasterize frame 8"));
    let msg = err.to_string();
    assert!(msg.contains("rasterize frame 8"));
    assert!(msg.contains("disk on fire"));
}

#[test]
fn kinds_split_preconditions_from_pipeline_failures() {
    assert_eq!(ExportError::NoPreviewAvailable.kind(), ErrorKind::Precondition);
    assert_eq!(
        ExportError::invalid_pipeline("x").kind(),
        ErrorKind::Precondition
    );
    assert_eq!(ExportError::CompositionBusy.kind(), ErrorKind::Precondition);
    assert_eq!(
        ExportError::capture(anyhow::anyhow!("x")).kind(),
        ErrorKind::Capture
    );
    assert_eq!(
        ExportError::EncodingProducedEmptyOutput("png".into()).kind(),
        ErrorKind::Encoding
    );
    assert_eq!(ExportError::Cancelled.kind(), ErrorKind::Cancelled);
    assert_eq!(ExportError::config("x").kind(), ErrorKind::Config);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ExportError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Io);
}
