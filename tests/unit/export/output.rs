use super::*;

#[test]
fn sanitize_keeps_ascii_alnum_and_dash() {
    assert_eq!(sanitize_name("Lemon Haze #3 (été)"), "LemonHaze3t");
    assert_eq!(sanitize_name("og-kush_v2"), "og-kushv2");
    assert_eq!(sanitize_name("   "), "");
}

#[test]
fn static_names_are_deterministic() {
    assert_eq!(
        static_file_name("Lemon Haze", 1_700_000_000_123, ExportFormat::Jpeg),
        "review-LemonHaze-1700000000123.jpg"
    );
    assert_eq!(
        static_file_name("***", 5, ExportFormat::Png),
        "review-untitled-5.png"
    );
}

#[test]
fn pipeline_names_use_kind_or_animation() {
    assert_eq!(
        pipeline_file_name(Some(PipelineKind::Curing), 42, ExportFormat::Gif),
        "pipeline-curing-42.gif"
    );
    assert_eq!(
        pipeline_file_name(None, 42, ExportFormat::Gif),
        "pipeline-animation-42.gif"
    );
}

#[test]
fn memory_store_clones_share_files() {
    let store = InMemoryStore::new();
    let mut writer = store.clone();
    assert!(store.is_empty());
    assert_eq!(writer.save("a.png", b"abc").unwrap(), None);
    assert_eq!(store.files(), vec![("a.png".to_owned(), b"abc".to_vec())]);
}

#[test]
fn dir_store_creates_directory_and_writes() {
    let dir = std::env::temp_dir().join(format!("orchard-store-{}", timestamp_millis()));
    let mut store = DirStore::new(dir.join("nested"));
    let path = store.save("x.gif", b"GIF89a").unwrap().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"GIF89a");
    assert!(!store.dir().join(".x.gif.part").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn clock_is_after_2020() {
    assert!(timestamp_millis() > 1_577_836_800_000);
}
