use super::*;

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 4,
        data: px.repeat(16),
        premultiplied: true,
    }
}

fn queued(index: u32, px: [u8; 4]) -> QueuedFrame {
    QueuedFrame {
        index,
        frame: frame(px),
        delay_ms: 200,
    }
}

fn cfg() -> AnimationConfig {
    AnimationConfig {
        width: 4,
        height: 4,
        repeat: true,
    }
}

#[test]
fn frames_are_written_in_queue_order_with_delay() {
    let colors = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
        [0, 255, 255, 255],
    ];
    let mut enc = GifWorkerEncoder::new(3, 10, Rgba8::WHITE);
    enc.begin(cfg()).unwrap();
    for (i, px) in colors.iter().enumerate() {
        enc.push_frame(queued(i as u32, *px)).unwrap();
    }
    assert_eq!(enc.queued(), 5);
    let bytes = enc.finish().unwrap();
    assert_eq!(enc.queued(), 0);

    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::RGBA);
    let mut decoder = opts.read_info(bytes.as_slice()).unwrap();
    let mut seen = Vec::new();
    while let Some(f) = decoder.read_next_frame().unwrap() {
        assert_eq!(f.delay, 20);
        seen.push([f.buffer[0], f.buffer[1], f.buffer[2]]);
    }
    assert_eq!(seen.len(), colors.len());
    for (got, want) in seen.iter().zip(colors.iter()) {
        for c in 0..3 {
            assert!(got[c].abs_diff(want[c]) <= 8, "got {got:?}, want {want:?}");
        }
    }
}

#[test]
fn finish_without_frames_is_empty_output() {
    let mut enc = GifWorkerEncoder::new(1, 10, Rgba8::WHITE);
    enc.begin(cfg()).unwrap();
    assert!(matches!(
        enc.finish(),
        Err(ExportError::EncodingProducedEmptyOutput(_))
    ));
}

#[test]
fn wrong_frame_size_is_rejected() {
    let mut enc = GifWorkerEncoder::new(2, 10, Rgba8::WHITE);
    enc.begin(AnimationConfig {
        width: 8,
        height: 8,
        repeat: true,
    })
    .unwrap();
    assert!(matches!(
        enc.push_frame(queued(0, [0, 0, 0, 255])),
        Err(ExportError::Encoding(_))
    ));
}

#[test]
fn push_before_begin_fails_and_discard_clears() {
    let mut enc = GifWorkerEncoder::new(0, 99, Rgba8::WHITE);
    assert_eq!(enc.workers(), 1);
    assert!(enc.push_frame(queued(0, [0, 0, 0, 255])).is_err());

    enc.begin(cfg()).unwrap();
    enc.push_frame(queued(0, [0, 0, 0, 255])).unwrap();
    enc.discard();
    assert_eq!(enc.queued(), 0);
    assert!(enc.finish().is_err());
}

#[test]
fn delay_rounds_to_centiseconds() {
    assert_eq!(gif_delay(200), 20);
    assert_eq!(gif_delay(0), 1);
    assert_eq!(gif_delay(104), 10);
    assert_eq!(gif_delay(105), 11);
}
