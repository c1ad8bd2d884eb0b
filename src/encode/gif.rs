use anyhow::Context as _;
use rayon::prelude::*;

use crate::capabilities::ExportFormat;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ExportError, ExportResult};
use crate::encode::raster::{check_frame, gif_dims, opaque_rgba};
use crate::render::backend::FrameRGBA;

/// One captured frame waiting in the encode queue.
#[derive(Clone, Debug)]
pub struct QueuedFrame {
    /// Pipeline cell the frame highlights.
    pub index: u32,
    pub frame: FrameRGBA,
    /// Display time in milliseconds.
    pub delay_ms: u32,
}

/// Stream settings given to an [`AnimationEncoder`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    pub width: u32,
    pub height: u32,
    /// Loop forever when `true`, play once otherwise.
    pub repeat: bool,
}

/// Queue-then-encode contract for animated output.
///
/// Frames are pushed in playback order. Nothing is written until [`AnimationEncoder::finish`];
/// [`AnimationEncoder::discard`] drops the queue without producing output.
pub trait AnimationEncoder: Send {
    fn format(&self) -> ExportFormat;
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: AnimationConfig) -> ExportResult<()>;
    fn push_frame(&mut self, frame: QueuedFrame) -> ExportResult<()>;
    /// Encode every queued frame and return the finished file.
    fn finish(&mut self) -> ExportResult<Vec<u8>>;
    fn discard(&mut self);
    /// Frames currently queued.
    fn queued(&self) -> usize;
}

/// GIF encoder that quantizes frames on a dedicated rayon pool.
///
/// Palette quantization dominates GIF encoding cost, so it runs in parallel; the quantized frames
/// are then written to the stream in queue order.
#[derive(Debug)]
pub struct GifWorkerEncoder {
    workers: usize,
    speed: i32,
    background: Rgba8,
    cfg: Option<AnimationConfig>,
    queue: Vec<QueuedFrame>,
}

impl GifWorkerEncoder {
    /// `quality` follows the 1..=30 scale where lower is better and slower.
    pub fn new(workers: usize, quality: u8, background: Rgba8) -> Self {
        Self {
            workers: workers.max(1),
            speed: i32::from(quality.clamp(1, 30)),
            background,
            cfg: None,
            queue: Vec::new(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn quantize(&self, queued: &QueuedFrame) -> anyhow::Result<::gif::Frame<'static>> {
        let (w, h) = gif_dims(queued.frame.width, queued.frame.height)?;
        let mut rgba = opaque_rgba(&queued.frame, self.background)?;
        let mut frame = ::gif::Frame::from_rgba_speed(w, h, &mut rgba, self.speed);
        frame.delay = gif_delay(queued.delay_ms);
        Ok(frame)
    }
}

impl AnimationEncoder for GifWorkerEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Gif
    }

    fn begin(&mut self, cfg: AnimationConfig) -> ExportResult<()> {
        gif_dims(cfg.width, cfg.height).map_err(ExportError::encoding)?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ExportError::encoding(anyhow::anyhow!(
                "gif stream is empty: {}x{}",
                cfg.width,
                cfg.height
            )));
        }
        self.cfg = Some(cfg);
        self.queue.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: QueuedFrame) -> ExportResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(ExportError::encoding(anyhow::anyhow!(
                "push_frame called before begin"
            )));
        };
        check_frame(&frame.frame)?;
        if frame.frame.width != cfg.width || frame.frame.height != cfg.height {
            return Err(ExportError::encoding(anyhow::anyhow!(
                "frame {} is {}x{}, stream is {}x{}",
                frame.index,
                frame.frame.width,
                frame.frame.height,
                cfg.width,
                cfg.height
            )));
        }
        self.queue.push(frame);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), fields(frames = self.queue.len(), workers = self.workers))]
    fn finish(&mut self) -> ExportResult<Vec<u8>> {
        let Some(cfg) = self.cfg.take() else {
            return Err(ExportError::encoding(anyhow::anyhow!("finish called before begin")));
        };
        let queue = std::mem::take(&mut self.queue);
        if queue.is_empty() {
            return Err(ExportError::EncodingProducedEmptyOutput(
                "gif (no frames queued)".to_owned(),
            ));
        }

        let pool = build_thread_pool(self.workers)?;
        let quantized: Vec<anyhow::Result<::gif::Frame<'static>>> =
            pool.install(|| queue.par_iter().map(|q| self.quantize(q)).collect());
        // collect on an indexed parallel iterator keeps queue order
        let frames = quantized
            .into_iter()
            .collect::<anyhow::Result<Vec<_>>>()
            .context("gif worker failed")
            .map_err(ExportError::encoding)?;

        let bytes = write_stream(cfg, &frames).map_err(ExportError::encoding)?;
        if bytes.is_empty() {
            return Err(ExportError::EncodingProducedEmptyOutput("gif".to_owned()));
        }
        tracing::debug!(bytes = bytes.len(), "gif stream written");
        Ok(bytes)
    }

    fn discard(&mut self) {
        self.cfg = None;
        self.queue.clear();
    }

    fn queued(&self) -> usize {
        self.queue.len()
    }
}

fn write_stream(cfg: AnimationConfig, frames: &[::gif::Frame<'static>]) -> anyhow::Result<Vec<u8>> {
    let (w, h) = gif_dims(cfg.width, cfg.height)?;
    let mut encoder = ::gif::Encoder::new(Vec::new(), w, h, &[]).context("open gif stream")?;
    let repeat = if cfg.repeat {
        ::gif::Repeat::Infinite
    } else {
        ::gif::Repeat::Finite(0)
    };
    encoder.set_repeat(repeat).context("set gif repeat")?;
    for frame in frames {
        encoder.write_frame(frame).context("write gif frame")?;
    }
    encoder.into_inner().context("finish gif stream")
}

fn build_thread_pool(workers: usize) -> ExportResult<rayon::ThreadPool> {
    if workers == 0 {
        return Err(ExportError::config("gif encoder needs at least one worker"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("orchard-gif-{i}"))
        .build()
        .map_err(|e| ExportError::encoding(anyhow::anyhow!("failed to build gif worker pool: {e}")))
}

/// GIF delays are in hundredths of a second.
pub(crate) fn gif_delay(delay_ms: u32) -> u16 {
    (delay_ms.saturating_add(5) / 10).clamp(1, u32::from(u16::MAX)) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
