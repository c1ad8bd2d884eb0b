use std::time::Duration;

use crate::capabilities::{Capabilities, ExportFormat, QualityTier};
use crate::config::EngineConfig;
use crate::encode::gif::{AnimationConfig, AnimationEncoder, GifWorkerEncoder, QueuedFrame};
use crate::encode::raster::{ImageCodec, RasterCodec, svg_document};
use crate::export::job::{
    CancelToken, ExportJob, JobKind, JobState, NoopObserver, ProgressObserver,
};
use crate::export::output::{
    ArtifactStore, DirStore, OutputFile, pipeline_file_name, static_file_name, timestamp_millis,
};
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::{BackendKind, CaptureBackend, CaptureTarget, create_backend};
use crate::review::pipeline::{PipelineData, SampledFrame, sample_frames};
use crate::review::product::PipelineKind;
use crate::scene::composition::Composition;
use crate::scene::stage::Stage;
use crate::watermark::{self, Watermark};

/// Options for [`ExportSession::export_animated`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationOptions {
    /// Names the output file; `None` yields `pipeline-animation-*`.
    pub kind: Option<PipelineKind>,
    /// Output size override; a single side keeps the composition's aspect ratio.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

type Clock = Box<dyn Fn() -> u64 + Send>;

/// Owns everything an export needs and runs one job at a time.
///
/// A session is the "invoking UI" of an export: it holds the user's watermark and capability set,
/// and remembers the last job so callers can inspect its terminal state.
pub struct ExportSession {
    config: EngineConfig,
    backend: Box<dyn CaptureBackend>,
    codec: Box<dyn ImageCodec>,
    encoder: Box<dyn AnimationEncoder>,
    store: Box<dyn ArtifactStore>,
    capabilities: Capabilities,
    watermark: Option<Watermark>,
    review_name: String,
    clock: Clock,
    last_job: Option<ExportJob>,
}

impl ExportSession {
    /// Session with the resvg backend, raster/GIF codecs and a [`DirStore`] at `output_dir`.
    pub fn new(config: EngineConfig) -> ExportResult<Self> {
        config.validate()?;
        let background = config.background_color()?;
        let backend = create_backend(BackendKind::Resvg, &config.capture_settings())?;
        let codec = RasterCodec::new(config.jpeg_quality, config.gif_quality, background);
        let encoder = GifWorkerEncoder::new(config.workers, config.gif_quality, background);
        let store = DirStore::new(config.output_dir.clone());
        Ok(Self {
            config,
            backend,
            codec: Box::new(codec),
            encoder: Box::new(encoder),
            store: Box::new(store),
            capabilities: Capabilities::restricted(),
            watermark: None,
            review_name: String::new(),
            clock: Box::new(timestamp_millis),
            last_job: None,
        })
    }

    pub fn with_backend(mut self, backend: Box<dyn CaptureBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_codec(mut self, codec: Box<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_encoder(mut self, encoder: Box<dyn AnimationEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_store(mut self, store: Box<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_watermark(mut self, watermark: Option<Watermark>) -> Self {
        self.watermark = watermark;
        self
    }

    /// Name used in static export file names.
    pub fn with_review_name(mut self, name: impl Into<String>) -> Self {
        self.review_name = name.into();
        self
    }

    /// Millisecond clock used in file names.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The most recent job, kept after it reaches a terminal state.
    pub fn last_job(&self) -> Option<&ExportJob> {
        self.last_job.as_ref()
    }

    /// Capture the mounted composition and save it as one image.
    ///
    /// PNG, JPEG and GIF are encoded from a capture at `quality`'s oversampling factor; SVG is the
    /// composition's vector scene at the same scale. Other formats fail with
    /// [`ExportError::UnsupportedFormat`] before anything is touched.
    #[tracing::instrument(level = "info", skip_all, fields(format = %format, quality = ?quality))]
    pub fn export_static(
        &mut self,
        stage: &Stage,
        format: ExportFormat,
        quality: QualityTier,
    ) -> ExportResult<OutputFile> {
        let mut job = ExportJob::new(JobKind::Static(format));
        let mut observer = NoopObserver;
        let result = self.run_static(&mut job, &mut observer, stage, format, quality);
        self.finish_job(job, &mut observer, result)
    }

    /// Drive the mounted pipeline composition through sampled cells and save the frames as an
    /// animated GIF.
    ///
    /// `observer` receives every state change and a progress event after each captured frame.
    /// `cancel` is checked after each capture; a cancelled job ends in [`JobState::Cancelled`] and
    /// its queued frames are dropped.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(kind = ?opts.kind, cells = pipeline.cells.len())
    )]
    pub fn export_animated(
        &mut self,
        stage: &Stage,
        pipeline: &PipelineData,
        opts: AnimationOptions,
        cancel: &CancelToken,
        observer: &mut dyn ProgressObserver,
    ) -> ExportResult<OutputFile> {
        let mut job = ExportJob::new(JobKind::Animated(self.encoder.format()));
        let result = self.run_animated(&mut job, observer, stage, pipeline, opts, cancel);
        if result.is_err() {
            self.encoder.discard();
        }
        self.finish_job(job, observer, result)
    }

    fn run_static(
        &mut self,
        job: &mut ExportJob,
        observer: &mut dyn ProgressObserver,
        stage: &Stage,
        format: ExportFormat,
        quality: QualityTier,
    ) -> ExportResult<OutputFile> {
        if !format.is_image() {
            return Err(ExportError::UnsupportedFormat(format));
        }

        let mut lease = stage.lease()?;
        let composition = lease.composition_mut()?;
        watermark::apply(composition, self.watermark.as_ref(), &self.capabilities);

        job.transition(JobState::Capturing, observer)?;
        let oversampling = quality.oversampling();
        let bytes = if format == ExportFormat::Svg {
            job.transition(JobState::Encoding, observer)?;
            svg_document(composition, f64::from(oversampling))?
        } else {
            let target = CaptureTarget::for_composition(composition, oversampling);
            let frame = self.backend.capture(composition, target)?;
            tracing::debug!(width = frame.width, height = frame.height, "captured");
            job.transition(JobState::Encoding, observer)?;
            self.codec.encode(&frame, format)?
        };
        drop(lease);

        let file_name = static_file_name(&self.review_name, (self.clock)(), format);
        self.persist(file_name, format, &bytes)
    }

    fn run_animated(
        &mut self,
        job: &mut ExportJob,
        observer: &mut dyn ProgressObserver,
        stage: &Stage,
        pipeline: &PipelineData,
        opts: AnimationOptions,
        cancel: &CancelToken,
    ) -> ExportResult<OutputFile> {
        if pipeline.cells.is_empty() {
            return Err(ExportError::invalid_pipeline("pipeline has no cells"));
        }
        let mut lease = stage.lease()?;
        let composition = lease.composition_mut()?;
        watermark::apply(composition, self.watermark.as_ref(), &self.capabilities);

        let frames = sample_frames(pipeline, self.config.max_frames);
        let target = CaptureTarget::with_override(composition, opts.width, opts.height);
        job.transition(JobState::Capturing, observer)?;
        job.set_frames_total(frames.len());

        let captured = self.capture_frames(job, observer, composition, &frames, target, cancel);
        composition.clear_highlight();
        captured?;
        drop(lease);

        job.transition(JobState::Encoding, observer)?;
        let bytes = self.encoder.finish()?;

        let format = self.encoder.format();
        let file_name = pipeline_file_name(opts.kind, (self.clock)(), format);
        self.persist(file_name, format, &bytes)
    }

    fn capture_frames(
        &mut self,
        job: &mut ExportJob,
        observer: &mut dyn ProgressObserver,
        composition: &mut Composition,
        frames: &[SampledFrame],
        target: CaptureTarget,
        cancel: &CancelToken,
    ) -> ExportResult<()> {
        self.encoder.begin(AnimationConfig {
            width: target.width,
            height: target.height,
            repeat: true,
        })?;
        let settle = Duration::from_millis(self.config.settle_delay_ms);

        for sampled in frames {
            if !composition.highlight_cell(sampled.cell_index) {
                tracing::debug!(cell = sampled.cell_index, "no grid cell to highlight");
            }
            if !settle.is_zero() {
                std::thread::sleep(settle);
            }
            let frame = self.backend.capture(composition, target)?;
            self.encoder.push_frame(QueuedFrame {
                index: sampled.cell_index,
                frame,
                delay_ms: self.config.frame_delay_ms,
            })?;
            let pct = job.frame_done(observer);
            tracing::debug!(cell = sampled.cell_index, progress = pct, "frame captured");

            if cancel.is_cancelled() {
                return Err(ExportError::Cancelled);
            }
        }
        Ok(())
    }

    fn persist(
        &mut self,
        file_name: String,
        format: ExportFormat,
        bytes: &[u8],
    ) -> ExportResult<OutputFile> {
        let path = self.store.save(&file_name, bytes)?;
        Ok(OutputFile {
            file_name,
            format,
            size: bytes.len(),
            path,
        })
    }

    fn finish_job(
        &mut self,
        mut job: ExportJob,
        observer: &mut dyn ProgressObserver,
        result: ExportResult<OutputFile>,
    ) -> ExportResult<OutputFile> {
        let result = match result {
            Ok(out) => job.complete(observer).map(|()| out),
            Err(err) => Err(err),
        };
        match &result {
            Ok(out) => tracing::info!(
                file = %out.file_name,
                bytes = out.size,
                frames = job.frames_total(),
                "export done"
            ),
            Err(err) => {
                job.fail(err, observer);
                tracing::warn!(state = %job.state(), error = %err, "export did not complete");
            }
        }
        self.last_job = Some(job);
        result
    }
}

impl std::fmt::Debug for ExportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportSession")
            .field("config", &self.config)
            .field("capabilities", &self.capabilities)
            .field("last_job", &self.last_job)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
