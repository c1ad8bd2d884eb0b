//! Orchard renders product reviews into shareable export artifacts.
//!
//! The pure half decides what goes on a page:
//!
//! - [`resolve_available`] filters a template down to the elements a product can fill
//! - [`plan`] slices those elements into pages for an output format
//! - [`resolve`] turns an element id into a [`RenderableValue`], never failing
//!
//! The side-effecting half captures a mounted [`Composition`] through an [`ExportSession`]:
//! [`ExportSession::export_static`] writes one image, [`ExportSession::export_animated`] walks a
//! pipeline timeline cell by cell and writes an animated GIF while reporting progress.
#![forbid(unsafe_code)]

mod foundation;

/// Capability set consumed from the account subsystem.
pub mod capabilities;
/// Engine configuration.
pub mod config;
/// Still and animated encoders.
pub mod encode;
/// Export jobs, sessions and artifact stores.
pub mod export;
/// Element id to value resolution.
pub mod fields;
/// Capture backends.
pub mod render;
/// Review documents, product types and pipeline timelines.
pub mod review;
/// Scene model, composition builders and the stage.
pub mod scene;
/// Template catalog, availability and pagination.
pub mod template;
/// Watermark model and overlay selection.
pub mod watermark;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
pub use crate::foundation::error::{ErrorKind, ExportError, ExportResult};

pub use crate::capabilities::{Capabilities, ExportFormat, QualityTier};
pub use crate::config::EngineConfig;
pub use crate::encode::gif::{AnimationEncoder, GifWorkerEncoder};
pub use crate::encode::raster::{ImageCodec, RasterCodec};
pub use crate::export::job::{CancelToken, ExportJob, JobEvent, JobState, ProgressObserver};
pub use crate::export::output::{ArtifactStore, DirStore, InMemoryStore, OutputFile};
pub use crate::export::session::{AnimationOptions, ExportSession};
pub use crate::fields::resolver::{FieldResolver, resolve};
pub use crate::fields::value::RenderableValue;
pub use crate::render::backend::{CaptureBackend, CaptureTarget, FrameRGBA};
pub use crate::review::pipeline::{IntervalType, PipelineData};
pub use crate::review::product::{PipelineKind, ProductType};
pub use crate::review::record::ReviewRecord;
pub use crate::scene::composition::Composition;
pub use crate::scene::stage::Stage;
pub use crate::template::availability::resolve_available;
pub use crate::template::catalog::{TemplateCatalog, TemplateVariant};
pub use crate::template::pagination::{PageFormat, PagePlan, plan};
pub use crate::watermark::{Watermark, WatermarkOverlay};
