use crate::capabilities::ExportFormat;

/// Convenience result type used across Orchard.
pub type ExportResult<T> = Result<T, ExportError>;

/// Coarse classification of an [`ExportError`].
///
/// Lets callers distinguish "nothing to export" (preconditions) from "the export pipeline broke"
/// (capture or encoding) without matching every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected before any work began; no side effects happened.
    Precondition,
    /// The composition could not be rasterized.
    Capture,
    /// Binary conversion or a worker failed.
    Encoding,
    /// The caller cancelled the job.
    Cancelled,
    /// Invalid engine configuration or template data.
    Config,
    /// IO and other lower-level failures (persisting artifacts, reading inputs).
    Io,
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// No composition is mounted on the stage, or the mounted one has nothing to draw.
    #[error("no preview available: mount a non-empty composition before exporting")]
    NoPreviewAvailable,

    /// The pipeline has no cells (or is otherwise unusable for animation).
    #[error("no pipeline data: {0}")]
    InvalidPipelineData(String),

    /// A product type string did not match any known product.
    #[error("unknown product type '{0}'")]
    UnknownProductType(String),

    /// Another export currently owns the composition.
    #[error("composition is busy: another export is already running against it")]
    CompositionBusy,

    /// The composition could not be rasterized; the cause is preserved.
    #[error("capture failed: {0:#}")]
    Capture(anyhow::Error),

    /// Capture succeeded but the encoder produced zero bytes.
    #[error("encoding produced empty output for {0}")]
    EncodingProducedEmptyOutput(String),

    /// The encoder (or one of its workers) failed; the cause is preserved.
    #[error("encoding failed: {0:#}")]
    Encoding(anyhow::Error),

    /// The format is not produced by this engine (handled by external formatters).
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(ExportFormat),

    /// The job observed its cancellation token.
    #[error("export cancelled")]
    Cancelled,

    /// Template catalog data is malformed.
    #[error("template error: {0}")]
    Template(String),

    /// Engine configuration is malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    pub fn invalid_pipeline(msg: impl Into<String>) -> Self {
        Self::InvalidPipelineData(msg.into())
    }

    pub fn capture(err: impl Into<anyhow::Error>) -> Self {
        Self::Capture(err.into())
    }

    pub fn encoding(err: impl Into<anyhow::Error>) -> Self {
        Self::Encoding(err.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPreviewAvailable
            | Self::InvalidPipelineData(_)
            | Self::UnknownProductType(_)
            | Self::CompositionBusy
            | Self::UnsupportedFormat(_) => ErrorKind::Precondition,
            Self::Capture(_) => ErrorKind::Capture,
            Self::EncodingProducedEmptyOutput(_) | Self::Encoding(_) => ErrorKind::Encoding,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Template(_) | Self::Config(_) => ErrorKind::Config,
            Self::Other(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
