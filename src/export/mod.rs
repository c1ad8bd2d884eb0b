//! Export orchestration.
//!
//! [`session::ExportSession`] owns the capture backend, the encoders and the artifact store, and
//! drives one [`job::ExportJob`] per call.

/// Job state machine, progress events and cancellation.
pub mod job;
/// Artifact persistence and deterministic file names.
pub mod output;
/// Static and animated export entry points.
pub mod session;
