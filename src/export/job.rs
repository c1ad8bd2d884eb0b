use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::capabilities::ExportFormat;
use crate::foundation::error::{ExportError, ExportResult};

/// Lifecycle of one export.
///
/// `Idle -> Capturing -> Encoding -> Done`, with `Failed` and `Cancelled` reachable from any
/// non-terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    Idle,
    Capturing,
    Encoding,
    Done,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (Idle, Capturing) | (Capturing, Encoding) | (Encoding, Done) => true,
            (from, Failed | Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Encoding => "encoding",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a job produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Static(ExportFormat),
    Animated(ExportFormat),
}

/// Notification emitted while a job runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobEvent {
    State(JobState),
    /// Percent of sampled frames captured, 0..=100.
    Progress(u8),
}

/// Receives [`JobEvent`]s in emission order.
pub trait ProgressObserver {
    fn on_event(&mut self, event: JobEvent);
}

impl<F: FnMut(JobEvent)> ProgressObserver for F {
    fn on_event(&mut self, event: JobEvent) {
        self(event)
    }
}

impl ProgressObserver for mpsc::Sender<JobEvent> {
    fn on_event(&mut self, event: JobEvent) {
        // a dropped receiver only means nobody is listening
        let _ = self.send(event);
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&mut self, _event: JobEvent) {}
}

/// Shared cancellation flag, checked by the animated exporter after every capture.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// State of one export invocation.
#[derive(Clone, Debug)]
pub struct ExportJob {
    kind: JobKind,
    state: JobState,
    progress: u8,
    frames_total: usize,
    frames_done: usize,
    error_detail: Option<String>,
}

impl ExportJob {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            state: JobState::Idle,
            progress: 0,
            frames_total: 0,
            frames_done: 0,
            error_detail: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn frames_total(&self) -> usize {
        self.frames_total
    }

    pub fn frames_done(&self) -> usize {
        self.frames_done
    }

    /// Human-readable failure message, set when the job ends in `Failed` or `Cancelled`.
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub(crate) fn transition(
        &mut self,
        next: JobState,
        observer: &mut dyn ProgressObserver,
    ) -> ExportResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ExportError::Other(anyhow::anyhow!(
                "invalid export job transition {} -> {next}",
                self.state
            )));
        }
        self.state = next;
        observer.on_event(JobEvent::State(next));
        Ok(())
    }

    pub(crate) fn set_frames_total(&mut self, total: usize) {
        self.frames_total = total;
        self.frames_done = 0;
    }

    /// Record one captured frame and report progress.
    ///
    /// Progress never decreases and reads 100 only once every frame is done.
    pub(crate) fn frame_done(&mut self, observer: &mut dyn ProgressObserver) -> u8 {
        self.frames_done = (self.frames_done + 1).min(self.frames_total);
        let pct = progress_percent(self.frames_done, self.frames_total);
        self.progress = self.progress.max(pct);
        observer.on_event(JobEvent::Progress(self.progress));
        self.progress
    }

    /// Move to `Done`, reporting 100% if no frame did so already.
    pub(crate) fn complete(&mut self, observer: &mut dyn ProgressObserver) -> ExportResult<()> {
        if self.progress < 100 {
            self.progress = 100;
            observer.on_event(JobEvent::Progress(100));
        }
        self.transition(JobState::Done, observer)
    }

    /// End the job with `err`. A terminal job is left untouched.
    pub(crate) fn fail(&mut self, err: &ExportError, observer: &mut dyn ProgressObserver) {
        if self.state.is_terminal() {
            return;
        }
        self.error_detail = Some(err.to_string());
        let next = if matches!(err, ExportError::Cancelled) {
            JobState::Cancelled
        } else {
            JobState::Failed
        };
        self.state = next;
        observer.on_event(JobEvent::State(next));
    }
}

/// `round(100 * done / total)`, held at 99 until the last frame.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 || done >= total {
        return 100;
    }
    let pct = (done as f64 * 100.0 / total as f64).round() as u8;
    pct.min(99)
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
