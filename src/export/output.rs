use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::capabilities::ExportFormat;
use crate::foundation::error::{ExportError, ExportResult};
use crate::review::product::PipelineKind;

/// A persisted export.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub file_name: String,
    pub format: ExportFormat,
    /// Encoded size in bytes.
    pub size: usize,
    /// Where the store put it, when it lives on disk.
    pub path: Option<PathBuf>,
}

/// Destination for finished artifacts.
pub trait ArtifactStore: Send {
    /// Persist `bytes` under `file_name`, returning the on-disk path if there is one.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>>;
}

/// Writes artifacts into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactStore for DirStore {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(file_name);
        let tmp = self.dir.join(format!(".{file_name}.part"));
        std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(ExportError::Other(
                anyhow::Error::new(e).context(format!("move artifact to '{}'", path.display())),
            ));
        }
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact saved");
        Ok(Some(path))
    }
}

/// Keeps artifacts in memory. Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved `(file_name, bytes)` pairs in save order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for InMemoryStore {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<Option<PathBuf>> {
        let mut files = self
            .files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        files.push((file_name.to_owned(), bytes.to_vec()));
        Ok(None)
    }
}

/// Keep `[A-Za-z0-9-]`, drop everything else.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// `review-<sanitizedName>-<timestampMillis>.<ext>`; an empty sanitized name becomes `untitled`.
pub fn static_file_name(name: &str, timestamp_ms: u64, format: ExportFormat) -> String {
    let mut clean = sanitize_name(name);
    if clean.is_empty() {
        clean.push_str("untitled");
    }
    format!("review-{clean}-{timestamp_ms}.{}", format.extension())
}

/// `pipeline-<kind>-<timestampMillis>.<ext>`, with `animation` when the kind is unknown.
pub fn pipeline_file_name(
    kind: Option<PipelineKind>,
    timestamp_ms: u64,
    format: ExportFormat,
) -> String {
    let kind = kind.map_or("animation", PipelineKind::as_str);
    format!("pipeline-{kind}-{timestamp_ms}.{}", format.extension())
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/export/output.rs"]
mod tests;
