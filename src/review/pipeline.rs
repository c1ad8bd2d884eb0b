use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ExportError, ExportResult};

/// Cell count used when a pipeline's interval type is missing or unrecognized.
pub const FALLBACK_TOTAL_CELLS: u32 = 365;

/// Time granularity of a pipeline grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Phase,
}

impl IntervalType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" => Some(Self::Seconds),
            "minutes" => Some(Self::Minutes),
            "hours" => Some(Self::Hours),
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            "phase" | "phases" => Some(Self::Phase),
            _ => None,
        }
    }

    /// Fixed number of grid cells for this interval.
    pub fn total_cells(self) -> u32 {
        match self {
            Self::Seconds | Self::Minutes => 60,
            Self::Hours => 24,
            Self::Days => 365,
            Self::Weeks => 52,
            Self::Months | Self::Phase => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Phase => "phase",
        }
    }
}

/// One measurement cell of a pipeline grid.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineCell {
    #[serde(default)]
    pub intensity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Any other per-cell payload, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PipelineCell {
    /// Neutral stand-in for indices that carry no data.
    pub fn placeholder() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineConfig {
    #[serde(default)]
    interval_type: Option<String>,
    #[serde(default)]
    pipeline_type: Option<String>,
}

/// Time-indexed grid of measurements backing the animated export. Read-only here.
///
/// Accepts both `{"intervalType": .., "cells": ..}` and the editor's
/// `{"config": {"intervalType": .., "pipelineType": ..}, "cells": ..}` shapes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<PipelineConfig>,
    #[serde(default)]
    pub cells: BTreeMap<u32, PipelineCell>,
}

impl PipelineData {
    pub fn new(interval: IntervalType, cells: BTreeMap<u32, PipelineCell>) -> Self {
        Self {
            interval_type: Some(interval.as_str().to_string()),
            config: None,
            cells,
        }
    }

    pub fn from_value(value: &serde_json::Value) -> ExportResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ExportError::invalid_pipeline(format!("parse pipeline JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read pipeline JSON '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ExportError::invalid_pipeline(format!("parse pipeline JSON: {e}")))
    }

    /// Raw interval string as stored, if any.
    pub fn interval_raw(&self) -> Option<&str> {
        self.interval_type
            .as_deref()
            .or_else(|| self.config.as_ref()?.interval_type.as_deref())
    }

    pub fn interval(&self) -> Option<IntervalType> {
        self.interval_raw().and_then(IntervalType::parse)
    }

    /// Pipeline type recorded by the editor (e.g. `culture`), if any.
    pub fn pipeline_type(&self) -> Option<&str> {
        self.config.as_ref()?.pipeline_type.as_deref()
    }

    /// Total grid cells for the interval, [`FALLBACK_TOTAL_CELLS`] when unrecognized.
    pub fn total_cells(&self) -> u32 {
        self.interval()
            .map(IntervalType::total_cells)
            .unwrap_or(FALLBACK_TOTAL_CELLS)
    }

    /// Cells with an index inside the grid.
    pub fn filled_cells(&self) -> impl Iterator<Item = (u32, &PipelineCell)> {
        let total = self.total_cells();
        self.cells
            .iter()
            .filter(move |(idx, _)| **idx < total)
            .map(|(idx, cell)| (*idx, cell))
    }
}

/// A cell selected for animation.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledFrame {
    pub cell_index: u32,
    pub cell: PipelineCell,
}

/// Stride used to downsample `total_cells` to at most `max_frames`.
pub fn frame_step(total_cells: u32, max_frames: usize) -> u32 {
    let max = u32::try_from(max_frames).unwrap_or(u32::MAX).max(1);
    total_cells.div_ceil(max).max(1)
}

/// Deterministically pick at most `max_frames` cells to animate.
///
/// Every index `0..total_cells` is represented (missing cells become placeholders) so the
/// animation timing stays uniform over sparse data; indices that are multiples of the stride
/// survive, truncated to the first `max_frames`.
pub fn sample_frames(pipeline: &PipelineData, max_frames: usize) -> Vec<SampledFrame> {
    let total = pipeline.total_cells();
    let step = frame_step(total, max_frames);
    (0..total)
        .filter(|idx| idx % step == 0)
        .take(max_frames)
        .map(|idx| SampledFrame {
            cell_index: idx,
            cell: pipeline
                .cells
                .get(&idx)
                .cloned()
                .unwrap_or_else(PipelineCell::placeholder),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/review/pipeline.rs"]
mod tests;
