use super::*;

fn pipeline(interval: &str, cells: &[(u32, f64)]) -> PipelineData {
    let cells = cells
        .iter()
        .map(|(idx, intensity)| {
            (
                *idx,
                PipelineCell {
                    intensity: *intensity,
                    ..PipelineCell::default()
                },
            )
        })
        .collect();
    let mut p = PipelineData::new(IntervalType::Days, cells);
    p.interval_type = Some(interval.to_string());
    p
}

#[test]
fn interval_lookup_table() {
    let expect = [
        ("seconds", 60),
        ("minutes", 60),
        ("hours", 24),
        ("days", 365),
        ("weeks", 52),
        ("months", 12),
        ("phase", 12),
    ];
    for (name, total) in expect {
        assert_eq!(pipeline(name, &[]).total_cells(), total, "{name}");
    }
}

#[test]
fn unknown_interval_defaults_to_365() {
    assert_eq!(pipeline("fortnights", &[]).total_cells(), 365);
    assert_eq!(PipelineData::default().total_cells(), FALLBACK_TOTAL_CELLS);
}

#[test]
fn days_sample_46_frames_with_stride_8() {
    let p = pipeline("days", &[(3, 0.5), (8, 0.9)]);
    let frames = sample_frames(&p, 50);
    assert_eq!(frame_step(365, 50), 8);
    assert_eq!(frames.len(), 46);
    let indices: Vec<u32> = frames.iter().map(|f| f.cell_index).collect();
    let expected: Vec<u32> = (0..=360).step_by(8).collect();
    assert_eq!(indices, expected);
    assert_eq!(frames[1].cell.intensity, 0.9);
}

#[test]
fn small_grids_keep_every_cell() {
    let p = pipeline("hours", &[]);
    let frames = sample_frames(&p, 50);
    assert_eq!(frames.len(), 24);
    assert!(frames.iter().enumerate().all(|(i, f)| f.cell_index == i as u32));
}

#[test]
fn huge_frame_caps_saturate_instead_of_truncating() {
    assert_eq!(frame_step(365, usize::MAX), 1);
    assert_eq!(frame_step(365, 1usize << 32), 1);
    assert_eq!(sample_frames(&pipeline("days", &[]), usize::MAX).len(), 365);
}

#[test]
fn stride_that_does_not_divide_yields_fewer_frames() {
    // 52 weeks, stride 2: 26 frames rather than 50
    let frames = sample_frames(&pipeline("weeks", &[(0, 1.0)]), 50);
    assert_eq!(frames.len(), 26);
    assert_eq!(frames.last().map(|f| f.cell_index), Some(50));
}

#[test]
fn missing_cells_become_zero_intensity_placeholders() {
    let p = pipeline("months", &[(5, 0.7)]);
    let frames = sample_frames(&p, 50);
    assert_eq!(frames[0].cell, PipelineCell::placeholder());
    assert_eq!(frames[0].cell.intensity, 0.0);
    assert_eq!(frames[5].cell.intensity, 0.7);
}

#[test]
fn parses_config_shape_and_extra_fields() {
    let v = serde_json::json!({
        "config": {"intervalType": "hours", "pipelineType": "curing"},
        "cells": {"0": {"intensity": 0.3, "temperature": 21.5, "phase": "dry"}, "99": {}}
    });
    let p = PipelineData::from_value(&v).unwrap();
    assert_eq!(p.interval(), Some(IntervalType::Hours));
    assert_eq!(p.pipeline_type(), Some("curing"));
    assert_eq!(p.cells[&0].temperature, Some(21.5));
    assert_eq!(p.cells[&0].extra["phase"], "dry");
    // index 99 lies outside a 24-cell grid
    assert_eq!(p.filled_cells().count(), 1);
}

#[test]
fn malformed_pipeline_is_invalid_pipeline_data() {
    let v = serde_json::json!({"cells": "nope"});
    let err = PipelineData::from_value(&v).unwrap_err();
    assert!(matches!(err, ExportError::InvalidPipelineData(_)));
}
