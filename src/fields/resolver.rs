//! Element id to value dispatch.
//!
//! Every element id maps to a [`ResolverKind`] describing where its value lives in the review
//! document and how to normalize it. Resolution is total: malformed or missing data degrades to
//! [`RenderableValue::Unavailable`] so the live preview can always draw.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde_json::Value;

use crate::fields::value::{
    CompoundValue, HarvestSummary, NoteGroup, NoteGroups, RenderableValue, ScoreEntry, ScoreGroup,
    TimelineSummary,
};
use crate::review::product::PipelineKind;
use crate::review::record::ReviewRecord;

/// Candidate field paths, tried in order. Paths may be dotted (`analytics.thc`).
pub type Keys = &'static [&'static str];

/// Labelled groups of note fields.
pub type Groups = &'static [(&'static str, Keys)];

/// How one element's value is located and shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolverKind {
    /// String or number passed through.
    Scalar(Keys),
    /// Loose list normalized to strings.
    List(Keys),
    /// First image reference.
    Image(Keys),
    /// Every image reference.
    Gallery(Keys),
    /// Averaged numeric children of a score object.
    Scores(Keys),
    /// Grouped qualitative notes.
    Notes(Groups),
    Harvest,
    Timeline(PipelineKind),
}

const SMELL_NOTES: Groups = &[
    (
        "Dominant",
        &["notesOdeursDominantes", "odorNotes", "aromas", "odeurs"],
    ),
    ("Secondary", &["notesOdeursSecondaires", "secondaryAromas"]),
];

const TASTE_NOTES: Groups = &[
    ("Dry puff", &["dryPuffNotes"]),
    ("Inhalation", &["inhalationNotes", "tasteNotes", "saveursDominantes"]),
    ("Exhale", &["expirationNotes"]),
];

const EFFECT_NOTES: Groups = &[
    ("Effects", &["effetsChoisis", "effects", "effets"]),
    ("Profiles", &["effectProfiles"]),
    ("Side effects", &["sideEffects"]),
];

const TABLE: &[(&str, ResolverKind)] = &[
    (
        "productName",
        ResolverKind::Scalar(&["productName", "nomCommercial", "holderName", "name"]),
    ),
    (
        "photo",
        ResolverKind::Image(&["photo", "mainImage", "imageUrl", "images", "photos"]),
    ),
    ("photos", ResolverKind::Gallery(&["photos", "images", "gallery"])),
    (
        "overallRating",
        ResolverKind::Scalar(&["overallRating", "note", "rating", "categoryRatings.overall"]),
    ),
    ("thc", ResolverKind::Scalar(&["thc", "thcPercent", "tauxThc", "analytics.thc"])),
    ("cbd", ResolverKind::Scalar(&["cbd", "cbdPercent", "tauxCbd", "analytics.cbd"])),
    ("purity", ResolverKind::Scalar(&["purity", "purete", "pureteVisuelle"])),
    (
        "genetics",
        ResolverKind::List(&["genetics", "cultivarsList", "cultivars", "genetiques"]),
    ),
    ("breeder", ResolverKind::Scalar(&["breeder", "farm", "hashmaker"])),
    ("hashType", ResolverKind::Scalar(&["hashType", "typeHash"])),
    (
        "separationMethod",
        ResolverKind::Scalar(&["separationMethod", "methodeSeparation"]),
    ),
    (
        "extractionMethod",
        ResolverKind::Scalar(&["extractionMethod", "methodeExtraction"]),
    ),
    ("dosage", ResolverKind::Scalar(&["dosage", "dosageMg", "thcMg"])),
    (
        "duration",
        ResolverKind::Scalar(&["duration", "effectDuration", "dureeEffet"]),
    ),
    (
        "dominantTerpenes",
        ResolverKind::List(&["dominantTerpenes", "terpenes"]),
    ),
    ("meshSizes", ResolverKind::List(&["meshSizes", "tailleMailles"])),
    (
        "purificationSteps",
        ResolverKind::List(&["purificationSteps", "purificationMethods"]),
    ),
    ("ingredients", ResolverKind::List(&["ingredients"])),
    ("odorNotes", ResolverKind::Notes(SMELL_NOTES)),
    ("tasteNotes", ResolverKind::Notes(TASTE_NOTES)),
    ("effects", ResolverKind::Notes(EFFECT_NOTES)),
    (
        "notes",
        ResolverKind::Scalar(&["notes", "description", "conclusion"]),
    ),
    ("analytics", ResolverKind::Scores(&["analytics"])),
    (
        "visual",
        ResolverKind::Scores(&["categoryRatings.visual", "visual"]),
    ),
    (
        "odor",
        ResolverKind::Scores(&["categoryRatings.smell", "smell", "odeurs"]),
    ),
    (
        "texture",
        ResolverKind::Scores(&["categoryRatings.texture", "texture"]),
    ),
    (
        "textureScore",
        ResolverKind::Scores(&["categoryRatings.texture", "texture"]),
    ),
    (
        "taste",
        ResolverKind::Scores(&["categoryRatings.taste", "taste", "gouts"]),
    ),
    (
        "terpeneProfile",
        ResolverKind::Scores(&["terpeneProfile", "terpenes"]),
    ),
    ("harvest", ResolverKind::Harvest),
    ("culture", ResolverKind::Timeline(PipelineKind::Culture)),
    ("curing", ResolverKind::Timeline(PipelineKind::Curing)),
    ("extraction", ResolverKind::Timeline(PipelineKind::Extraction)),
    ("separation", ResolverKind::Timeline(PipelineKind::Separation)),
    (
        "purification",
        ResolverKind::Timeline(PipelineKind::Purification),
    ),
    ("watermark", ResolverKind::Image(&["watermarkImage"])),
];

/// Dispatch table from element id to [`ResolverKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldResolver {
    table: BTreeMap<String, ResolverKind>,
}

static BUILTIN: LazyLock<FieldResolver> = LazyLock::new(|| FieldResolver {
    table: TABLE
        .iter()
        .map(|(id, kind)| ((*id).to_string(), *kind))
        .collect(),
});

impl FieldResolver {
    pub fn builtin() -> &'static FieldResolver {
        &BUILTIN
    }

    /// Add or replace an entry (custom layouts).
    pub fn with(mut self, id: impl Into<String>, kind: ResolverKind) -> Self {
        self.table.insert(id.into(), kind);
        self
    }

    pub fn kind(&self, element_id: &str) -> Option<ResolverKind> {
        self.table.get(element_id).copied()
    }

    pub fn resolve(&self, record: &ReviewRecord, element_id: &str) -> RenderableValue {
        match self.kind(element_id) {
            Some(kind) => resolve_kind(record, kind),
            None => RenderableValue::Unavailable,
        }
    }
}

/// Resolve `element_id` with the built-in table. Never fails.
pub fn resolve(record: &ReviewRecord, element_id: &str) -> RenderableValue {
    FieldResolver::builtin().resolve(record, element_id)
}

pub fn resolve_kind(record: &ReviewRecord, kind: ResolverKind) -> RenderableValue {
    let value = match kind {
        ResolverKind::Scalar(keys) => first(record, keys).and_then(scalar),
        ResolverKind::List(keys) => {
            let items = first(record, keys).map(as_list).unwrap_or_default();
            (!items.is_empty()).then_some(RenderableValue::List(items))
        }
        ResolverKind::Image(keys) => {
            return RenderableValue::Image(first(record, keys).and_then(first_image));
        }
        ResolverKind::Gallery(keys) => {
            let refs: Vec<String> = first(record, keys)
                .map(|v| {
                    as_items(v)
                        .into_iter()
                        .filter_map(|item| image_ref(&item))
                        .collect()
                })
                .unwrap_or_default();
            (!refs.is_empty()).then_some(RenderableValue::List(refs))
        }
        ResolverKind::Scores(keys) => keys
            .iter()
            .find_map(|k| record.lookup_path(k).and_then(score_group))
            .map(|g| RenderableValue::Compound(CompoundValue::Scores(g))),
        ResolverKind::Notes(groups) => notes(record, groups),
        ResolverKind::Harvest => harvest(record),
        ResolverKind::Timeline(kind) => timeline(record, kind),
    };
    value.unwrap_or(RenderableValue::Unavailable)
}

fn first<'a>(record: &'a ReviewRecord, keys: Keys) -> Option<&'a Value> {
    keys.iter().find_map(|k| record.lookup_path(k))
}

fn scalar(v: &Value) -> Option<RenderableValue> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| RenderableValue::Text(s.to_string()))
        }
        Value::Number(n) => n.as_f64().map(RenderableValue::Number),
        Value::Bool(b) => Some(RenderableValue::Text(if *b { "yes" } else { "no" }.into())),
        Value::Object(_) => label(v).map(RenderableValue::Text),
        Value::Array(_) => {
            let items = as_list(v);
            (!items.is_empty()).then_some(RenderableValue::List(items))
        }
        Value::Null => None,
    }
}

/// Parse strings that hold JSON (`"[\"a\",\"b\"]"`); anything else is returned as is.
fn decode_json_string(v: &Value) -> Option<Value> {
    let s = v.as_str()?.trim();
    if !(s.starts_with('[') || s.starts_with('{')) {
        return None;
    }
    serde_json::from_str(s).ok()
}

/// Items of a loose list: arrays, JSON-encoded arrays, comma-separated strings, object values.
fn as_items(v: &Value) -> Vec<Value> {
    if let Some(decoded) = decode_json_string(v) {
        return as_items(&decoded);
    }
    match v {
        Value::Array(items) => items.iter().filter(|i| !i.is_null()).cloned().collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect(),
        Value::Object(map) => map.values().filter(|i| !i.is_null()).cloned().collect(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

fn as_list(v: &Value) -> Vec<String> {
    as_items(v).iter().filter_map(label).collect()
}

const LABEL_KEYS: &[&str] = &["name", "label", "cultivar", "method", "commercialName"];

/// Human-readable label of a list item.
fn label(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => LABEL_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .chain(map.values())
            .find_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })?,
        Value::Array(_) | Value::Null => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn image_ref(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["url", "src", "path"]
            .iter()
            .find_map(|k| map.get(*k)?.as_str())
            .map(str::to_string),
        _ => None,
    }
}

fn first_image(v: &Value) -> Option<String> {
    as_items(v).iter().find_map(image_ref)
}

fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// A bare number is a one-entry group; an object contributes its numeric children.
fn score_group(v: &Value) -> Option<ScoreGroup> {
    let entries: Vec<ScoreEntry> = match v {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| {
                number(v).map(|value| ScoreEntry {
                    label: k.clone(),
                    value,
                })
            })
            .collect(),
        other => number(other)
            .map(|value| ScoreEntry {
                label: "score".to_string(),
                value,
            })
            .into_iter()
            .collect(),
    };
    if entries.is_empty() {
        return None;
    }
    let average = entries.iter().map(|e| e.value).sum::<f64>() / entries.len() as f64;
    Some(ScoreGroup {
        entries,
        average: round1(average),
    })
}

fn notes(record: &ReviewRecord, groups: Groups) -> Option<RenderableValue> {
    let groups: Vec<NoteGroup> = groups
        .iter()
        .filter_map(|(label, keys)| {
            let notes = first(record, keys).map(as_list).unwrap_or_default();
            (!notes.is_empty()).then(|| NoteGroup {
                label: (*label).to_string(),
                notes,
            })
        })
        .collect();
    (!groups.is_empty()).then(|| RenderableValue::Compound(CompoundValue::Notes(NoteGroups { groups })))
}

fn harvest(record: &ReviewRecord) -> Option<RenderableValue> {
    let num = |k: &str| record.lookup(k).and_then(number);
    let summary = HarvestSummary {
        trichomes_clear: num("trichomesTranslucides"),
        trichomes_milky: num("trichomesLaiteux"),
        trichomes_amber: num("trichomesAmbres"),
        gross_weight_g: num("poidsBrut"),
        net_weight_g: num("poidsNet"),
    };
    (!summary.is_empty()).then(|| RenderableValue::Compound(CompoundValue::Harvest(summary)))
}

fn timeline(record: &ReviewRecord, kind: PipelineKind) -> Option<RenderableValue> {
    let pipeline = record.pipeline(kind)?;
    let filled: Vec<(u32, f64)> = pipeline
        .filled_cells()
        .map(|(idx, cell)| (idx, cell.intensity))
        .collect();
    if filled.is_empty() {
        return None;
    }
    let summary = TimelineSummary {
        interval: pipeline
            .interval()
            .map(|i| i.as_str().to_string())
            .unwrap_or_else(|| "cells".to_string()),
        total_cells: pipeline.total_cells(),
        filled_cells: filled.len(),
        first_filled: filled.first().map(|(i, _)| *i),
        last_filled: filled.last().map(|(i, _)| *i),
        peak_intensity: filled
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .reduce(f64::max),
    };
    Some(RenderableValue::Compound(CompoundValue::Timeline(summary)))
}

#[cfg(test)]
#[path = "../../tests/unit/fields/resolver.rs"]
mod tests;
