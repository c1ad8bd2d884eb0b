use std::fmt;

/// Placeholder drawn for anything that could not be resolved.
pub const UNAVAILABLE_MARKER: &str = "-";

/// A display-ready value for one template element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RenderableValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
    /// Image reference; `None` when the record has no usable image.
    Image(Option<String>),
    Compound(CompoundValue),
    Unavailable,
}

impl RenderableValue {
    pub fn is_available(&self) -> bool {
        match self {
            Self::Unavailable | Self::Image(None) => false,
            Self::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Single-line text used by the preview and exported cards.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::List(items) if !items.is_empty() => items.join(", "),
            Self::Image(Some(r)) => r.clone(),
            Self::Compound(c) => c.to_string(),
            Self::List(_) | Self::Image(None) | Self::Unavailable => UNAVAILABLE_MARKER.to_string(),
        }
    }
}

impl fmt::Display for RenderableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Structured values that need more than one line to draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CompoundValue {
    Scores(ScoreGroup),
    Notes(NoteGroups),
    Harvest(HarvestSummary),
    Timeline(TimelineSummary),
}

impl fmt::Display for CompoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scores(s) => write!(f, "{}/10", format_number(s.average)),
            Self::Notes(n) => {
                let parts: Vec<String> = n
                    .groups
                    .iter()
                    .map(|g| format!("{}: {}", g.label, g.notes.join(", ")))
                    .collect();
                f.write_str(&parts.join(" | "))
            }
            Self::Harvest(h) => {
                let mut parts = Vec::new();
                if h.has_trichomes() {
                    parts.push(format!(
                        "trichomes {}/{}/{}%",
                        opt(h.trichomes_clear),
                        opt(h.trichomes_milky),
                        opt(h.trichomes_amber)
                    ));
                }
                if let Some(g) = h.gross_weight_g {
                    parts.push(format!("gross {}g", format_number(g)));
                }
                if let Some(n) = h.net_weight_g {
                    parts.push(format!("net {}g", format_number(n)));
                }
                f.write_str(&parts.join(", "))
            }
            Self::Timeline(t) => {
                write!(f, "{}/{} {}", t.filled_cells, t.total_cells, t.interval)?;
                if let Some(peak) = t.peak_intensity {
                    write!(f, ", peak {}", format_number(peak))?;
                }
                Ok(())
            }
        }
    }
}

/// Numeric children of a score object and their mean (rounded to one decimal).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScoreGroup {
    pub entries: Vec<ScoreEntry>,
    pub average: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScoreEntry {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct NoteGroups {
    pub groups: Vec<NoteGroup>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NoteGroup {
    pub label: String,
    pub notes: Vec<String>,
}

/// Trichome maturity (percent) and harvest weights (grams).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct HarvestSummary {
    pub trichomes_clear: Option<f64>,
    pub trichomes_milky: Option<f64>,
    pub trichomes_amber: Option<f64>,
    pub gross_weight_g: Option<f64>,
    pub net_weight_g: Option<f64>,
}

impl HarvestSummary {
    pub fn has_trichomes(&self) -> bool {
        self.trichomes_clear.is_some()
            || self.trichomes_milky.is_some()
            || self.trichomes_amber.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_trichomes() && self.gross_weight_g.is_none() && self.net_weight_g.is_none()
    }
}

/// Shape of a pipeline grid, for timeline elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineSummary {
    pub interval: String,
    pub total_cells: u32,
    pub filled_cells: usize,
    pub first_filled: Option<u32>,
    pub last_filled: Option<u32>,
    pub peak_intensity: Option<f64>,
}

/// Integers print without a fraction; everything else keeps at most two decimals.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return UNAVAILABLE_MARKER.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let s = format!("{n:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn opt(v: Option<f64>) -> String {
    v.map(format_number)
        .unwrap_or_else(|| UNAVAILABLE_MARKER.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/fields/value.rs"]
mod tests;
