use std::fmt;

use crate::foundation::core::Canvas;
use crate::template::catalog::TemplateVariant;

/// Output surface an export is laid out for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Story,
    Square,
    Landscape,
    A4,
    /// Any id the platform does not know. Uses the unmodified base capacity.
    Unrecognized,
}

impl PageFormat {
    /// Map a format id to a known format; never fails.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "story" => Self::Story,
            "square" => Self::Square,
            "landscape" => Self::Landscape,
            "a4" => Self::A4,
            _ => Self::Unrecognized,
        }
    }

    /// Page size in logical pixels.
    pub fn dimensions(self) -> Option<Canvas> {
        match self {
            Self::Story => Some(Canvas::new(1080, 1920)),
            Self::Square => Some(Canvas::new(1080, 1080)),
            Self::Landscape => Some(Canvas::new(1920, 1080)),
            Self::A4 => Some(Canvas::new(2480, 3508)),
            Self::Unrecognized => None,
        }
    }

    pub fn max_pages(self) -> usize {
        match self {
            Self::Story | Self::Unrecognized => 1,
            Self::Square | Self::Landscape | Self::A4 => 9,
        }
    }

    /// `floor(base * multiplier)` for this format.
    pub fn max_elements_per_page(self, variant: TemplateVariant) -> usize {
        let base = variant.base_capacity();
        let n = match self {
            Self::Story => base / 2,
            Self::Square | Self::Unrecognized => base,
            Self::Landscape => base * 6 / 5,
            Self::A4 => base * 3 / 2,
        };
        n.max(1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Square => "square",
            Self::Landscape => "landscape",
            Self::A4 => "a4",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element ids sliced into pages.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub pages: Vec<Vec<String>>,
    pub total_pages: usize,
    pub max_elements_per_page: usize,
    pub format: PageFormat,
}

impl PagePlan {
    /// More pages than the format allows. Nothing is dropped; the caller decides.
    pub fn exceeds_format_limit(&self) -> bool {
        self.total_pages > self.format.max_pages()
    }

    pub fn page(&self, n: usize) -> Option<&[String]> {
        self.pages.get(n).map(Vec::as_slice)
    }
}

/// Slice `element_ids` into pages of at most `max_elements_per_page`.
///
/// Always returns at least one page (empty when there are no elements). Concatenating the pages
/// gives back `element_ids` unchanged.
pub fn plan<S: AsRef<str>>(
    element_ids: &[S],
    format: PageFormat,
    variant: TemplateVariant,
) -> PagePlan {
    let max = format.max_elements_per_page(variant);
    let mut pages: Vec<Vec<String>> = element_ids
        .chunks(max)
        .map(|chunk| chunk.iter().map(|s| s.as_ref().to_string()).collect())
        .collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    PagePlan {
        total_pages: pages.len(),
        pages,
        max_elements_per_page: max,
        format,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/pagination.rs"]
mod tests;
