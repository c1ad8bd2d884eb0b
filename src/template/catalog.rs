use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Context as _;

use crate::foundation::error::{ExportError, ExportResult};
use crate::review::product::ProductType;

/// Complexity tier of an export layout.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    Minimal,
    Standard,
    Detailed,
    Custom,
}

impl TemplateVariant {
    pub const ALL: [TemplateVariant; 4] = [
        Self::Minimal,
        Self::Standard,
        Self::Detailed,
        Self::Custom,
    ];

    /// Elements per page before the format multiplier is applied.
    pub fn base_capacity(self) -> usize {
        match self {
            Self::Minimal => 5,
            Self::Standard => 10,
            Self::Detailed => 15,
            Self::Custom => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Detailed => "detailed",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateVariant {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            "custom" => Ok(Self::Custom),
            other => Err(ExportError::template(format!(
                "unknown template variant '{other}'"
            ))),
        }
    }
}

/// How an element slot is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    Text,
    TextBlock,
    Image,
    Gallery,
    Rating,
    Stat,
    Badge,
    List,
    Pills,
    Chart,
    BarChart,
    Radar,
    RadarMini,
    Timeline,
    Flow,
}

/// A named, typed slot in a template.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub render_kind: RenderKind,
    pub label: String,
    #[serde(rename = "position", default)]
    pub position_hint: String,
    #[serde(default)]
    pub required: bool,
}

impl ElementDescriptor {
    pub fn new(
        id: impl Into<String>,
        render_kind: RenderKind,
        label: impl Into<String>,
        position_hint: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            render_kind,
            label: label.into(),
            position_hint: position_hint.into(),
            required,
        }
    }
}

type VariantSet = BTreeMap<TemplateVariant, Vec<ElementDescriptor>>;

/// Immutable template definitions keyed by product then variant.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    sets: BTreeMap<ProductType, VariantSet>,
}

static BUILTIN: LazyLock<TemplateCatalog> = LazyLock::new(build_builtin);

impl TemplateCatalog {
    /// Predefined templates shipped with the platform.
    pub fn builtin() -> &'static TemplateCatalog {
        &BUILTIN
    }

    /// Build a catalog from explicit sets, validating it.
    pub fn from_sets(sets: BTreeMap<ProductType, VariantSet>) -> ExportResult<Self> {
        let catalog = Self { sets };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_reader(reader: impl Read) -> ExportResult<Self> {
        let catalog: Self = serde_json::from_reader(reader)
            .map_err(|e| ExportError::template(format!("parse template catalog JSON: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open template catalog '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject empty ids and duplicate ids within one variant.
    pub fn validate(&self) -> ExportResult<()> {
        for (product, variants) in &self.sets {
            for (variant, elements) in variants {
                let mut seen = BTreeSet::new();
                for el in elements {
                    if el.id.trim().is_empty() {
                        return Err(ExportError::template(format!(
                            "{product}/{variant}: element id must be non-empty"
                        )));
                    }
                    if !seen.insert(el.id.as_str()) {
                        return Err(ExportError::template(format!(
                            "{product}/{variant}: duplicate element id '{}'",
                            el.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Ordered element descriptors for `(product, variant)`.
    ///
    /// Falls back to the product's `Minimal` variant when the variant is absent, and to
    /// [`ProductType::DEFAULT`] when the product has no template set. Empty when neither exists.
    pub fn elements(&self, product: ProductType, variant: TemplateVariant) -> &[ElementDescriptor] {
        let Some(set) = self
            .sets
            .get(&product)
            .or_else(|| self.sets.get(&ProductType::DEFAULT))
        else {
            return &[];
        };
        set.get(&variant)
            .or_else(|| set.get(&TemplateVariant::Minimal))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Variants explicitly defined for a product.
    pub fn variants(&self, product: ProductType) -> Vec<TemplateVariant> {
        self.sets
            .get(&product)
            .map(|s| s.keys().copied().collect())
            .unwrap_or_default()
    }
}

type Row = (&'static str, RenderKind, &'static str, &'static str, bool);

const FLOWER_MINIMAL: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center", true),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-center", false),
    ("thc", RenderKind::Stat, "THC %", "top-right", false),
    ("cbd", RenderKind::Stat, "CBD %", "top-left", false),
];

const FLOWER_STANDARD: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center-main", true),
    ("genetics", RenderKind::Text, "Genetics", "below-title", false),
    ("thc", RenderKind::Stat, "THC %", "sidebar-top", false),
    ("cbd", RenderKind::Stat, "CBD %", "sidebar-top", false),
    ("dominantTerpenes", RenderKind::List, "Dominant terpenes", "sidebar-middle", false),
    ("odorNotes", RenderKind::Pills, "Aromas", "bottom-section", false),
    ("tasteNotes", RenderKind::Pills, "Tastes", "bottom-section", false),
    ("effects", RenderKind::Pills, "Effects", "bottom-section", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-right", false),
];

const FLOWER_DETAILED: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "header", true),
    ("photos", RenderKind::Gallery, "Photo gallery", "main-grid", true),
    ("genetics", RenderKind::Text, "Genetics", "header-sub", false),
    ("breeder", RenderKind::Text, "Breeder", "header-sub", false),
    ("analytics", RenderKind::Chart, "Lab analytics", "sidebar-full", false),
    ("visual", RenderKind::Radar, "Visual", "section-1", false),
    ("odor", RenderKind::Radar, "Aromas", "section-2", false),
    ("texture", RenderKind::Radar, "Texture", "section-3", false),
    ("taste", RenderKind::Radar, "Tastes", "section-4", false),
    ("effects", RenderKind::Radar, "Effects", "section-5", false),
    ("culture", RenderKind::Timeline, "Culture pipeline", "bottom-full", false),
    ("curing", RenderKind::Timeline, "Curing", "bottom-full", false),
    ("terpeneProfile", RenderKind::BarChart, "Terpene profile", "sidebar-bottom", false),
    ("notes", RenderKind::TextBlock, "Personal notes", "footer", false),
    ("watermark", RenderKind::Image, "Watermark", "overlay-bottom-right", false),
];

const HASH_MINIMAL: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center", true),
    ("hashType", RenderKind::Badge, "Hash type", "top-left", false),
    ("purity", RenderKind::Stat, "Purity %", "top-right", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-center", false),
];

const HASH_STANDARD: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center-main", true),
    ("hashType", RenderKind::Badge, "Hash type", "header-badge", false),
    ("separationMethod", RenderKind::Text, "Separation method", "below-title", false),
    ("purity", RenderKind::Stat, "Purity %", "sidebar-top", false),
    ("meshSizes", RenderKind::List, "Mesh sizes", "sidebar-middle", false),
    ("odorNotes", RenderKind::Pills, "Aromas", "bottom-section", false),
    ("textureScore", RenderKind::RadarMini, "Texture", "sidebar-bottom", false),
    ("effects", RenderKind::Pills, "Effects", "bottom-section", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-right", false),
];

const HASH_DETAILED: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "header", true),
    ("photos", RenderKind::Gallery, "Photo gallery", "main-grid", true),
    ("hashType", RenderKind::Badge, "Hash type", "header-badge", false),
    ("separation", RenderKind::Timeline, "Separation pipeline", "section-1", false),
    ("purification", RenderKind::Flow, "Purification", "section-2", false),
    ("visual", RenderKind::Radar, "Visual", "section-3", false),
    ("odor", RenderKind::Radar, "Aromas", "section-4", false),
    ("texture", RenderKind::Radar, "Texture", "section-5", false),
    ("taste", RenderKind::Radar, "Tastes", "section-6", false),
    ("effects", RenderKind::Radar, "Effects", "section-7", false),
    ("curing", RenderKind::Timeline, "Curing", "bottom-full", false),
    ("notes", RenderKind::TextBlock, "Personal notes", "footer", false),
    ("watermark", RenderKind::Image, "Watermark", "overlay-bottom-right", false),
];

const CONCENTRATE_MINIMAL: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center", true),
    ("extractionMethod", RenderKind::Badge, "Extraction method", "top-left", false),
    ("purity", RenderKind::Stat, "Purity %", "top-right", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-center", false),
];

const CONCENTRATE_STANDARD: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center-main", true),
    ("extractionMethod", RenderKind::Badge, "Extraction method", "header-badge", false),
    ("purity", RenderKind::Stat, "Purity %", "sidebar-top", false),
    ("purificationSteps", RenderKind::List, "Purification steps", "sidebar-middle", false),
    ("odorNotes", RenderKind::Pills, "Aromas", "bottom-section", false),
    ("textureScore", RenderKind::RadarMini, "Texture", "sidebar-bottom", false),
    ("effects", RenderKind::Pills, "Effects", "bottom-section", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-right", false),
];

const CONCENTRATE_DETAILED: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "header", true),
    ("photos", RenderKind::Gallery, "Photo gallery", "main-grid", true),
    ("extractionMethod", RenderKind::Badge, "Extraction method", "header-badge", false),
    ("extraction", RenderKind::Timeline, "Extraction pipeline", "section-1", false),
    ("purification", RenderKind::Flow, "Purification pipeline", "section-2", false),
    ("visual", RenderKind::Radar, "Visual", "section-3", false),
    ("odor", RenderKind::Radar, "Aromas", "section-4", false),
    ("texture", RenderKind::Radar, "Texture", "section-5", false),
    ("taste", RenderKind::Radar, "Tastes", "section-6", false),
    ("effects", RenderKind::Radar, "Effects", "section-7", false),
    ("curing", RenderKind::Timeline, "Curing", "bottom-full", false),
    ("notes", RenderKind::TextBlock, "Personal notes", "footer", false),
    ("watermark", RenderKind::Image, "Watermark", "overlay-bottom-right", false),
];

const EDIBLE_MINIMAL: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center", true),
    ("dosage", RenderKind::Stat, "Dosage mg", "top-right", false),
    ("effects", RenderKind::Pills, "Effects", "bottom-section", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-center", false),
];

const EDIBLE_STANDARD: &[Row] = &[
    ("productName", RenderKind::Text, "Product name", "top-center", true),
    ("photo", RenderKind::Image, "Main photo", "center-main", true),
    ("dosage", RenderKind::Stat, "Dosage mg", "sidebar-top", false),
    ("ingredients", RenderKind::List, "Ingredients", "sidebar-middle", false),
    ("tasteNotes", RenderKind::Pills, "Flavours", "bottom-section", false),
    ("effects", RenderKind::Pills, "Effects", "bottom-section", false),
    ("duration", RenderKind::Badge, "Effect duration", "sidebar-bottom", false),
    ("overallRating", RenderKind::Rating, "Overall rating", "bottom-right", false),
];

fn rows(rows: &[Row]) -> Vec<ElementDescriptor> {
    rows.iter()
        .map(|&(id, kind, label, pos, required)| {
            ElementDescriptor::new(id, kind, label, pos, required)
        })
        .collect()
}

fn build_builtin() -> TemplateCatalog {
    use TemplateVariant::{Detailed, Minimal, Standard};

    let table: [(ProductType, &[(TemplateVariant, &[Row])]); 4] = [
        (
            ProductType::Flower,
            &[
                (Minimal, FLOWER_MINIMAL),
                (Standard, FLOWER_STANDARD),
                (Detailed, FLOWER_DETAILED),
            ],
        ),
        (
            ProductType::Hash,
            &[
                (Minimal, HASH_MINIMAL),
                (Standard, HASH_STANDARD),
                (Detailed, HASH_DETAILED),
            ],
        ),
        (
            ProductType::Concentrate,
            &[
                (Minimal, CONCENTRATE_MINIMAL),
                (Standard, CONCENTRATE_STANDARD),
                (Detailed, CONCENTRATE_DETAILED),
            ],
        ),
        (
            ProductType::Edible,
            &[(Minimal, EDIBLE_MINIMAL), (Standard, EDIBLE_STANDARD)],
        ),
    ];

    let sets = table
        .iter()
        .map(|(product, variants)| {
            let set = variants.iter().map(|(v, r)| (*v, rows(r))).collect();
            (*product, set)
        })
        .collect();
    TemplateCatalog { sets }
}

#[cfg(test)]
#[path = "../../tests/unit/template/catalog.rs"]
mod tests;
