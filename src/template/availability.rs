use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use crate::foundation::error::ExportResult;
use crate::review::product::ProductType;
use crate::template::catalog::{TemplateCatalog, TemplateVariant};

/// Data module of a review: a group of fields filled by one editor section.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DataModule {
    Profile,
    Analytics,
    Genetics,
    Culture,
    Curing,
    Separation,
    Extraction,
    Purification,
    Recipe,
    Visual,
    Smell,
    Texture,
    Taste,
    Effects,
    Branding,
}

impl DataModule {
    pub const ALL: [DataModule; 15] = [
        Self::Profile,
        Self::Analytics,
        Self::Genetics,
        Self::Culture,
        Self::Curing,
        Self::Separation,
        Self::Extraction,
        Self::Purification,
        Self::Recipe,
        Self::Visual,
        Self::Smell,
        Self::Texture,
        Self::Taste,
        Self::Effects,
        Self::Branding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Analytics => "analytics",
            Self::Genetics => "genetics",
            Self::Culture => "culture",
            Self::Curing => "curing",
            Self::Separation => "separation",
            Self::Extraction => "extraction",
            Self::Purification => "purification",
            Self::Recipe => "recipe",
            Self::Visual => "visual",
            Self::Smell => "smell",
            Self::Texture => "texture",
            Self::Taste => "taste",
            Self::Effects => "effects",
            Self::Branding => "branding",
        }
    }

    /// Module whose name is exactly `id`, if any.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == id)
    }
}

impl fmt::Display for DataModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element-to-module and product-to-module tables.
///
/// An element is available for a product iff the product's module set intersects the element's
/// module set, or the element id names one of the product's modules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    elements: BTreeMap<String, BTreeSet<DataModule>>,
    products: BTreeMap<ProductType, BTreeSet<DataModule>>,
}

static BUILTIN: LazyLock<AvailabilityMap> = LazyLock::new(build_builtin);

impl AvailabilityMap {
    pub fn builtin() -> &'static AvailabilityMap {
        &BUILTIN
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(
        mut self,
        id: impl Into<String>,
        modules: impl IntoIterator<Item = DataModule>,
    ) -> Self {
        self.elements
            .entry(id.into())
            .or_default()
            .extend(modules);
        self
    }

    pub fn with_product(
        mut self,
        product: ProductType,
        modules: impl IntoIterator<Item = DataModule>,
    ) -> Self {
        self.products.entry(product).or_default().extend(modules);
        self
    }

    pub fn product_modules(&self, product: ProductType) -> Option<&BTreeSet<DataModule>> {
        self.products.get(&product)
    }

    pub fn is_available(&self, product: ProductType, element_id: &str) -> bool {
        let Some(active) = self.products.get(&product) else {
            return false;
        };
        if DataModule::from_id(element_id).is_some_and(|m| active.contains(&m)) {
            return true;
        }
        self.elements
            .get(element_id)
            .is_some_and(|required| !required.is_disjoint(active))
    }

    /// Ids of the template's elements that are renderable for `product`, in template order.
    pub fn resolve(
        &self,
        catalog: &TemplateCatalog,
        product: ProductType,
        variant: TemplateVariant,
    ) -> Vec<String> {
        catalog
            .elements(product, variant)
            .iter()
            .filter(|el| self.is_available(product, &el.id))
            .map(|el| el.id.clone())
            .collect()
    }
}

/// Resolve available element ids against the built-in catalog and module tables.
///
/// `product` accepts the platform's aliases; unknown values fail with
/// [`crate::ExportError::UnknownProductType`].
#[tracing::instrument(level = "debug")]
pub fn resolve_available(product: &str, variant: TemplateVariant) -> ExportResult<Vec<String>> {
    let product = ProductType::parse(product)?;
    Ok(AvailabilityMap::builtin().resolve(TemplateCatalog::builtin(), product, variant))
}

fn build_builtin() -> AvailabilityMap {
    use DataModule::*;

    let common = [Profile, Visual, Smell, Texture, Taste, Effects, Branding];
    let elements: &[(&str, &[DataModule])] = &[
        ("productName", &[Profile]),
        ("photo", &[Profile]),
        ("photos", &[Profile]),
        ("overallRating", &[Profile]),
        ("notes", &[Profile]),
        ("thc", &[Analytics]),
        ("cbd", &[Analytics]),
        ("purity", &[Analytics, Visual]),
        ("terpeneProfile", &[Analytics]),
        ("dominantTerpenes", &[Analytics, Smell]),
        ("genetics", &[Genetics]),
        ("breeder", &[Genetics]),
        ("harvest", &[Culture]),
        ("hashType", &[Separation]),
        ("separationMethod", &[Separation]),
        ("meshSizes", &[Separation]),
        ("extractionMethod", &[Extraction]),
        ("purificationSteps", &[Purification]),
        ("dosage", &[Recipe]),
        ("ingredients", &[Recipe]),
        ("duration", &[Recipe, Effects]),
        ("odor", &[Smell]),
        ("odorNotes", &[Smell]),
        ("tasteNotes", &[Taste]),
        ("textureScore", &[Texture]),
        ("watermark", &[Branding]),
    ];

    let mut map = AvailabilityMap::new()
        .with_product(
            ProductType::Flower,
            common.into_iter().chain([Analytics, Genetics, Culture, Curing]),
        )
        .with_product(
            ProductType::Hash,
            common
                .into_iter()
                .chain([Analytics, Separation, Purification, Curing]),
        )
        .with_product(
            ProductType::Concentrate,
            common
                .into_iter()
                .chain([Analytics, Extraction, Purification, Curing]),
        )
        .with_product(ProductType::Edible, [Profile, Recipe, Taste, Effects, Branding]);
    for (id, modules) in elements {
        map = map.with_element(*id, modules.iter().copied());
    }
    map
}

#[cfg(test)]
#[path = "../../tests/unit/template/availability.rs"]
mod tests;
