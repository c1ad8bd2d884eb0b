use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ExportError;

/// Category of reviewed product. Drives which templates and data modules apply.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Flower,
    Hash,
    Concentrate,
    Edible,
}

impl ProductType {
    pub const ALL: [ProductType; 4] = [Self::Flower, Self::Hash, Self::Concentrate, Self::Edible];

    /// Product used when a catalog has no template set for the requested one.
    pub const DEFAULT: ProductType = ProductType::Flower;

    /// Parse a product type, accepting the platform's localized aliases.
    pub fn parse(s: &str) -> Result<Self, ExportError> {
        let norm = s.trim().to_lowercase();
        let product = match norm.as_str() {
            "flower" | "fleur" | "fleurs" => Self::Flower,
            "hash" | "kief" | "ice-o-lator" | "dry-sift" | "hash, kief, ice-o-lator, dry-sift" => {
                Self::Hash
            }
            "concentrate" | "concentré" | "concentrés" | "concentre" | "concentres" | "rosin"
            | "bho" => Self::Concentrate,
            "edible" | "comestible" | "comestibles" => Self::Edible,
            _ => return Err(ExportError::UnknownProductType(s.to_string())),
        };
        Ok(product)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flower => "flower",
            Self::Hash => "hash",
            Self::Concentrate => "concentrate",
            Self::Edible => "edible",
        }
    }

    /// Key of the product-specific sub-document inside a review record.
    pub fn data_key(self) -> &'static str {
        match self {
            Self::Flower => "flowerData",
            Self::Hash => "hashData",
            Self::Concentrate => "concentrateData",
            Self::Edible => "edibleData",
        }
    }

    /// Pipeline kinds a product of this type can carry.
    pub fn pipeline_kinds(self) -> &'static [PipelineKind] {
        match self {
            Self::Flower => &[PipelineKind::Culture, PipelineKind::Curing],
            Self::Hash => &[PipelineKind::Separation, PipelineKind::Curing],
            Self::Concentrate => &[
                PipelineKind::Extraction,
                PipelineKind::Purification,
                PipelineKind::Curing,
            ],
            Self::Edible => &[],
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Kind of time-series pipeline attached to a review.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Culture,
    Curing,
    Extraction,
    Separation,
    Purification,
}

impl PipelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Curing => "curing",
            Self::Extraction => "extraction",
            Self::Separation => "separation",
            Self::Purification => "purification",
        }
    }

    /// Review-record field holding this pipeline.
    pub fn record_key(self) -> &'static str {
        match self {
            Self::Culture => "culturePipeline",
            Self::Curing => "curingPipeline",
            Self::Extraction => "pipelineExtraction",
            Self::Separation => "pipelineSeparation",
            Self::Purification => "pipelinePurification",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "culture" => Ok(Self::Culture),
            "curing" => Ok(Self::Curing),
            "extraction" => Ok(Self::Extraction),
            "separation" => Ok(Self::Separation),
            "purification" => Ok(Self::Purification),
            other => Err(ExportError::invalid_pipeline(format!(
                "unknown pipeline kind '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/review/product.rs"]
mod tests;
