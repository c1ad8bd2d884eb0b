use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::foundation::error::ExportResult;
use crate::review::pipeline::PipelineData;
use crate::review::product::{PipelineKind, ProductType};

/// Read-only review document bound to an export.
///
/// The document is loosely typed: fields may be missing, `null`, JSON-encoded strings or
/// objects of unexpected shape. Lookups never fail; they return `None` for anything absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewRecord {
    product: Option<ProductType>,
    doc: Value,
}

impl ReviewRecord {
    /// Wrap a document, inferring the product from its `type` / `productType` field.
    pub fn new(doc: Value) -> Self {
        let product = ["productType", "type"]
            .iter()
            .filter_map(|k| doc.get(*k).and_then(Value::as_str))
            .find_map(|s| ProductType::parse(s).ok());
        Self { product, doc }
    }

    pub fn with_product(product: ProductType, doc: Value) -> Self {
        Self {
            product: Some(product),
            doc,
        }
    }

    pub fn from_reader(reader: impl Read) -> ExportResult<Self> {
        let doc: Value = serde_json::from_reader(reader).context("parse review JSON")?;
        Ok(Self::new(doc))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open review JSON '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn product(&self) -> Option<ProductType> {
        self.product
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// Product-specific sub-document (`flowerData`, `hashData`, ...), if present and an object.
    pub fn product_doc(&self) -> Option<&Value> {
        let key = self.product?.data_key();
        self.doc.get(key).filter(|v| v.is_object())
    }

    /// Look a field up, preferring the product sub-document over top-level fields.
    ///
    /// `null` counts as absent so a null in the sub-document does not hide a top-level value.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.product_doc()
            .and_then(|sub| present(sub.get(key)))
            .or_else(|| present(self.doc.get(key)))
    }

    /// First present field among `keys`.
    pub fn lookup_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|k| self.lookup(k))
    }

    /// Dot-separated path lookup (`categoryRatings.visual`). The head segment goes through
    /// [`ReviewRecord::lookup`]; nested objects encoded as JSON strings are not descended.
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut cur = self.lookup(head)?;
        for seg in segments {
            cur = present(cur.get(seg))?;
        }
        Some(cur)
    }

    /// Display name used for filenames and titles.
    pub fn display_name(&self) -> Option<String> {
        self.lookup_any(&["productName", "nomCommercial", "holderName", "name"])
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Pipeline of the given kind, decoded from the record. Malformed pipelines read as absent.
    pub fn pipeline(&self, kind: PipelineKind) -> Option<PipelineData> {
        let raw = self.lookup(kind.record_key())?;
        match raw {
            Value::String(s) => serde_json::from_str::<Value>(s)
                .ok()
                .and_then(|v| PipelineData::from_value(&v).ok()),
            other => PipelineData::from_value(other).ok(),
        }
    }
}

fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| !v.is_null())
}

#[cfg(test)]
#[path = "../../tests/unit/review/record.rs"]
mod tests;
