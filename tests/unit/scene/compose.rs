use super::*;
use crate::review::pipeline::{IntervalType, PipelineCell};
use crate::review::product::ProductType;
use crate::template::catalog::{RenderKind, TemplateCatalog, TemplateVariant};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn page_has_title_and_one_node_per_element() {
    let record = ReviewRecord::with_product(
        ProductType::Flower,
        json!({"productName": "Lemon Haze", "thc": 21, "photo": "lemon.png"}),
    );
    let ctx = PageContext {
        record: &record,
        resolver: FieldResolver::builtin(),
        format: PageFormat::Square,
        background: Rgba8::WHITE,
    };
    let elements: Vec<&ElementDescriptor> = TemplateCatalog::builtin()
        .elements(ProductType::Flower, TemplateVariant::Minimal)
        .iter()
        .collect();
    let comp = compose_page(&ctx, &elements);
    assert_eq!(comp.canvas(), Canvas::new(1080, 1080));
    assert_eq!(comp.nodes().len(), 1 + elements.len());
    assert!(matches!(&comp.nodes()[2], Node::Image(i) if i.href == "lemon.png"));

    let svg = comp.to_svg(1.0);
    assert!(svg.contains("Lemon Haze"));
    assert!(svg.contains(">21</text>"));
    // cbd is missing and drawn with the placeholder
    assert!(svg.contains(">-</text>"));
}

#[test]
fn unknown_format_uses_fallback_canvas() {
    let record = ReviewRecord::default();
    let ctx = PageContext {
        record: &record,
        resolver: FieldResolver::builtin(),
        format: PageFormat::Unrecognized,
        background: Rgba8::BLACK,
    };
    let el = ElementDescriptor::new("notes", RenderKind::TextBlock, "Notes", "", false);
    let comp = compose_page(&ctx, &[&el]);
    assert_eq!(comp.canvas(), FALLBACK_CANVAS);
    assert_eq!(comp.background(), Rgba8::BLACK);
}

#[test]
fn nameless_record_without_elements_composes_nothing() {
    let record = ReviewRecord::with_product(ProductType::Flower, json!({"productName": "  "}));
    let ctx = PageContext {
        record: &record,
        resolver: FieldResolver::builtin(),
        format: PageFormat::Square,
        background: Rgba8::WHITE,
    };
    let comp = compose_page(&ctx, &[]);
    assert!(comp.nodes().is_empty());
    assert!(comp.is_empty());
}

#[test]
fn pipeline_grid_covers_every_index_and_normalizes_intensity() {
    let cells = BTreeMap::from([
        (
            0,
            PipelineCell {
                intensity: 5.0,
                ..PipelineCell::default()
            },
        ),
        (
            3,
            PipelineCell {
                intensity: 10.0,
                ..PipelineCell::default()
            },
        ),
    ]);
    let pipeline = PipelineData::new(IntervalType::Months, cells);
    let comp = compose_pipeline(&pipeline, "Curing", Canvas::new(800, 600), Rgba8::WHITE);
    let grid = comp.grids().next().unwrap();
    assert_eq!(grid.cells.len(), 12);
    assert_eq!(grid.cells[0].intensity, 0.5);
    assert_eq!(grid.cells[3].intensity, 1.0);
    assert_eq!(grid.cells[1].intensity, 0.0);
    assert!(!comp.is_empty());
}
