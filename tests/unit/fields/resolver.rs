use super::*;
use crate::fields::value::UNAVAILABLE_MARKER;
use crate::review::product::ProductType;
use serde_json::json;

fn flower(doc: Value) -> ReviewRecord {
    ReviewRecord::with_product(ProductType::Flower, doc)
}

#[test]
fn every_builtin_id_is_total_on_empty_and_garbage_records() {
    let records = [
        ReviewRecord::default(),
        flower(json!({})),
        flower(json!(null)),
        flower(json!([1, 2, 3])),
        flower(json!({
            "productName": {}, "photos": 7, "categoryRatings": "oops",
            "culturePipeline": "not json", "trichomesAmbres": "lots",
            "flowerData": "string instead of object"
        })),
    ];
    for record in &records {
        for (id, _) in TABLE {
            let _ = resolve(record, id);
        }
        assert_eq!(resolve(record, "noSuchElement"), RenderableValue::Unavailable);
    }
    assert_eq!(
        resolve(&ReviewRecord::default(), "thc").display(),
        UNAVAILABLE_MARKER
    );
}

#[test]
fn scalars_prefer_product_subdocument() {
    let r = flower(json!({"thc": 18, "flowerData": {"thc": 22.5, "productName": " Lemon "}}));
    assert_eq!(resolve(&r, "thc"), RenderableValue::Number(22.5));
    assert_eq!(resolve(&r, "productName"), RenderableValue::Text("Lemon".into()));
}

#[test]
fn loose_lists_normalize() {
    let r = flower(json!({
        "terpenes": "myrcene, limonene ,",
        "cultivarsList": "[{\"name\":\"OG\"},{\"label\":\"Kush\"}]",
        "ingredients": [{"name": "flour"}, "sugar", null, 3]
    }));
    assert_eq!(
        resolve(&r, "dominantTerpenes"),
        RenderableValue::List(vec!["myrcene".into(), "limonene".into()])
    );
    assert_eq!(resolve(&r, "genetics").display(), "OG, Kush");
    assert_eq!(resolve(&r, "ingredients").display(), "flour, sugar, 3");
}

#[test]
fn image_takes_first_reference_or_none() {
    let r = flower(json!({"photos": [{"url": "a.png"}, "b.png"]}));
    assert_eq!(resolve(&r, "photo"), RenderableValue::Image(Some("a.png".into())));
    assert_eq!(
        resolve(&r, "photos"),
        RenderableValue::List(vec!["a.png".into(), "b.png".into()])
    );
    assert_eq!(resolve(&flower(json!({})), "photo"), RenderableValue::Image(None));
}

#[test]
fn category_scores_average_numeric_children() {
    let r = flower(json!({
        "categoryRatings": {
            "visual": {"density": 6.5, "trichomes": "5.5", "color": "green"},
            "smell": 8
        }
    }));
    let RenderableValue::Compound(CompoundValue::Scores(visual)) = resolve(&r, "visual") else {
        panic!("expected scores");
    };
    assert_eq!(visual.entries.len(), 2);
    assert_eq!(visual.average, 6.0);
    assert_eq!(resolve(&r, "odor").display(), "8/10");
    assert_eq!(resolve(&r, "taste"), RenderableValue::Unavailable);
}

#[test]
fn note_groups_skip_empty_groups() {
    let r = flower(json!({
        "notesOdeursDominantes": ["citrus", "pine"],
        "sideEffects": "dry mouth"
    }));
    assert_eq!(resolve(&r, "odorNotes").display(), "Dominant: citrus, pine");
    assert_eq!(resolve(&r, "effects").display(), "Side effects: dry mouth");
    assert_eq!(resolve(&r, "tasteNotes"), RenderableValue::Unavailable);
}

#[test]
fn harvest_summary_reads_trichomes_and_weights() {
    let r = flower(json!({
        "trichomesTranslucides": 10, "trichomesLaiteux": "70", "trichomesAmbres": 20,
        "poidsNet": 42
    }));
    let RenderableValue::Compound(CompoundValue::Harvest(h)) = resolve(&r, "harvest") else {
        panic!("expected harvest");
    };
    assert_eq!(h.trichomes_milky, Some(70.0));
    assert_eq!(h.gross_weight_g, None);
    assert_eq!(h.net_weight_g, Some(42.0));
}

#[test]
fn timeline_summarizes_pipeline() {
    let r = flower(json!({
        "curingPipeline": {"intervalType": "weeks", "cells": {
            "2": {"intensity": 0.4}, "9": {"intensity": 0.9}, "60": {"intensity": 1.0}
        }}
    }));
    let RenderableValue::Compound(CompoundValue::Timeline(t)) = resolve(&r, "curing") else {
        panic!("expected timeline");
    };
    assert_eq!(t.total_cells, 52);
    assert_eq!(t.filled_cells, 2);
    assert_eq!((t.first_filled, t.last_filled), (Some(2), Some(9)));
    assert_eq!(t.peak_intensity, Some(0.9));
    assert_eq!(resolve(&r, "culture"), RenderableValue::Unavailable);
}

#[test]
fn custom_entries_extend_the_table() {
    let resolver = FieldResolver::builtin()
        .clone()
        .with("strain", ResolverKind::Scalar(&["strainName"]));
    let r = flower(json!({"strainName": "Amnesia"}));
    assert_eq!(resolver.resolve(&r, "strain").display(), "Amnesia");
    assert_eq!(resolve(&r, "strain"), RenderableValue::Unavailable);
}
