use super::*;

fn ids(elements: &[ElementDescriptor]) -> Vec<&str> {
    elements.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn builtin_catalog_is_valid_and_sized_per_variant() {
    let cat = TemplateCatalog::builtin();
    cat.validate().unwrap();
    for product in ProductType::ALL {
        for variant in cat.variants(product) {
            let n = cat.elements(product, variant).len();
            assert!(n <= variant.base_capacity(), "{product}/{variant} has {n}");
        }
    }
    assert_eq!(cat.elements(ProductType::Flower, TemplateVariant::Detailed).len(), 15);
}

#[test]
fn missing_variant_falls_back_to_minimal() {
    let cat = TemplateCatalog::builtin();
    let custom = cat.elements(ProductType::Flower, TemplateVariant::Custom);
    let minimal = cat.elements(ProductType::Flower, TemplateVariant::Minimal);
    assert_eq!(ids(custom), ids(minimal));

    let edible = cat.elements(ProductType::Edible, TemplateVariant::Detailed);
    assert_eq!(edible, cat.elements(ProductType::Edible, TemplateVariant::Minimal));
}

#[test]
fn missing_product_falls_back_to_default_product() {
    let json = r#"{
        "flower": {"minimal": [
            {"id": "productName", "type": "text", "label": "Name", "position": "top", "required": true}
        ]}
    }"#;
    let cat = TemplateCatalog::from_reader(json.as_bytes()).unwrap();
    let got = cat.elements(ProductType::Hash, TemplateVariant::Standard);
    assert_eq!(ids(got), vec!["productName"]);
    assert!(got[0].required);
}

#[test]
fn empty_catalog_yields_no_elements() {
    let cat = TemplateCatalog::default();
    assert!(cat.elements(ProductType::Hash, TemplateVariant::Minimal).is_empty());
}

#[test]
fn duplicate_ids_are_rejected_on_load() {
    let json = r#"{
        "hash": {"standard": [
            {"id": "photo", "type": "image", "label": "A"},
            {"id": "photo", "type": "gallery", "label": "B"}
        ]}
    }"#;
    let err = TemplateCatalog::from_reader(json.as_bytes()).unwrap_err();
    assert!(matches!(err, ExportError::Template(ref m) if m.contains("duplicate element id 'photo'")));
}

#[test]
fn render_kinds_use_kebab_case() {
    let el: ElementDescriptor = serde_json::from_str(
        r#"{"id": "textureScore", "type": "radar-mini", "label": "Texture"}"#,
    )
    .unwrap();
    assert_eq!(el.render_kind, RenderKind::RadarMini);
    assert_eq!(el.position_hint, "");
    assert!(!el.required);
}

#[test]
fn variant_parsing() {
    assert_eq!("Detailed".parse::<TemplateVariant>().unwrap(), TemplateVariant::Detailed);
    assert!("fancy".parse::<TemplateVariant>().is_err());
}
