use super::*;

#[test]
fn parse_accepts_localized_aliases_case_insensitively() {
    assert_eq!(ProductType::parse("Fleurs").unwrap(), ProductType::Flower);
    assert_eq!(ProductType::parse(" flower ").unwrap(), ProductType::Flower);
    assert_eq!(ProductType::parse("Dry-Sift").unwrap(), ProductType::Hash);
    assert_eq!(ProductType::parse("Concentrés").unwrap(), ProductType::Concentrate);
    assert_eq!(ProductType::parse("BHO").unwrap(), ProductType::Concentrate);
    assert_eq!(ProductType::parse("Comestibles").unwrap(), ProductType::Edible);
}

#[test]
fn parse_rejects_unknown_products() {
    let err = ProductType::parse("tincture").unwrap_err();
    assert!(matches!(err, ExportError::UnknownProductType(ref s) if s == "tincture"));
}

#[test]
fn pipeline_kinds_follow_product() {
    assert_eq!(
        ProductType::Flower.pipeline_kinds(),
        &[PipelineKind::Culture, PipelineKind::Curing]
    );
    assert!(ProductType::Edible.pipeline_kinds().is_empty());
    assert_eq!("Curing".parse::<PipelineKind>().unwrap(), PipelineKind::Curing);
    assert!("recipe".parse::<PipelineKind>().is_err());
}
