use super::*;

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("el{i}")).collect()
}

#[test]
fn capacity_table() {
    use TemplateVariant::*;
    let cases = [
        (PageFormat::Story, Minimal, 2),
        (PageFormat::Story, Custom, 10),
        (PageFormat::Square, Standard, 10),
        (PageFormat::Landscape, Minimal, 6),
        (PageFormat::Landscape, Detailed, 18),
        (PageFormat::A4, Minimal, 7),
        (PageFormat::A4, Detailed, 22),
        (PageFormat::A4, Custom, 30),
        (PageFormat::Unrecognized, Detailed, 15),
    ];
    for (format, variant, want) in cases {
        assert_eq!(format.max_elements_per_page(variant), want, "{format}/{variant}");
    }
}

#[test]
fn pages_concatenate_back_to_input() {
    for n in [0usize, 1, 5, 7, 22, 31] {
        for format in [PageFormat::Story, PageFormat::Square, PageFormat::A4] {
            let input = ids(n);
            let plan = plan(&input, format, TemplateVariant::Minimal);
            let flat: Vec<String> = plan.pages.concat();
            assert_eq!(flat, input);
            let max = plan.max_elements_per_page;
            assert_eq!(plan.total_pages, n.div_ceil(max).max(1));
            assert!(plan.pages.iter().all(|p| p.len() <= max));
        }
    }
}

#[test]
fn zero_elements_make_one_empty_page() {
    let plan = plan::<&str>(&[], PageFormat::Square, TemplateVariant::Standard);
    assert_eq!(plan.total_pages, 1);
    assert_eq!(plan.page(0), Some(&[][..]));
}

#[test]
fn story_is_limited_to_one_page() {
    let plan = plan(&ids(5), PageFormat::Story, TemplateVariant::Minimal);
    assert_eq!(plan.total_pages, 3);
    assert_eq!(plan.page(2).unwrap(), ["el4".to_string()]);
    assert!(plan.exceeds_format_limit());
    assert!(!super::plan(&ids(5), PageFormat::Square, TemplateVariant::Minimal).exceeds_format_limit());
}

#[test]
fn format_ids_and_dimensions() {
    assert_eq!(PageFormat::from_id("A4"), PageFormat::A4);
    assert_eq!(PageFormat::from_id("banner"), PageFormat::Unrecognized);
    assert_eq!(PageFormat::Story.dimensions(), Some(Canvas::new(1080, 1920)));
    assert_eq!(PageFormat::Unrecognized.dimensions(), None);
}
