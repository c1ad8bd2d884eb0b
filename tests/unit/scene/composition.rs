use super::*;

fn grid(n: u32) -> PipelineGrid {
    let cells = (0..n)
        .map(|index| GridCell {
            index,
            intensity: f64::from(index) / f64::from(n),
            highlighted: false,
        })
        .collect();
    PipelineGrid::new(Rect::new(0.0, 0.0, 200.0, 100.0), cells)
}

fn comp_with_grid(n: u32) -> Composition {
    Composition::new(Canvas::new(200, 100), Rgba8::WHITE).with_node(Node::PipelineGrid(grid(n)))
}

#[test]
fn highlight_resets_all_other_cells() {
    let mut comp = comp_with_grid(12);
    assert!(comp.highlight_cell(3));
    assert!(comp.highlight_cell(7));
    let g = comp.grids().next().unwrap();
    assert_eq!(g.highlighted(), Some(7));
    assert_eq!(g.cells.iter().filter(|c| c.highlighted).count(), 1);

    assert!(!comp.highlight_cell(99));
    assert_eq!(comp.grids().next().unwrap().highlighted(), None);

    comp.highlight_cell(2);
    comp.clear_highlight();
    assert_eq!(comp.grids().next().unwrap().highlighted(), None);
}

#[test]
fn grid_layout_fits_all_cells() {
    let g = grid(365);
    assert!(g.columns as usize * g.rows() as usize >= 365);
    let last = g.cell_rect(364);
    assert!(last.x1 <= 200.0 + 1e-9 && last.y1 <= 100.0 + 1e-9);
}

#[test]
fn empty_means_nothing_to_draw() {
    assert!(Composition::new(Canvas::new(10, 10), Rgba8::WHITE).is_empty());
    assert!(!comp_with_grid(1).is_empty());
    let zero = Composition::new(Canvas::new(0, 10), Rgba8::WHITE).with_node(Node::PipelineGrid(grid(1)));
    assert!(zero.is_empty());
}

#[test]
fn svg_scales_pixel_size_but_keeps_viewbox() {
    let svg = comp_with_grid(4).to_svg(3.0);
    assert!(svg.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="300" viewBox="0 0 200 100">"#
    ));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn highlighted_cell_is_drawn_last_with_accent_stroke() {
    let mut comp = comp_with_grid(4);
    comp.highlight_cell(1);
    let svg = comp.to_svg(1.0);
    let stroke = format!(r#"stroke="{}""#, HIGHLIGHT.to_hex_rgb());
    assert_eq!(svg.matches(&stroke).count(), 1);
    let last_rect = svg.rfind("<rect").unwrap();
    assert!(svg[last_rect..].contains(&stroke));
}

#[test]
fn text_is_xml_escaped() {
    let comp = Composition::new(Canvas::new(10, 10), Rgba8::WHITE).with_node(Node::Card(CardNode {
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
        label: "<b>".into(),
        value: "Tom & \"Jerry\"".into(),
    }));
    let svg = comp.to_svg(1.0);
    assert!(svg.contains("&lt;b&gt;"));
    assert!(svg.contains("Tom &amp; &quot;Jerry&quot;"));
}

#[test]
fn num_is_compact() {
    assert_eq!(num(12.0), "12");
    assert_eq!(num(0.25), "0.25");
    assert_eq!(num(-0.0001), "0");
    assert_eq!(num(f64::NAN), "0");
}
