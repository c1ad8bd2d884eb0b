use std::fmt::Write as _;

use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::watermark::WatermarkOverlay;

/// Accent used for highlighted pipeline cells.
pub const HIGHLIGHT: Rgba8 = Rgba8::rgb(0x7c, 0x3a, 0xed);

/// Scale applied to a highlighted cell around its center.
pub const HIGHLIGHT_SCALE: f64 = 1.2;

const INK: Rgba8 = Rgba8::rgb(0x11, 0x18, 0x27);
const MUTED: Rgba8 = Rgba8::rgb(0x6b, 0x72, 0x80);
const CARD: Rgba8 = Rgba8::rgb(0xf9, 0xfa, 0xfb);
const NEUTRAL_CELL: Rgba8 = Rgba8::rgb(0xe5, 0xe7, 0xeb);

/// Live visual composition: what the preview shows and what exports capture.
///
/// Geometry is in logical pixels; oversampling happens at capture time.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    canvas: Canvas,
    background: Rgba8,
    nodes: Vec<Node>,
    overlay: Option<WatermarkOverlay>,
}

/// One drawable item.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(TextNode),
    Card(CardNode),
    Image(ImageNode),
    PipelineGrid(PipelineGrid),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub pos: Point,
    pub text: String,
    pub size: f64,
    pub color: Rgba8,
    pub anchor: TextAnchor,
    pub bold: bool,
}

/// Labelled value box.
#[derive(Clone, Debug, PartialEq)]
pub struct CardNode {
    pub rect: Rect,
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageNode {
    pub rect: Rect,
    pub href: String,
    pub opacity: f64,
}

/// Grid of pipeline cells, one per time index.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineGrid {
    pub rect: Rect,
    pub columns: u32,
    pub cells: Vec<GridCell>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub index: u32,
    /// Normalized to `0.0..=1.0`.
    pub intensity: f64,
    pub highlighted: bool,
}

impl PipelineGrid {
    /// Lay `cells` out row-major inside `rect` with a near-square column count.
    pub fn new(rect: Rect, cells: Vec<GridCell>) -> Self {
        let n = cells.len().max(1) as f64;
        let aspect = (rect.width() / rect.height().max(1.0)).max(0.1);
        let columns = (n * aspect).sqrt().ceil().clamp(1.0, n) as u32;
        Self {
            rect,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> u32 {
        (self.cells.len() as u32).div_ceil(self.columns.max(1)).max(1)
    }

    fn cell_size(&self) -> f64 {
        let w = self.rect.width() / f64::from(self.columns.max(1));
        let h = self.rect.height() / f64::from(self.rows());
        w.min(h)
    }

    /// Rectangle of the `pos`-th cell (layout position, not time index).
    pub fn cell_rect(&self, pos: usize) -> Rect {
        let size = self.cell_size();
        let cols = self.columns.max(1) as usize;
        let x = self.rect.x0 + (pos % cols) as f64 * size;
        let y = self.rect.y0 + (pos / cols) as f64 * size;
        Rect::new(x, y, x + size, y + size)
    }

    pub fn highlighted(&self) -> Option<u32> {
        self.cells.iter().find(|c| c.highlighted).map(|c| c.index)
    }
}

impl Composition {
    pub fn new(canvas: Canvas, background: Rgba8) -> Self {
        Self {
            canvas,
            background,
            nodes: Vec::new(),
            overlay: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn background(&self) -> Rgba8 {
        self.background
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.push(node);
        self
    }

    /// Nothing to draw: zero-sized canvas or no nodes. The watermark does not count.
    pub fn is_empty(&self) -> bool {
        self.canvas.is_empty() || self.nodes.is_empty()
    }

    pub fn overlay(&self) -> Option<&WatermarkOverlay> {
        self.overlay.as_ref()
    }

    /// Replace the single overlay slot. Only the watermark compositor writes here.
    pub(crate) fn set_overlay(&mut self, overlay: Option<WatermarkOverlay>) {
        self.overlay = overlay;
    }

    /// Highlight the cell with time index `index` in every pipeline grid, resetting all others.
    ///
    /// Returns `false` when no grid has that index (all cells are still reset).
    pub fn highlight_cell(&mut self, index: u32) -> bool {
        let mut found = false;
        for grid in self.grids_mut() {
            for cell in &mut grid.cells {
                cell.highlighted = cell.index == index;
                found |= cell.highlighted;
            }
        }
        found
    }

    pub fn clear_highlight(&mut self) {
        for grid in self.grids_mut() {
            for cell in &mut grid.cells {
                cell.highlighted = false;
            }
        }
    }

    pub fn grids(&self) -> impl Iterator<Item = &PipelineGrid> {
        self.nodes.iter().filter_map(|n| match n {
            Node::PipelineGrid(g) => Some(g),
            _ => None,
        })
    }

    fn grids_mut(&mut self) -> impl Iterator<Item = &mut PipelineGrid> {
        self.nodes.iter_mut().filter_map(|n| match n {
            Node::PipelineGrid(g) => Some(g),
            _ => None,
        })
    }

    /// Emit the scene as an SVG document whose pixel size is the canvas times `scale`.
    pub fn to_svg(&self, scale: f64) -> String {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut out = String::with_capacity(1024 + self.nodes.len() * 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {w} {h}">"#,
            num(f64::from(w) * scale),
            num(f64::from(h) * scale),
        );
        let _ = write!(
            out,
            r#"<rect width="{w}" height="{h}" fill="{}"{}/>"#,
            self.background.to_hex_rgb(),
            opacity_attr("fill-opacity", self.background.a),
        );
        for node in &self.nodes {
            write_node(&mut out, node);
        }
        if let Some(overlay) = &self.overlay {
            overlay.write_svg(&mut out, self.canvas);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => write_text(out, t),
        Node::Card(c) => {
            let r = c.rect;
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="12" fill="{}" stroke="{}" stroke-width="1"/>"#,
                num(r.x0),
                num(r.y0),
                num(r.width()),
                num(r.height()),
                CARD.to_hex_rgb(),
                NEUTRAL_CELL.to_hex_rgb(),
            );
            let pad = (r.height() * 0.18).clamp(8.0, 24.0);
            let label_size = (r.height() * 0.2).clamp(10.0, 28.0);
            write_text(
                out,
                &TextNode {
                    pos: Point::new(r.x0 + pad, r.y0 + pad + label_size),
                    text: c.label.clone(),
                    size: label_size,
                    color: MUTED,
                    anchor: TextAnchor::Start,
                    bold: false,
                },
            );
            write_text(
                out,
                &TextNode {
                    pos: Point::new(r.x0 + pad, r.y1 - pad),
                    text: c.value.clone(),
                    size: label_size * 1.4,
                    color: INK,
                    anchor: TextAnchor::Start,
                    bold: true,
                },
            );
        }
        Node::Image(i) => {
            let r = i.rect;
            let _ = write!(
                out,
                r#"<image x="{}" y="{}" width="{}" height="{}" href="{}" opacity="{}" preserveAspectRatio="xMidYMid slice"/>"#,
                num(r.x0),
                num(r.y0),
                num(r.width()),
                num(r.height()),
                escape_xml(&i.href),
                num(i.opacity.clamp(0.0, 1.0)),
            );
        }
        Node::PipelineGrid(g) => write_grid(out, g),
    }
}

fn write_grid(out: &mut String, g: &PipelineGrid) {
    let gap = (g.cell_size() * 0.12).max(0.5);
    let mut highlighted = None;
    for (pos, cell) in g.cells.iter().enumerate() {
        let r = g.cell_rect(pos).inset(-gap / 2.0);
        if cell.highlighted {
            highlighted = Some(r);
            continue;
        }
        write_cell(out, r, cell.intensity, None);
    }
    // drawn last so the enlarged cell sits above its neighbours
    if let Some(r) = highlighted {
        let c = r.center();
        let (hw, hh) = (
            r.width() * HIGHLIGHT_SCALE / 2.0,
            r.height() * HIGHLIGHT_SCALE / 2.0,
        );
        let big = Rect::new(c.x - hw, c.y - hh, c.x + hw, c.y + hh);
        let intensity = g
            .cells
            .iter()
            .find(|c| c.highlighted)
            .map(|c| c.intensity)
            .unwrap_or(0.0);
        write_cell(out, big, intensity, Some(HIGHLIGHT));
    }
}

fn write_cell(out: &mut String, r: Rect, intensity: f64, stroke: Option<Rgba8>) {
    let intensity = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (fill, opacity) = if intensity > 0.0 {
        (HIGHLIGHT, 0.2 + 0.8 * intensity)
    } else {
        (NEUTRAL_CELL, 1.0)
    };
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" fill-opacity="{}""#,
        num(r.x0),
        num(r.y0),
        num(r.width()),
        num(r.height()),
        num(r.width() * 0.15),
        fill.to_hex_rgb(),
        num(opacity),
    );
    if let Some(s) = stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            s.to_hex_rgb(),
            num((r.width() * 0.12).max(1.0))
        );
    }
    out.push_str("/>");
}

fn write_text(out: &mut String, t: &TextNode) {
    if t.text.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" fill="{}" text-anchor="{}"{}>{}</text>"#,
        num(t.pos.x),
        num(t.pos.y),
        num(t.size),
        t.color.to_hex_rgb(),
        t.anchor.as_svg(),
        if t.bold { r#" font-weight="bold""# } else { "" },
        escape_xml(&t.text),
    );
}

fn opacity_attr(name: &str, a: u8) -> String {
    if a == 255 {
        String::new()
    } else {
        format!(r#" {name}="{}""#, num(f64::from(a) / 255.0))
    }
}

/// Compact decimal for SVG attributes.
pub(crate) fn num(v: f64) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composition.rs"]
mod tests;
