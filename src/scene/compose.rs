//! Builders turning review data into compositions.

use crate::fields::resolver::FieldResolver;
use crate::fields::value::RenderableValue;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::review::pipeline::PipelineData;
use crate::review::record::ReviewRecord;
use crate::scene::composition::{
    CardNode, Composition, GridCell, ImageNode, Node, PipelineGrid, TextAnchor, TextNode,
};
use crate::template::catalog::ElementDescriptor;
use crate::template::pagination::PageFormat;

/// Canvas used when the page format has no geometry of its own.
pub const FALLBACK_CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1080,
};

const TITLE: Rgba8 = Rgba8::rgb(0x11, 0x18, 0x27);

/// Inputs shared by every page of one export preview.
#[derive(Clone, Copy, Debug)]
pub struct PageContext<'a> {
    pub record: &'a ReviewRecord,
    pub resolver: &'a FieldResolver,
    pub format: PageFormat,
    pub background: Rgba8,
}

impl PageContext<'_> {
    pub fn canvas(&self) -> Canvas {
        self.format.dimensions().unwrap_or(FALLBACK_CANVAS)
    }
}

/// Lay one page of elements out as cards under a title band.
///
/// Unavailable values still get a card (drawn with the `-` marker) so the page keeps its shape.
pub fn compose_page(ctx: &PageContext<'_>, elements: &[&ElementDescriptor]) -> Composition {
    let canvas = ctx.canvas();
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let margin = canvas.min_side() * 0.05;
    let title_h = h * 0.1;

    let mut comp = Composition::new(canvas, ctx.background);
    if let Some(title) = ctx.record.display_name() {
        comp.push(Node::Text(TextNode {
            pos: Point::new(w / 2.0, margin + title_h * 0.6),
            text: title,
            size: title_h * 0.45,
            color: TITLE,
            anchor: TextAnchor::Middle,
            bold: true,
        }));
    }

    if elements.is_empty() {
        return comp;
    }

    let body = Rect::new(margin, margin + title_h, w - margin, h - margin);
    let cols = (w / h * 2.0).round().clamp(1.0, 3.0) as usize;
    let rows = elements.len().div_ceil(cols);
    let gap = margin * 0.4;
    let cell_w = (body.width() - gap * (cols as f64 - 1.0)) / cols as f64;
    let cell_h = ((body.height() - gap * (rows as f64 - 1.0)) / rows as f64).max(1.0);

    for (i, el) in elements.iter().enumerate() {
        let x = body.x0 + (i % cols) as f64 * (cell_w + gap);
        let y = body.y0 + (i / cols) as f64 * (cell_h + gap);
        let rect = Rect::new(x, y, x + cell_w, y + cell_h);
        let node = match ctx.resolver.resolve(ctx.record, &el.id) {
            RenderableValue::Image(Some(href)) => Node::Image(ImageNode {
                rect,
                href,
                opacity: 1.0,
            }),
            value => Node::Card(CardNode {
                rect,
                label: el.label.clone(),
                value: value.display(),
            }),
        };
        comp.push(node);
    }
    comp
}

/// Composition of a whole pipeline grid, one cell per time index, ready for animation.
pub fn compose_pipeline(
    pipeline: &PipelineData,
    title: &str,
    canvas: Canvas,
    background: Rgba8,
) -> Composition {
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let margin = canvas.min_side() * 0.06;
    let title_h = h * 0.12;

    let peak = pipeline
        .filled_cells()
        .map(|(_, c)| c.intensity)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    // intensities on a 0..10 style scale are brought into 0..1
    let norm = if peak > 1.0 { peak } else { 1.0 };

    let cells = (0..pipeline.total_cells())
        .map(|index| GridCell {
            index,
            intensity: pipeline
                .cells
                .get(&index)
                .map(|c| c.intensity / norm)
                .unwrap_or(0.0),
            highlighted: false,
        })
        .collect();

    let grid_rect = Rect::new(margin, margin + title_h, w - margin, h - margin);
    Composition::new(canvas, background)
        .with_node(Node::Text(TextNode {
            pos: Point::new(margin, margin + title_h * 0.6),
            text: title.to_string(),
            size: title_h * 0.4,
            color: TITLE,
            anchor: TextAnchor::Start,
            bold: true,
        }))
        .with_node(Node::PipelineGrid(PipelineGrid::new(grid_rect, cells)))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compose.rs"]
mod tests;
