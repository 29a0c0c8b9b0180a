use log::trace;

use crate::diagram::{Diagram, Table};
use crate::fonts::TextMeasure;
use crate::geometry::{NodeGeometry, Rect};

pub const HEADER_HEIGHT: f64 = 20.0;
pub const ROW_HEIGHT: f64 = 20.0;
pub const BODY_INSET: f64 = 4.0;
pub const ICON_SLOT: f64 = 16.0;
pub const HEADER_FONT_SIZE: f32 = 14.0;
pub const ROW_FONT_SIZE: f32 = 10.0;
const HEADER_PADDING_X: f64 = 8.0;

/// Bounding box for the whole canvas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn with_padding(&self, padding: f64) -> Self {
        Self::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    pub fn enclosing(rects: impl IntoIterator<Item = Rect>) -> Option<Self> {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.right(), first.bottom());

        for rect in iter {
            min_x = min_x.min(rect.x);
            min_y = min_y.min(rect.y);
            max_x = max_x.max(rect.right());
            max_y = max_y.max(rect.bottom());
        }

        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Size a table's content needs: header, then one row per column.
pub fn content_size<T: TextMeasure>(table: &Table, measure: &mut T) -> (f64, f64) {
    let (header_w, _) = measure.measure_text(&table.physical_name, HEADER_FONT_SIZE, true);
    let mut width = header_w as f64 + HEADER_PADDING_X * 2.0;

    for column in &table.columns {
        let (row_w, _) = measure.measure_text(&column.label(), ROW_FONT_SIZE, false);
        width = width.max(row_w as f64 + ICON_SLOT * 2.0 + BODY_INSET * 3.0);
    }

    let height = HEADER_HEIGHT + table.columns.len() as f64 * ROW_HEIGHT + BODY_INSET;
    (width, height)
}

/// Node geometry for every table.
///
/// With a text measure the node also gets a measured size, which never
/// shrinks it below its declared size.
pub fn layout_nodes<T: TextMeasure>(diagram: &Diagram, mut measure: Option<&mut T>) -> Vec<NodeGeometry> {
    diagram
        .tables
        .iter()
        .map(|table| {
            let mut node = table.geometry();
            if let Some(measure) = measure.as_deref_mut() {
                let (content_w, content_h) = content_size(table, measure);
                let width = content_w.max(table.width.unwrap_or(0.0));
                let height = content_h.max(table.height.unwrap_or(0.0));
                trace!("measured {} at {}x{}", table.id, width, height);
                node = node.with_measured(width, height);
            }
            node
        })
        .collect()
}
