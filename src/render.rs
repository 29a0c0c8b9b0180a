use std::collections::HashMap;

use log::{debug, info};

use crate::diagram::{Column, Diagram, Table};
use crate::edge::{AnchorCache, EdgeRender};
use crate::fonts::TextMeasure;
use crate::geometry::{NodeGeometry, Rect};
use crate::layout::{
    BBox, BODY_INSET, HEADER_FONT_SIZE, HEADER_HEIGHT, ICON_SLOT, ROW_FONT_SIZE, ROW_HEIGHT,
    layout_nodes,
};
use crate::svg::escape_xml;
use crate::symbol::SymbolElement;
use crate::theme::Theme;

/// Style configuration for diagram rendering
#[derive(Debug, Clone)]
pub struct DiagramStyle {
    pub background: String,
    pub grid: String,
    pub table_body: String,
    pub table_text: String,
    pub edge_stroke: String,
    pub edge_width: f32,
    pub key_icon: String,
    pub not_null_icon: String,
    pub font_family: String,
    pub grid_gap: f32,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

impl DiagramStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        let edge_stroke = pick_higher_contrast(&theme.background_color, "#111111", &theme.text_color);

        Self {
            background: theme.background_color.clone(),
            grid: theme.grid_color.clone(),
            table_body: theme.table_body_color.clone(),
            table_text: "#111111".to_string(),
            edge_stroke,
            edge_width: theme.edge_width,
            key_icon: theme.key_icon_color.clone(),
            not_null_icon: theme.not_null_icon_color.clone(),
            font_family: theme.font_family.clone(),
            grid_gap: theme.grid_gap,
        }
    }
}

fn parse_hex_rgb(value: &str) -> Option<(f32, f32, f32)> {
    let hex = value.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some((r, g, b))
}

fn relative_luminance(color: (f32, f32, f32)) -> f32 {
    let linear = |v: f32| {
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };

    let (r, g, b) = color;
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

fn contrast_ratio(a: &str, b: &str) -> Option<f32> {
    let l1 = relative_luminance(parse_hex_rgb(a)?);
    let l2 = relative_luminance(parse_hex_rgb(b)?);
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    Some((hi + 0.05) / (lo + 0.05))
}

fn pick_higher_contrast(base: &str, primary: &str, secondary: &str) -> String {
    let p = contrast_ratio(base, primary).unwrap_or(0.0);
    let s = contrast_ratio(base, secondary).unwrap_or(0.0);

    if s > p {
        secondary.to_string()
    } else {
        primary.to_string()
    }
}

/// A rendered edge, named after its relationship
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEdge {
    pub name: String,
    pub render: EdgeRender,
}

/// Read-only diagram renderer.
///
/// Owns the anchor cache, so rendering the same diagram again after moving a
/// single table only recomputes the edges touching that table.
pub struct DiagramRenderer {
    pub style: DiagramStyle,
    pub padding: f64,
    pub grid: bool,
    cache: AnchorCache,
}

impl DiagramRenderer {
    pub fn new(style: DiagramStyle) -> Self {
        Self {
            style,
            padding: 20.0,
            grid: true,
            cache: AnchorCache::default(),
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Draw calls for every relationship whose tables are both on the canvas.
    pub fn edges(&self, diagram: &Diagram, nodes: &[NodeGeometry]) -> Vec<RenderedEdge> {
        let lookup: HashMap<&str, &NodeGeometry> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        diagram
            .relationships
            .iter()
            .filter_map(|rel| {
                let source = lookup.get(rel.source.as_str()).copied();
                let target = lookup.get(rel.target.as_str()).copied();
                let render = self
                    .cache
                    .render(source, target, &rel.data, Some(&self.style.edge_stroke));
                if render.is_none() {
                    debug!(
                        "relationship {} skipped: {} -> {} not both on canvas",
                        rel.name, rel.source, rel.target
                    );
                }
                render.map(|render| RenderedEdge {
                    name: rel.name.clone(),
                    render,
                })
            })
            .collect()
    }

    /// Complete SVG document for `diagram`.
    pub fn render<T: TextMeasure>(&self, diagram: &Diagram, measure: Option<&mut T>) -> String {
        let nodes = layout_nodes(diagram, measure);
        let edges = self.edges(diagram, &nodes);
        info!(
            "rendering {} tables and {} of {} relationships",
            nodes.len(),
            edges.len(),
            diagram.relationships.len()
        );

        let mut inner = String::new();

        // Edges first so tables sit on top of them
        for edge in &edges {
            inner.push_str(&self.render_edge(edge));
        }

        for (table, node) in diagram.tables.iter().zip(&nodes) {
            inner.push_str(&self.render_table(table, &node.rect()));
        }

        let bbox = BBox::enclosing(nodes.iter().map(NodeGeometry::rect))
            .unwrap_or(BBox::new(0.0, 0.0, 100.0, 50.0))
            .with_padding(self.padding);

        self.wrap_document(&inner, &bbox)
    }

    fn wrap_document(&self, inner: &str, bbox: &BBox) -> String {
        let style = &self.style;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">"#,
            w = bbox.width,
            h = bbox.height,
        );
        svg.push('\n');

        if self.grid {
            let gap = style.grid_gap;
            svg.push_str(&format!(
                r#"<defs><pattern id="erdraw-grid" width="{gap}" height="{gap}" patternUnits="userSpaceOnUse"><path d="M {gap} 0 L 0 0 0 {gap}" fill="none" stroke="{}" stroke-width="1" /></pattern></defs>"#,
                escape_xml(&style.grid),
                gap = gap,
            ));
            svg.push('\n');
        }

        svg.push_str(&format!(
            r#"<rect width="100%" height="100%" fill="{}" />"#,
            escape_xml(&style.background)
        ));
        svg.push('\n');
        if self.grid {
            svg.push_str(r#"<rect width="100%" height="100%" fill="url(#erdraw-grid)" />"#);
            svg.push('\n');
        }

        svg.push_str(&format!(
            r#"<g transform="translate({:.2},{:.2})">"#,
            -bbox.x, -bbox.y
        ));
        svg.push('\n');
        svg.push_str(inner);
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn render_edge(&self, edge: &RenderedEdge) -> String {
        let style = &self.style;
        let mut svg = format!(
            r#"<g class="edge" data-name="{}"><path d="{}" fill="none" stroke="{}" stroke-width="{}" />"#,
            escape_xml(&edge.name),
            edge.render.path,
            escape_xml(&style.edge_stroke),
            style.edge_width
        );

        for element in &edge.render.elements {
            match element {
                SymbolElement::Circle {
                    key,
                    x,
                    y,
                    radius,
                    color,
                } => svg.push_str(&format!(
                    r#"<circle data-key="{}" cx="{}" cy="{}" r="{}" fill="{}" />"#,
                    escape_xml(key),
                    crate::svg::num(*x),
                    crate::svg::num(*y),
                    crate::svg::num(*radius),
                    escape_xml(color)
                )),
            }
        }

        svg.push_str("</g>");
        svg
    }

    fn render_table(&self, table: &Table, rect: &Rect) -> String {
        let style = &self.style;
        let mut svg = String::from(r#"<g class="table">"#);

        let title = if table.logical_name.is_empty() {
            table.physical_name.clone()
        } else if table.description.is_empty() {
            table.logical_name.clone()
        } else {
            format!("{}\n{}", table.logical_name, table.description)
        };
        svg.push_str(&format!("<title>{}</title>", escape_xml(&title)));

        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="{}" />"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            table.color.to_css()
        ));

        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle">{}</text>"#,
            rect.x + rect.w / 2.0,
            rect.y + HEADER_HEIGHT / 2.0 + HEADER_FONT_SIZE as f64 / 3.0,
            escape_xml(&style.font_family),
            HEADER_FONT_SIZE,
            escape_xml(&style.table_text),
            escape_xml(&table.physical_name)
        ));

        let body_w = (rect.w - BODY_INSET * 2.0).max(0.0);
        let body_h = (rect.h - HEADER_HEIGHT - BODY_INSET).max(0.0);
        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" />"#,
            rect.x + BODY_INSET,
            rect.y + HEADER_HEIGHT,
            body_w,
            body_h,
            escape_xml(&style.table_body)
        ));

        for (i, column) in table.columns.iter().enumerate() {
            let row_y = rect.y + HEADER_HEIGHT + i as f64 * ROW_HEIGHT;
            if row_y + ROW_HEIGHT > rect.bottom() + 0.5 {
                break;
            }
            svg.push_str(&self.render_column(column, rect.x + BODY_INSET, row_y));
        }

        svg.push_str("</g>");
        svg
    }

    fn render_column(&self, column: &Column, x: f64, row_y: f64) -> String {
        let style = &self.style;
        let mut svg = String::new();
        let icon_cy = row_y + ROW_HEIGHT / 2.0;

        if column.primary_key {
            let cx = x + ICON_SLOT / 2.0 - 2.0;
            svg.push_str(&format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="2.5" fill="none" stroke="{key}" stroke-width="1.5" /><path d="M {:.2} {:.2} L {:.2} {:.2}" stroke="{key}" stroke-width="1.5" />"#,
                cx,
                icon_cy,
                cx + 2.5,
                icon_cy,
                cx + 6.0,
                icon_cy,
                key = escape_xml(&style.key_icon)
            ));
        }

        if column.not_null {
            svg.push_str(&format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{}" />"#,
                x + ICON_SLOT * 1.5,
                icon_cy,
                escape_xml(&style.not_null_icon)
            ));
        }

        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}">{}</text>"#,
            x + ICON_SLOT * 2.0,
            icon_cy + ROW_FONT_SIZE as f64 / 3.0,
            escape_xml(&style.font_family),
            ROW_FONT_SIZE,
            escape_xml(&style.table_text),
            escape_xml(&column.label())
        ));

        svg
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new(DiagramStyle::default())
    }
}
