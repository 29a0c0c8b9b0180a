//! Cardinality notation drawn at one end of an edge.
//!
//! Symbols are laid out from the endpoint toward the middle of the line.
//! `line` and `crowfoot` become path fragments; `circle` becomes a separate
//! filled primitive because it cannot be expressed as a stroke.

use serde::{Deserialize, Serialize};

use crate::cardinality::SymbolPart;
use crate::geometry::Point;
use crate::svg::push_polyline;

const DEFAULT_OFFSET: f64 = 16.0;
const SYMBOL_SPACING: f64 = 6.0;
const ADJACENT_SPACING: f64 = 2.0;
const MIDPOINT_GAP: f64 = 2.0;
const LINE_LENGTH: f64 = 10.0;
const CROWFOOT_DEPTH: f64 = 10.0;
const CROWFOOT_SPREAD: f64 = 12.0;
const CIRCLE_RADIUS: f64 = 3.0;

/// Drawable primitive emitted next to the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolElement {
    Circle {
        key: String,
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
}

impl SymbolElement {
    pub fn key(&self) -> &str {
        match self {
            SymbolElement::Circle { key, .. } => key,
        }
    }
}

/// Path fragments plus extra primitives for one edge end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub path: String,
    pub elements: Vec<SymbolElement>,
}

impl SymbolSpec {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.elements.is_empty()
    }
}

/// Crowfoot shapes nest against lines and circles, so they sit closer together.
fn spacing_between(current: SymbolPart, next: SymbolPart) -> f64 {
    use SymbolPart::*;
    match (current, next) {
        (Crowfoot, Line | Circle) | (Line | Circle, Crowfoot) => ADJACENT_SPACING,
        _ => SYMBOL_SPACING,
    }
}

/// Lays out `parts` along `dir` starting at `origin`.
///
/// `dir` must be a unit vector pointing into the line. Each end may use at most
/// half of `path_length` minus a small gap; if the whole sequence does not fit
/// the result is empty rather than truncated.
pub fn build_symbols(
    origin: Point,
    dir: Point,
    parts: &[SymbolPart],
    key_prefix: &str,
    path_length: f64,
    stroke_color: &str,
) -> SymbolSpec {
    let mut spec = SymbolSpec::default();

    if parts.is_empty() {
        return spec;
    }

    let max_reach = (path_length / 2.0 - MIDPOINT_GAP).max(0.0);
    let total_span: f64 = parts
        .windows(2)
        .map(|pair| spacing_between(pair[0], pair[1]))
        .sum();
    let start_offset = DEFAULT_OFFSET.min(max_reach - total_span);

    if !start_offset.is_finite() || start_offset <= 0.0 {
        return spec;
    }

    let perp = Point::new(-dir.y, dir.x);
    let mut offset = start_offset;

    for (index, part) in parts.iter().enumerate() {
        let along = offset.min(max_reach);
        let cx = origin.x + dir.x * along;
        let cy = origin.y + dir.y * along;

        match part {
            SymbolPart::Line => {
                let half = LINE_LENGTH / 2.0;
                push_polyline(
                    &mut spec.path,
                    &[
                        (cx + perp.x * half, cy + perp.y * half),
                        (cx - perp.x * half, cy - perp.y * half),
                    ],
                );
            }
            SymbolPart::Circle => {
                spec.elements.push(SymbolElement::Circle {
                    key: format!("{}-circle-{}", key_prefix, index),
                    x: cx,
                    y: cy,
                    radius: CIRCLE_RADIUS,
                    color: stroke_color.to_string(),
                });
            }
            SymbolPart::Crowfoot => {
                // Tip on the symbol position, prongs opening toward the line interior.
                let base_x = cx - dir.x * CROWFOOT_DEPTH;
                let base_y = cy - dir.y * CROWFOOT_DEPTH;
                let half = CROWFOOT_SPREAD / 2.0;
                push_polyline(
                    &mut spec.path,
                    &[
                        (base_x + perp.x * half, base_y + perp.y * half),
                        (cx, cy),
                        (base_x - perp.x * half, base_y - perp.y * half),
                    ],
                );
            }
        }

        if let Some(next) = parts.get(index + 1) {
            offset += spacing_between(*part, *next);
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use SymbolPart::*;

    fn build(parts: &[SymbolPart], key: &str, length: f64, color: &str) -> SymbolSpec {
        build_symbols(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            parts,
            key,
            length,
            color,
        )
    }

    fn circle(spec: &SymbolSpec, i: usize) -> (&str, f64, f64, f64, &str) {
        match &spec.elements[i] {
            SymbolElement::Circle {
                key,
                x,
                y,
                radius,
                color,
            } => (key.as_str(), *x, *y, *radius, color.as_str()),
        }
    }

    #[test]
    fn empty_parts_give_empty_symbols() {
        assert_eq!(build(&[], "empty", 100.0, "#000"), SymbolSpec::default());
    }

    #[test]
    fn crowded_path_renders_nothing() {
        let spec = build(&[Line, Line, Line, Line], "crowded", 40.0, "#000");
        assert!(spec.is_empty());
    }

    #[test]
    fn single_perpendicular_line() {
        let spec = build(&[Line], "line", 100.0, "#123456");
        assert_eq!(spec.path, " M 16 5 L 16 -5");
        assert!(spec.elements.is_empty());
    }

    #[test]
    fn circle_is_a_separate_element() {
        let spec = build(&[Circle], "circle", 100.0, "#ff0000");
        assert_eq!(spec.path, "");
        assert_eq!(spec.elements.len(), 1);
        assert_eq!(circle(&spec, 0), ("circle-circle-0", 16.0, 0.0, 3.0, "#ff0000"));
    }

    #[test]
    fn crowfoot_then_circle_use_adjacent_spacing() {
        let spec = build(&[Crowfoot, Circle], "combo", 60.0, "#00ff00");
        assert_eq!(spec.path, " M 6 6 L 16 0 L 6 -6");
        assert_eq!(circle(&spec, 0), ("combo-circle-1", 18.0, 0.0, 3.0, "#00ff00"));
    }

    #[test]
    fn repeated_lines_use_standard_spacing() {
        let spec = build(&[Line, Line], "double-line", 100.0, "#abcdef");
        assert_eq!(spec.path, " M 16 5 L 16 -5 M 22 5 L 22 -5");
        assert!(spec.elements.is_empty());
    }

    #[test]
    fn circle_before_crowfoot_uses_adjacent_spacing() {
        let spec = build(&[Circle, Crowfoot], "circle-crowfoot", 60.0, "#0088ff");
        assert_eq!(spec.path, " M 8 6 L 18 0 L 8 -6");
        assert_eq!(
            circle(&spec, 0),
            ("circle-crowfoot-circle-0", 16.0, 0.0, 3.0, "#0088ff")
        );
    }

    #[test]
    fn short_path_pulls_symbols_toward_endpoint() {
        // max reach 13, so the first symbol starts at 13 instead of 16
        let spec = build(&[Line], "short", 30.0, "#000");
        assert_eq!(spec.path, " M 13 5 L 13 -5");
    }

    #[test]
    fn reversed_direction_mirrors_symbols() {
        let spec = build_symbols(
            Point::new(100.0, 0.0),
            Point::new(-1.0, 0.0),
            &[Line],
            "target",
            100.0,
            "#000",
        );
        assert_eq!(spec.path, " M 84 -5 L 84 5");
    }

    #[test]
    fn non_finite_length_renders_nothing() {
        assert!(build(&[Line], "nan", f64::NAN, "#000").is_empty());
    }

    #[test]
    fn symbol_spec_serializes_for_hosts() {
        let spec = build(&[Circle], "k", 100.0, "#fff");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["elements"][0]["kind"], "circle");
        assert_eq!(json["elements"][0]["key"], "k-circle-0");
    }
}
