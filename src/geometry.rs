use serde::{Deserialize, Serialize};

/// A point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair reported by the canvas host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box of a node: top-left corner plus extent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Geometry of one node as the canvas host sees it.
///
/// `measured` is the size the node actually rendered at; `declared` is the
/// size configured up front. Either may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeGeometry {
    pub id: String,
    pub position: Point,
    pub measured: Option<Size>,
    pub declared: Option<Size>,
}

impl NodeGeometry {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            measured: None,
            declared: None,
        }
    }

    pub fn with_measured(mut self, width: f64, height: f64) -> Self {
        self.measured = Some(Size::new(width, height));
        self
    }

    pub fn with_declared(mut self, width: f64, height: f64) -> Self {
        self.declared = Some(Size::new(width, height));
        self
    }

    /// Measured size wins over the declared one; a node with neither is zero-sized.
    pub fn width(&self) -> f64 {
        self.measured
            .map(|s| s.width)
            .or(self.declared.map(|s| s.width))
            .unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.measured
            .map(|s| s.height)
            .or(self.declared.map(|s| s.height))
            .unwrap_or(0.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width(), self.height())
    }
}

/// Boundary points where an edge leaves its source and enters its target
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeAnchors {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl EdgeAnchors {
    pub fn source(&self) -> Point {
        Point::new(self.sx, self.sy)
    }

    pub fn target(&self) -> Point {
        Point::new(self.tx, self.ty)
    }

    pub fn length(&self) -> f64 {
        (self.tx - self.sx).hypot(self.ty - self.sy)
    }
}

/// Sign that maps zero to zero, unlike `f64::signum`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Where the line from `rect`'s center toward `from` crosses `rect`'s boundary.
///
/// Degenerate inputs never divide by zero:
/// - `from` at the center picks the middle of the right edge
/// - a zero-area rect collapses to its top-left corner
/// - a zero-width (or zero-height) rect yields the end of its segment when the
///   aim is along it, else its center
pub fn intersect_rect(from: Point, rect: Rect) -> Point {
    let Point { x: cx, y: cy } = rect.center();
    let vx = from.x - cx;
    let vy = from.y - cy;
    let half_w = rect.w / 2.0;
    let half_h = rect.h / 2.0;

    if vx == 0.0 && vy == 0.0 {
        return Point::new(rect.x + rect.w, cy);
    }

    if half_w == 0.0 && half_h == 0.0 {
        return Point::new(rect.x, rect.y);
    }

    if half_w == 0.0 {
        if vx == 0.0 && half_h > 0.0 {
            return Point::new(cx, cy + sign(vy) * half_h);
        }
        return Point::new(cx, cy);
    }

    if half_h == 0.0 {
        if vy == 0.0 && half_w > 0.0 {
            return Point::new(cx + sign(vx) * half_w, cy);
        }
        return Point::new(cx, cy);
    }

    let avx = vx.abs();
    let avy = vy.abs();

    if avx == 0.0 {
        return Point::new(cx, cy + sign(vy) * half_h);
    }

    if avy == 0.0 {
        return Point::new(cx + sign(vx) * half_w, cy);
    }

    if avx / half_w > avy / half_h {
        let s = half_w / avx;
        let x = cx + sign(vx) * half_w;
        let y = (cy + vy * s).clamp(cy - half_h, cy + half_h);
        Point::new(x, y)
    } else {
        let s = half_h / avy;
        let x = (cx + vx * s).clamp(cx - half_w, cx + half_w);
        let y = cy + sign(vy) * half_h;
        Point::new(x, y)
    }
}

/// Anchor points for a straight edge between two rectangles.
///
/// Each anchor lies on its own rectangle, aimed at the other rectangle's center.
pub fn resolve_anchors(source: Rect, target: Rect) -> EdgeAnchors {
    let s = intersect_rect(target.center(), source);
    let t = intersect_rect(source.center(), target);

    EdgeAnchors {
        sx: s.x,
        sy: s.y,
        tx: t.x,
        ty: t.y,
    }
}

pub fn resolve_node_anchors(source: &NodeGeometry, target: &NodeGeometry) -> EdgeAnchors {
    resolve_anchors(source.rect(), target.rect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, digits: i32) {
        let tolerance = 10f64.powi(-digits) / 2.0;
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn horizontally_aligned_nodes() {
        let anchors = resolve_anchors(Rect::new(0.0, 0.0, 100.0, 50.0), Rect::new(200.0, 0.0, 80.0, 50.0));
        assert_eq!(
            anchors,
            EdgeAnchors {
                sx: 100.0,
                sy: 25.0,
                tx: 200.0,
                ty: 25.0
            }
        );
    }

    #[test]
    fn measured_size_takes_priority() {
        let source = NodeGeometry::new("source", 0.0, 0.0)
            .with_declared(10.0, 10.0)
            .with_measured(80.0, 80.0);
        let target = NodeGeometry::new("target", 100.0, 200.0).with_measured(60.0, 60.0);

        let anchors = resolve_node_anchors(&source, &target);

        assert_close(anchors.sx, 58.947, 3);
        assert_eq!(anchors.sy, 80.0);
        assert_close(anchors.tx, 115.789, 3);
        assert_eq!(anchors.ty, 200.0);
    }

    #[test]
    fn coincident_centers_use_right_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let anchors = resolve_anchors(rect, rect);
        assert_eq!(anchors.source(), Point::new(100.0, 25.0));
        assert_eq!(anchors.target(), Point::new(100.0, 25.0));
    }

    #[test]
    fn missing_sizes_fall_back_to_zero() {
        let source = NodeGeometry::new("source", 10.0, 10.0);
        let target = NodeGeometry::new("target", 50.0, 10.0);

        let anchors = resolve_node_anchors(&source, &target);

        assert_eq!(
            anchors,
            EdgeAnchors {
                sx: 10.0,
                sy: 10.0,
                tx: 50.0,
                ty: 10.0
            }
        );
    }

    #[test]
    fn zero_width_aligned_on_x_uses_segment_end() {
        let anchors = resolve_anchors(Rect::new(10.0, 10.0, 0.0, 100.0), Rect::new(10.0, 200.0, 0.0, 60.0));
        assert_eq!(
            anchors,
            EdgeAnchors {
                sx: 10.0,
                sy: 110.0,
                tx: 10.0,
                ty: 200.0
            }
        );
    }

    #[test]
    fn zero_width_off_axis_returns_center() {
        let anchors = resolve_anchors(Rect::new(10.0, 10.0, 0.0, 80.0), Rect::new(200.0, 30.0, 60.0, 60.0));
        assert_eq!(anchors.sx, 10.0);
        assert_eq!(anchors.sy, 50.0);
        assert_close(anchors.tx, 200.0, 2);
        assert_close(anchors.ty, 58.64, 2);
    }

    #[test]
    fn zero_height_aligned_on_y_uses_segment_end() {
        let anchors = resolve_anchors(Rect::new(0.0, 0.0, 100.0, 0.0), Rect::new(200.0, 0.0, 60.0, 0.0));
        assert_eq!(
            anchors,
            EdgeAnchors {
                sx: 100.0,
                sy: 0.0,
                tx: 200.0,
                ty: 0.0
            }
        );
    }

    #[test]
    fn zero_height_off_axis_returns_center() {
        let anchors = resolve_anchors(Rect::new(0.0, 0.0, 60.0, 0.0), Rect::new(0.0, 200.0, 60.0, 60.0));
        assert_eq!(anchors.source(), Point::new(30.0, 0.0));
        assert_eq!(anchors.target(), Point::new(30.0, 200.0));
    }

    #[test]
    fn shared_x_centers_use_vertical_edges() {
        let anchors = resolve_anchors(Rect::new(100.0, 0.0, 80.0, 80.0), Rect::new(100.0, 200.0, 80.0, 80.0));
        assert_eq!(anchors.source(), Point::new(140.0, 80.0));
        assert_eq!(anchors.target(), Point::new(140.0, 200.0));
    }

    #[test]
    fn zero_area_rect_collapses_to_corner() {
        let p = intersect_rect(Point::new(500.0, 500.0), Rect::new(7.0, 9.0, 0.0, 0.0));
        assert_eq!(p, Point::new(7.0, 9.0));
    }

    #[test]
    fn diagonal_aim_hits_corner() {
        let p = intersect_rect(Point::new(200.0, 200.0), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_close(p.x, 100.0, 9);
        assert_close(p.y, 100.0, 9);
    }

    #[test]
    fn declared_size_used_without_measurement() {
        let node = NodeGeometry::new("n", 5.0, 6.0).with_declared(120.0, 75.0);
        assert_eq!(node.rect(), Rect::new(5.0, 6.0, 120.0, 75.0));
    }
}
