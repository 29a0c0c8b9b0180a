use std::num::NonZeroUsize;

use log::{debug, trace};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cardinality::Cardinality;
use crate::geometry::{EdgeAnchors, NodeGeometry, Point, resolve_node_anchors};
use crate::svg::num;
use crate::symbol::{SymbolElement, build_symbols};

/// Below this length the endpoints are treated as coincident.
const MIN_EDGE_LENGTH: f64 = 0.0001;
const DEFAULT_STROKE: &str = "#111";
const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Relationship data attached to an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default)]
    pub parent_cardinality: Cardinality,
    #[serde(default)]
    pub child_cardinality: Cardinality,
}

impl EdgeData {
    pub fn new(parent_cardinality: Cardinality, child_cardinality: Cardinality) -> Self {
        Self {
            parent_cardinality,
            child_cardinality,
        }
    }
}

/// Everything needed to draw one edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeRender {
    pub path: String,
    pub elements: Vec<SymbolElement>,
    pub anchors: EdgeAnchors,
}

/// Straight segment between two points, in the canvas host's path syntax.
pub fn straight_path(source: Point, target: Point) -> String {
    format!(
        "M {},{}L {},{}",
        num(source.x),
        num(source.y),
        num(target.x),
        num(target.y)
    )
}

/// Draw call for a relationship between two nodes.
///
/// Returns `None` when either node is missing from the canvas. The parent
/// cardinality is drawn at the source end and the child cardinality at the
/// target end.
pub fn render_edge(
    source: Option<&NodeGeometry>,
    target: Option<&NodeGeometry>,
    data: &EdgeData,
    stroke: Option<&str>,
) -> Option<EdgeRender> {
    let (source, target) = (source?, target?);
    Some(render_with_anchors(
        resolve_node_anchors(source, target),
        data,
        stroke,
    ))
}

/// Same as [`render_edge`] for anchors that are already known.
pub fn render_with_anchors(anchors: EdgeAnchors, data: &EdgeData, stroke: Option<&str>) -> EdgeRender {
    let straight = straight_path(anchors.source(), anchors.target());
    let length = anchors.length();

    if length <= MIN_EDGE_LENGTH {
        return EdgeRender {
            path: straight,
            elements: Vec::new(),
            anchors,
        };
    }

    let dir = Point::new((anchors.tx - anchors.sx) / length, (anchors.ty - anchors.sy) / length);
    let stroke = stroke.unwrap_or(DEFAULT_STROKE);

    let source_symbols = build_symbols(
        anchors.source(),
        dir,
        data.parent_cardinality.symbol_parts(),
        "source",
        length,
        stroke,
    );
    let target_symbols = build_symbols(
        anchors.target(),
        Point::new(-dir.x, -dir.y),
        data.child_cardinality.symbol_parts(),
        "target",
        length,
        stroke,
    );

    let mut elements = source_symbols.elements;
    elements.extend(target_symbols.elements);

    EdgeRender {
        path: format!("{}{}{}", straight, source_symbols.path, target_symbols.path),
        elements,
        anchors,
    }
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct NodeKey {
    id: String,
    x_bits: u64,
    y_bits: u64,
    measured_bits: Option<(u64, u64)>,
    declared_bits: Option<(u64, u64)>,
}

impl NodeKey {
    fn of(node: &NodeGeometry) -> Self {
        Self {
            id: node.id.clone(),
            x_bits: node.position.x.to_bits(),
            y_bits: node.position.y.to_bits(),
            measured_bits: node.measured.map(|s| (s.width.to_bits(), s.height.to_bits())),
            declared_bits: node.declared.map(|s| (s.width.to_bits(), s.height.to_bits())),
        }
    }
}

/// Memoised anchor resolution keyed on the geometry of both nodes.
///
/// Only geometry participates in the key, so a hit always returns what
/// [`resolve_node_anchors`] would compute.
pub struct AnchorCache {
    entries: Mutex<LruCache<(NodeKey, NodeKey), EdgeAnchors>>,
}

impl AnchorCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn anchors(&self, source: &NodeGeometry, target: &NodeGeometry) -> EdgeAnchors {
        let key = (NodeKey::of(source), NodeKey::of(target));
        let mut entries = self.entries.lock();

        if let Some(cached) = entries.get(&key) {
            trace!("anchor cache hit for {} -> {}", source.id, target.id);
            return *cached;
        }

        let anchors = resolve_node_anchors(source, target);
        entries.put(key, anchors);
        anchors
    }

    pub fn render(
        &self,
        source: Option<&NodeGeometry>,
        target: Option<&NodeGeometry>,
        data: &EdgeData,
        stroke: Option<&str>,
    ) -> Option<EdgeRender> {
        match (source, target) {
            (Some(source), Some(target)) => Some(render_with_anchors(
                self.anchors(source, target),
                data,
                stroke,
            )),
            _ => {
                debug!("skipping edge with a missing endpoint node");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AnchorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> (NodeGeometry, NodeGeometry) {
        (
            NodeGeometry::new("table.A", 0.0, 0.0).with_declared(100.0, 50.0),
            NodeGeometry::new("table.B", 200.0, 0.0).with_declared(80.0, 50.0),
        )
    }

    #[test]
    fn missing_node_skips_edge() {
        let (a, _) = nodes();
        assert!(render_edge(Some(&a), None, &EdgeData::default(), None).is_none());
        assert!(render_edge(None, Some(&a), &EdgeData::default(), None).is_none());
    }

    #[test]
    fn straight_path_uses_host_syntax() {
        assert_eq!(
            straight_path(Point::new(100.0, 25.0), Point::new(200.0, 25.0)),
            "M 100,25L 200,25"
        );
    }

    #[test]
    fn one_to_one_edge_has_a_tick_at_each_end() {
        let (a, b) = nodes();
        let edge = render_edge(Some(&a), Some(&b), &EdgeData::default(), None).unwrap();
        assert_eq!(
            edge.path,
            "M 100,25L 200,25 M 116 30 L 116 20 M 184 20 L 184 30"
        );
        assert!(edge.elements.is_empty());
    }

    #[test]
    fn parent_symbols_at_source_child_symbols_at_target() {
        let (a, b) = nodes();
        let data = EdgeData::new(Cardinality::ZeroOne, Cardinality::ZeroN);
        let edge = render_edge(Some(&a), Some(&b), &data, Some("#336699")).unwrap();

        let keys: Vec<&str> = edge.elements.iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["source-circle-0", "target-circle-1"]);
        match &edge.elements[1] {
            SymbolElement::Circle { x, y, color, .. } => {
                assert_eq!((*x, *y), (182.0, 25.0));
                assert_eq!(color, "#336699");
            }
        }
        // target crowfoot: tip at 184, base 10 units further out toward the source
        assert!(edge.path.ends_with(" M 194 19 L 184 25 L 194 31"), "{}", edge.path);
    }

    #[test]
    fn coincident_anchors_draw_only_the_segment() {
        let a = NodeGeometry::new("a", 0.0, 0.0).with_declared(100.0, 50.0);
        let edge = render_edge(Some(&a), Some(&a), &EdgeData::new(Cardinality::ZeroN, Cardinality::OneN), None)
            .unwrap();
        assert_eq!(edge.path, "M 100,25L 100,25");
        assert!(edge.elements.is_empty());
    }

    #[test]
    fn cache_matches_direct_resolution() {
        let (a, b) = nodes();
        let cache = AnchorCache::new(4);
        let first = cache.anchors(&a, &b);
        let second = cache.anchors(&a, &b);
        assert_eq!(first, resolve_node_anchors(&a, &b));
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        let moved = NodeGeometry::new("table.B", 200.0, 300.0).with_declared(80.0, 50.0);
        assert_eq!(cache.anchors(&a, &moved), resolve_node_anchors(&a, &moved));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cached_render_equals_uncached() {
        let (a, b) = nodes();
        let data = EdgeData::new(Cardinality::OneN, Cardinality::ZeroOne);
        let cache = AnchorCache::default();
        assert_eq!(
            cache.render(Some(&a), Some(&b), &data, None),
            render_edge(Some(&a), Some(&b), &data, None)
        );
        assert!(cache.render(Some(&a), None, &data, None).is_none());
    }

    #[test]
    fn missing_cardinalities_default_to_one() {
        let data: EdgeData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, EdgeData::new(Cardinality::One, Cardinality::One));
    }
}
