//! Relationship edges for entity-relationship diagrams.
//!
//! The core is two pure functions: [`geometry::resolve_anchors`] finds where a
//! straight edge leaves and enters two table rectangles, and
//! [`symbol::build_symbols`] lays out crow's foot notation for one end of it.
//! [`edge::render_edge`] combines them into one draw call per relationship.
//! The remaining modules load diagram documents and turn them into SVG, PNG
//! or PDF.

pub mod cardinality;
pub mod column_type;
pub mod diagram;
pub mod edge;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod svg;
pub mod symbol;
pub mod theme;

pub use cardinality::{Cardinality, SymbolPart};
pub use column_type::ColumnType;
pub use edge::{AnchorCache, EdgeData, EdgeRender, render_edge, straight_path};
pub use error::ErdrawError;
pub use geometry::{EdgeAnchors, NodeGeometry, Point, Rect, Size, intersect_rect, resolve_anchors};
pub use symbol::{SymbolElement, SymbolSpec, build_symbols};
