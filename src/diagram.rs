//! Diagram documents as produced by the file-loading backend, and the view
//! models the renderer works with.
//!
//! The backend speaks camelCase JSON. Only `physicalName` is required on a
//! table; everything else falls back to a default so partially filled
//! documents still render.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cardinality::Cardinality;
use crate::column_type::ColumnType;
use crate::edge::EdgeData;
use crate::error::Result;
use crate::geometry::NodeGeometry;

const NODE_ID_PREFIX: &str = "table.";

// ============================================
// Document (wire) types
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDocument {
    #[serde(default)]
    pub diagram_walkers: DiagramWalkers,
    #[serde(default)]
    pub column_groups: ColumnGroups,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramWalkers {
    #[serde(default)]
    pub tables: Vec<TableDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Color {
    fn default() -> Self {
        // Table colour the editor assigns to new tables
        Self {
            r: 128,
            g: 128,
            b: 192,
        }
    }
}

impl Color {
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDoc {
    pub physical_name: String,
    #[serde(default)]
    pub logical_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub font_name: String,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub connections: Connections,
    #[serde(default)]
    pub columns: ColumnsDoc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connections {
    #[serde(default)]
    pub relationships: Vec<RelationshipDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDoc {
    pub name: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub parent_cardinality: Cardinality,
    #[serde(default)]
    pub child_cardinality: Cardinality,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsDoc {
    #[serde(default)]
    pub normal_columns: Vec<ColumnDoc>,
    #[serde(default)]
    pub column_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDoc {
    pub physical_name: String,
    #[serde(default)]
    pub logical_name: Option<String>,
    #[serde(default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub decimal: Option<u32>,
    #[serde(default)]
    pub unsigned: Option<bool>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, alias = "uniqueKey")]
    pub unique: bool,
    #[serde(default)]
    pub referred_column: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroups {
    #[serde(default)]
    pub column_groups: Vec<ColumnGroupDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroupDoc {
    pub column_group_name: String,
    #[serde(default)]
    pub columns: ColumnsDoc,
}

// ============================================
// View models
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub physical_name: String,
    pub logical_name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub length: Option<u32>,
    pub decimal: Option<u32>,
    pub unsigned: bool,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub referred_column: Option<String>,
}

fn parse_column_type(doc: &ColumnDoc) -> Option<ColumnType> {
    let raw = doc.column_type.as_deref().filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(ty) => Some(ty),
        Err(e) => {
            warn!("column {}: {}", doc.physical_name, e);
            None
        }
    }
}

impl From<&ColumnDoc> for Column {
    fn from(doc: &ColumnDoc) -> Self {
        Self {
            physical_name: doc.physical_name.clone(),
            logical_name: doc.logical_name.clone().filter(|s| !s.is_empty()),
            column_type: parse_column_type(doc),
            length: doc.length,
            decimal: doc.decimal,
            unsigned: doc.unsigned.unwrap_or(false),
            not_null: doc.not_null,
            primary_key: doc.primary_key,
            unique: doc.unique,
            referred_column: doc.referred_column.clone().filter(|s| !s.is_empty()),
        }
    }
}

impl Column {
    /// Type text with length, decimal and `unsigned` filled in
    pub fn type_label(&self) -> Option<String> {
        self.column_type
            .map(|ty| ty.format(self.length, self.decimal, self.unsigned))
    }

    /// Row text shown inside a table node
    pub fn label(&self) -> String {
        match self.type_label() {
            Some(ty) => format!("{}: {}", self.physical_name, ty),
            None => self.physical_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: String,
    pub physical_name: String,
    pub logical_name: String,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Color,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn geometry(&self) -> NodeGeometry {
        let mut node = NodeGeometry::new(self.id.clone(), self.x, self.y);
        if let (Some(w), Some(h)) = (self.width, self.height) {
            node = node.with_declared(w, h);
        }
        node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub name: String,
    pub source: String,
    pub target: String,
    pub data: EdgeData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

pub fn node_id(physical_name: &str) -> String {
    format!("{}{}", NODE_ID_PREFIX, physical_name)
}

impl DiagramDocument {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn group_columns(&self) -> HashMap<&str, Vec<Column>> {
        self.column_groups
            .column_groups
            .iter()
            .map(|group| {
                (
                    group.column_group_name.as_str(),
                    group.columns.normal_columns.iter().map(Column::from).collect(),
                )
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<Table> {
        let groups = self.group_columns();

        self.diagram_walkers
            .tables
            .iter()
            .map(|table| {
                let mut columns: Vec<Column> =
                    table.columns.normal_columns.iter().map(Column::from).collect();

                for group_name in &table.columns.column_groups {
                    match groups.get(group_name.as_str()) {
                        Some(group) => columns.extend(group.iter().cloned()),
                        None => warn!(
                            "table {} references unknown column group {}",
                            table.physical_name, group_name
                        ),
                    }
                }

                Table {
                    id: node_id(&table.physical_name),
                    physical_name: table.physical_name.clone(),
                    logical_name: table.logical_name.clone(),
                    description: table.description.clone(),
                    x: table.x,
                    y: table.y,
                    width: table.width,
                    height: table.height,
                    color: table.color,
                    columns,
                }
            })
            .collect()
    }

    /// Relationships live under the table that owns them; flatten them all.
    pub fn relationships(&self) -> Vec<Relationship> {
        self.diagram_walkers
            .tables
            .iter()
            .flat_map(|table| table.connections.relationships.iter())
            .map(|rel| Relationship {
                name: rel.name.clone(),
                source: rel.source.clone(),
                target: rel.target.clone(),
                data: EdgeData::new(rel.parent_cardinality, rel.child_cardinality),
            })
            .collect()
    }

    pub fn to_diagram(&self) -> Diagram {
        let diagram = Diagram {
            tables: self.tables(),
            relationships: self.relationships(),
        };
        debug!(
            "mapped diagram: {} tables, {} relationships",
            diagram.tables.len(),
            diagram.relationships.len()
        );
        diagram
    }
}

impl Diagram {
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }
}
