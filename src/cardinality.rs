use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErdrawError;

/// Relational constraint at one end of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    One,
    ZeroOne,
    OneN,
    ZeroN,
}

/// Stroke primitives that make up a cardinality symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPart {
    Line,
    Circle,
    Crowfoot,
}

impl Cardinality {
    pub const ALL: [Cardinality; 4] = [
        Cardinality::One,
        Cardinality::ZeroOne,
        Cardinality::OneN,
        Cardinality::ZeroN,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::ZeroOne => "0..1",
            Cardinality::OneN => "1..n",
            Cardinality::ZeroN => "0..n",
        }
    }

    /// Symbol parts ordered from the line endpoint outward.
    pub fn symbol_parts(&self) -> &'static [SymbolPart] {
        match self {
            Cardinality::One => &[SymbolPart::Line],
            Cardinality::ZeroOne => &[SymbolPart::Circle, SymbolPart::Line],
            Cardinality::OneN => &[SymbolPart::Crowfoot, SymbolPart::Line],
            Cardinality::ZeroN => &[SymbolPart::Crowfoot, SymbolPart::Circle],
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = ErdrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cardinality::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ErdrawError::UnknownCardinality(s.to_string()))
    }
}

impl Serialize for Cardinality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Cardinality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl SymbolPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolPart::Line => "line",
            SymbolPart::Circle => "circle",
            SymbolPart::Crowfoot => "crowfoot",
        }
    }
}
