//! Column data types as stored in diagram documents, and the text shown for
//! them in a table row.

use std::fmt;
use std::str::FromStr;

/// SQL column types a diagram document can name.
///
/// Placeholders inside the identifier mark arguments: `(n)`/`(p)` take a
/// length, `(p,s)`/`(m,d)` take a length and a decimal. Fixed arguments such
/// as `bit(1)` are part of the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    BigInt,
    BigIntN,
    Binary,
    BinaryN,
    Bit1,
    BitN,
    Blob,
    Boolean,
    Char,
    CharN,
    Date,
    Datetime,
    Decimal,
    DecimalP,
    DecimalPS,
    Decimal104,
    Decimal194,
    Double,
    DoubleMD,
    Enum,
    Float,
    FloatMD,
    FloatP,
    Geometry,
    Int,
    IntN,
    Json,
    LongBlob,
    LongText,
    MediumBlob,
    MediumInt,
    MediumIntN,
    MediumText,
    Numeric,
    NumericP,
    NumericPS,
    Real,
    RealMD,
    Set,
    SmallInt,
    SmallIntN,
    Text,
    Time,
    Timestamp,
    TinyBlob,
    TinyInt,
    TinyIntN,
    TinyText,
    VarBinaryN,
    VarCharN,
    Year2,
    Year4,
}

impl ColumnType {
    pub const ALL: [ColumnType; 52] = [
        Self::BigInt,
        Self::BigIntN,
        Self::Binary,
        Self::BinaryN,
        Self::Bit1,
        Self::BitN,
        Self::Blob,
        Self::Boolean,
        Self::Char,
        Self::CharN,
        Self::Date,
        Self::Datetime,
        Self::Decimal,
        Self::DecimalP,
        Self::DecimalPS,
        Self::Decimal104,
        Self::Decimal194,
        Self::Double,
        Self::DoubleMD,
        Self::Enum,
        Self::Float,
        Self::FloatMD,
        Self::FloatP,
        Self::Geometry,
        Self::Int,
        Self::IntN,
        Self::Json,
        Self::LongBlob,
        Self::LongText,
        Self::MediumBlob,
        Self::MediumInt,
        Self::MediumIntN,
        Self::MediumText,
        Self::Numeric,
        Self::NumericP,
        Self::NumericPS,
        Self::Real,
        Self::RealMD,
        Self::Set,
        Self::SmallInt,
        Self::SmallIntN,
        Self::Text,
        Self::Time,
        Self::Timestamp,
        Self::TinyBlob,
        Self::TinyInt,
        Self::TinyIntN,
        Self::TinyText,
        Self::VarBinaryN,
        Self::VarCharN,
        Self::Year2,
        Self::Year4,
    ];

    /// Identifier used in documents, which doubles as the display label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BigInt => "bigint",
            Self::BigIntN => "bigint(n)",
            Self::Binary => "binary",
            Self::BinaryN => "binary(n)",
            Self::Bit1 => "bit(1)",
            Self::BitN => "bit(n)",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::CharN => "char(n)",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Decimal => "decimal",
            Self::DecimalP => "decimal(p)",
            Self::DecimalPS => "decimal(p,s)",
            Self::Decimal104 => "decimal(10,4)",
            Self::Decimal194 => "decimal(19,4)",
            Self::Double => "double",
            Self::DoubleMD => "double(m,d)",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::FloatMD => "float(m,d)",
            Self::FloatP => "float(p)",
            Self::Geometry => "geometry",
            Self::Int => "int",
            Self::IntN => "int(n)",
            Self::Json => "json",
            Self::LongBlob => "longblob",
            Self::LongText => "longtext",
            Self::MediumBlob => "mediumblob",
            Self::MediumInt => "mediumint",
            Self::MediumIntN => "mediumint(n)",
            Self::MediumText => "mediumtext",
            Self::Numeric => "numeric",
            Self::NumericP => "numeric(p)",
            Self::NumericPS => "numeric(p,s)",
            Self::Real => "real",
            Self::RealMD => "real(m,d)",
            Self::Set => "set",
            Self::SmallInt => "smallint",
            Self::SmallIntN => "smallint(n)",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TinyBlob => "tinyblob",
            Self::TinyInt => "tinyint",
            Self::TinyIntN => "tinyint(n)",
            Self::TinyText => "tinytext",
            Self::VarBinaryN => "varbinary(n)",
            Self::VarCharN => "varchar(n)",
            Self::Year2 => "year(2)",
            Self::Year4 => "year(4)",
        }
    }

    /// Type name with any argument list removed
    pub fn label_without_args(self) -> &'static str {
        let id = self.as_str();
        id.split_once('(').map_or(id, |(name, _)| name)
    }

    pub fn supports_length(self) -> bool {
        matches!(
            self,
            Self::BigIntN
                | Self::BinaryN
                | Self::BitN
                | Self::CharN
                | Self::DecimalP
                | Self::FloatP
                | Self::IntN
                | Self::MediumIntN
                | Self::NumericP
                | Self::SmallIntN
                | Self::TinyIntN
                | Self::VarBinaryN
                | Self::VarCharN
        ) || self.supports_decimal()
    }

    /// Every type with a decimal also has a length.
    pub fn supports_decimal(self) -> bool {
        matches!(
            self,
            Self::DecimalPS | Self::DoubleMD | Self::FloatMD | Self::NumericPS | Self::RealMD
        )
    }

    /// Row text for a column of this type.
    ///
    /// Missing arguments print as `0`, and arguments the type does not take
    /// are ignored.
    pub fn format(self, length: Option<u32>, decimal: Option<u32>, unsigned: bool) -> String {
        let mut text = if self.supports_decimal() {
            format!(
                "{}({}, {})",
                self.label_without_args(),
                length.unwrap_or(0),
                decimal.unwrap_or(0)
            )
        } else if self.supports_length() {
            format!("{}({})", self.label_without_args(), length.unwrap_or(0))
        } else {
            self.as_str().to_string()
        };
        if unsigned {
            text.push_str(" unsigned");
        }
        text
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    /// Matches case-insensitively and ignores whitespace, so `DECIMAL(p, s)`
    /// is `decimal(p,s)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| format!("unknown column type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_length_and_decimal() {
        assert_eq!(ColumnType::DecimalPS.format(Some(12), Some(3), false), "decimal(12, 3)");
    }

    #[test]
    fn missing_arguments_print_as_zero() {
        assert_eq!(ColumnType::DecimalPS.format(None, None, false), "decimal(0, 0)");
        assert_eq!(ColumnType::DecimalPS.format(None, Some(2), false), "decimal(0, 2)");
        assert_eq!(ColumnType::VarCharN.format(None, None, false), "varchar(0)");
    }

    #[test]
    fn length_only_types_ignore_decimal() {
        assert_eq!(ColumnType::DecimalP.format(Some(255), None, false), "decimal(255)");
        assert_eq!(ColumnType::DecimalP.format(Some(8), Some(3), false), "decimal(8)");
        assert_eq!(ColumnType::VarCharN.format(Some(255), None, false), "varchar(255)");
    }

    #[test]
    fn argumentless_types_use_their_label() {
        assert_eq!(ColumnType::Char.format(Some(4), Some(1), false), "char");
        assert_eq!(ColumnType::Bit1.format(Some(8), None, false), "bit(1)");
        assert_eq!(ColumnType::Decimal194.format(None, None, false), "decimal(19,4)");
    }

    #[test]
    fn unsigned_is_appended() {
        assert_eq!(ColumnType::Int.format(None, None, true), "int unsigned");
        assert_eq!(ColumnType::IntN.format(Some(11), None, true), "int(11) unsigned");
    }

    #[test]
    fn decimal_support_implies_length_support() {
        for ty in ColumnType::ALL {
            if ty.supports_decimal() {
                assert!(ty.supports_length(), "{}", ty);
            }
        }
    }

    #[test]
    fn parses_document_identifiers() {
        for ty in ColumnType::ALL {
            assert_eq!(ty.as_str().parse::<ColumnType>(), Ok(ty));
        }
        assert_eq!("DECIMAL(p, s)".parse::<ColumnType>(), Ok(ColumnType::DecimalPS));
        assert!("unknown".parse::<ColumnType>().is_err());
    }
}
