use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Runtime type of a filterable record member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Int,
    Long,
    Float,
    Decimal,
    String,
    Boolean,
    Uuid,
    Date,
    Timestamp,
}

lazy_static! {
    static ref SCALAR_NAME_MAP: HashMap<&'static str, DataType> = build_scalar_name_map();
}

impl DataType {
    pub const ALL: [DataType; 9] = [
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Decimal,
        DataType::String,
        DataType::Boolean,
        DataType::Uuid,
        DataType::Date,
        DataType::Timestamp,
    ];

    /// Looks up a type by its GraphQL scalar name, ignoring case.
    pub fn from_scalar_name(name: &str) -> Result<Self, String> {
        let normalized = name.trim().to_uppercase();
        SCALAR_NAME_MAP
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| format!("Unknown scalar type: {name}"))
    }

    /// The GraphQL scalar this type is exposed as.
    pub fn scalar_name(&self) -> &'static str {
        match self {
            DataType::Int => "Int",
            DataType::Long => "Long",
            DataType::Float => "Float",
            DataType::Decimal => "Decimal",
            DataType::String => "String",
            DataType::Boolean => "Boolean",
            DataType::Uuid => "UUID",
            DataType::Date => "Date",
            DataType::Timestamp => "DateTime",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int | DataType::Long | DataType::Float | DataType::Decimal
        )
    }

    /// Whether the type has a total order usable by `gt`/`lt` style operators.
    pub fn is_comparable(&self) -> bool {
        self.is_numeric() || matches!(self, DataType::Date | DataType::Timestamp)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, DataType::String)
    }
}

impl TryFrom<&str> for DataType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        DataType::from_scalar_name(s)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scalar_name())
    }
}

fn build_scalar_name_map() -> HashMap<&'static str, DataType> {
    HashMap::from([
        ("INT", DataType::Int),
        ("INTEGER", DataType::Int),
        ("SHORT", DataType::Int),
        ("LONG", DataType::Long),
        ("BIGINT", DataType::Long),
        ("FLOAT", DataType::Float),
        ("DOUBLE", DataType::Float),
        ("DECIMAL", DataType::Decimal),
        ("STRING", DataType::String),
        ("BOOLEAN", DataType::Boolean),
        ("UUID", DataType::Uuid),
        ("DATE", DataType::Date),
        ("DATETIME", DataType::Timestamp),
        ("TIMESTAMP", DataType::Timestamp),
    ])
}
