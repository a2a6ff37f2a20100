//! Attribute definitions.

use serde::Serialize;
use serde_json::Value;

use crate::util::{Error, Result};

/// Attribute is hidden from property panels.
pub const ATTRIBUTE_HIDDEN: u32 = 0x01;
/// Attribute values are not indexed for search.
pub const ATTRIBUTE_DONT_INDEX: u32 = 0x02;
pub const ATTRIBUTE_DIRECT_STORAGE: u32 = 0x04;
pub const ATTRIBUTE_READ_ONLY: u32 = 0x08;

/// Declared value type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeType {
    Unknown,
    Boolean,
    Integer,
    Double,
    Float,
    Blob,
    /// Reference to another object.
    DbKey,
    String,
    LocalizableString,
    DateTime,
    GeoLocation,
    Position,
}

impl AttributeType {
    /// Map a numeric type code.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Boolean,
            2 => Self::Integer,
            3 => Self::Double,
            4 => Self::Float,
            10 => Self::Blob,
            11 => Self::DbKey,
            20 => Self::String,
            21 => Self::LocalizableString,
            22 => Self::DateTime,
            23 => Self::GeoLocation,
            24 => Self::Position,
            _ => Self::Unknown,
        }
    }

    /// Map a type name used by the object form of the attribute table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "boolean" => Self::Boolean,
            "number" => Self::Double,
            "string" => Self::String,
            "enum" => Self::Integer,
            "ref" => Self::DbKey,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Boolean => 1,
            Self::Integer => 2,
            Self::Double => 3,
            Self::Float => 4,
            Self::Blob => 10,
            Self::DbKey => 11,
            Self::String => 20,
            Self::LocalizableString => 21,
            Self::DateTime => 22,
            Self::GeoLocation => 23,
            Self::Position => 24,
        }
    }

    /// Check if values of this type are carried as text.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::String | Self::LocalizableString | Self::DateTime | Self::GeoLocation | Self::Position
        )
    }
}

/// One row of the attribute table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub category: String,
    pub data_type: AttributeType,
    /// Unit or enum context, e.g. `"m^2"`.
    pub data_type_context: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub flags: u32,
    pub display_precision: u32,
}

impl AttributeDefinition {
    /// Placeholder row carrying no attribute.
    pub fn reserved() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            data_type: AttributeType::Unknown,
            data_type_context: None,
            description: None,
            display_name: None,
            flags: 0,
            display_precision: 0,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_hidden(&self) -> bool {
        self.flags & ATTRIBUTE_HIDDEN != 0
    }

    /// Internal categories such as `__parent__` or `__name__`.
    pub fn is_internal(&self) -> bool {
        self.category.len() > 4 && self.category.starts_with("__") && self.category.ends_with("__")
    }

    /// Name shown to users.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.name)
    }

    /// Parse one row: a positional tuple, an object, or a placeholder.
    pub(crate) fn from_json(index: usize, row: &Value) -> Result<Self> {
        match row {
            Value::Array(items) => Self::from_tuple(index, items),
            Value::Object(_) => Self::from_object(index, row),
            _ => Ok(Self::reserved()),
        }
    }

    fn from_tuple(index: usize, items: &[Value]) -> Result<Self> {
        let field = |i: usize| items.get(i).filter(|v| !v.is_null());
        let name = match field(0) {
            Some(Value::String(s)) => s.clone(),
            None => return Ok(Self::reserved()),
            Some(other) => return Err(Error::propdb(format!("attribute {} name is {}", index, other))),
        };
        Ok(Self {
            name,
            category: opt_string(index, field(1))?.unwrap_or_default(),
            data_type: data_type(index, field(2))?,
            data_type_context: opt_string(index, field(3))?,
            description: opt_string(index, field(4))?,
            display_name: opt_string(index, field(5))?,
            flags: opt_u32(index, field(6))?,
            display_precision: opt_u32(index, field(7))?,
        })
    }

    fn from_object(index: usize, row: &Value) -> Result<Self> {
        let field = |key: &str| row.get(key).filter(|v| !v.is_null());
        let name = match field("name") {
            Some(Value::String(s)) => s.clone(),
            None => return Ok(Self::reserved()),
            Some(other) => return Err(Error::propdb(format!("attribute {} name is {}", index, other))),
        };
        Ok(Self {
            name,
            category: opt_string(index, field("category"))?.unwrap_or_default(),
            data_type: data_type(index, field("type").or_else(|| field("dataType")))?,
            data_type_context: opt_string(index, field("dataTypeContext"))?,
            description: opt_string(index, field("description"))?,
            display_name: opt_string(index, field("displayName"))?,
            flags: opt_u32(index, field("flags"))?,
            display_precision: opt_u32(index, field("precision").or_else(|| field("displayPrecision")))?,
        })
    }
}

fn opt_string(index: usize, v: Option<&Value>) -> Result<Option<String>> {
    match v {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::propdb(format!("attribute {}: expected string, got {}", index, other))),
    }
}

fn opt_u32(index: usize, v: Option<&Value>) -> Result<u32> {
    match v {
        None => Ok(0),
        Some(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| Error::propdb(format!("attribute {}: expected unsigned integer, got {}", index, n))),
    }
}

fn data_type(index: usize, v: Option<&Value>) -> Result<AttributeType> {
    match v {
        None => Ok(AttributeType::Unknown),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(AttributeType::from_code)
            .ok_or_else(|| Error::propdb(format!("attribute {}: bad type code {}", index, n))),
        Some(Value::String(s)) => Ok(AttributeType::from_name(s)),
        Some(other) => Err(Error::propdb(format!("attribute {}: bad type {}", index, other))),
    }
}
