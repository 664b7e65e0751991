use crate::Value;
use serde::Serialize;
use std::fmt::{self, Display};

/// Binding hint for a positional parameter.
///
/// The hints list is aligned by index with the parameters, an empty list lets the driver infer
/// every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Null,
    Integer,
    String,
    LargeObject,
    Boolean,
    Binary,
    Ascii,
    IntegerArray,
    StringArray,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Null => "null",
            ParamType::Integer => "integer",
            ParamType::String => "string",
            ParamType::LargeObject => "large_object",
            ParamType::Boolean => "boolean",
            ParamType::Binary => "binary",
            ParamType::Ascii => "ascii",
            ParamType::IntegerArray => "integer_array",
            ParamType::StringArray => "string_array",
        }
    }

    /// The hint a driver would infer for `value`.
    pub fn infer(value: &Value) -> ParamType {
        match value {
            Value::Null => ParamType::Null,
            Value::Boolean(..) => ParamType::Boolean,
            Value::Int8(..)
            | Value::Int16(..)
            | Value::Int32(..)
            | Value::Int64(..)
            | Value::UInt8(..)
            | Value::UInt16(..)
            | Value::UInt32(..)
            | Value::UInt64(..) => ParamType::Integer,
            Value::Blob(..) => ParamType::LargeObject,
            Value::List(values) if values.iter().all(|v| v.as_i64().is_some()) => {
                ParamType::IntegerArray
            }
            Value::List(..) => ParamType::StringArray,
            _ => ParamType::String,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ParamType::IntegerArray | ParamType::StringArray)
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that the hints are either absent or aligned with the parameters.
pub fn types_aligned(params: &[Value], types: &[ParamType]) -> bool {
    types.is_empty() || types.len() == params.len()
}
