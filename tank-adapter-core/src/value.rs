use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeSeq};
use std::borrow::Cow;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// A single parameter or column value exchanged with a [`Connection`](crate::Connection).
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    Uuid(Uuid),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int8(..)
                | Value::Int16(..)
                | Value::Int32(..)
                | Value::Int64(..)
                | Value::UInt8(..)
                | Value::UInt16(..)
                | Value::UInt32(..)
                | Value::UInt64(..)
                | Value::Float32(..)
                | Value::Float64(..)
                | Value::Decimal(..)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            Value::UInt8(v) => Some(v as i64),
            Value::UInt16(v) => Some(v as i64),
            Value::UInt32(v) => Some(v as i64),
            Value::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }
}

/// Conversion of Rust values into [`Value`].
pub trait AsValue {
    fn as_value(self) -> Value;
}

impl<T: Into<Value>> AsValue for T {
    fn as_value(self) -> Value {
        self.into()
    }
}

macro_rules! impl_from_value {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from_value!(
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => Varchar,
    Box<[u8]> => Blob,
    Vec<u8> => Blob,
    Date => Date,
    Time => Time,
    PrimitiveDateTime => Timestamp,
    Uuid => Uuid,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.to_owned())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::Varchar(value.into_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::Int8(v) => serializer.serialize_i8(*v),
            Value::Int16(v) => serializer.serialize_i16(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::UInt8(v) => serializer.serialize_u8(*v),
            Value::UInt16(v) => serializer.serialize_u16(*v),
            Value::UInt32(v) => serializer.serialize_u32(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Decimal(v) => serializer.collect_str(v),
            Value::Varchar(v) => serializer.serialize_str(v),
            Value::Blob(v) => serializer.serialize_str(&hex::encode(v)),
            Value::Date(v) => serializer.collect_str(v),
            Value::Time(v) => serializer.collect_str(v),
            Value::Timestamp(v) => serializer.collect_str(v),
            Value::Uuid(v) => serializer.collect_str(v),
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
        }
    }
}

/// Ordered, positional statement parameters.
pub type Params = Vec<Value>;

/// Build a [`Params`] list from heterogeneous Rust values.
///
/// ```
/// use tank_adapter_core::{Value, params};
/// let params = params![1, "two", None::<i32>];
/// assert_eq!(params[1], Value::Varchar("two".into()));
/// assert!(params[2].is_null());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::AsValue::as_value($value)),+]
    };
}
