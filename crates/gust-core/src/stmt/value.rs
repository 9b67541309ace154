use super::*;
use crate::{Error, Result};

use chrono::{DateTime, Utc};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point
    F64(f64),

    /// Null value
    #[default]
    Null,

    /// Record value, used for composite keys
    Record(ValueRecord),

    /// String value
    String(String),

    /// UTC instant
    Timestamp(DateTime<Utc>),

    /// 128-bit universally unique identifier
    Uuid(Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::F64(_) => "F64",
            Self::Null => "Null",
            Self::Record(_) => "Record",
            Self::String(_) => "String",
            Self::Timestamp(_) => "Timestamp",
            Self::Uuid(_) => "Uuid",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    /// Returns the value widened to `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I16(v) => Some(v as i64),
            Self::I32(v) => Some(v as i64),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The value as a key component. Integers of every width collapse to
    /// `I64` so that a `long` key and an `int` foreign key compare equal.
    pub fn to_key(&self) -> Value {
        match self.as_i64() {
            Some(v) => Value::I64(v),
            None => match self {
                Self::Record(record) => {
                    Value::record_from_vec(record.iter().map(Value::to_key).collect())
                }
                other => other.clone(),
            },
        }
    }

    /// Returns `true` if the value can be stored in a field of type `ty`.
    pub fn is_a(&self, ty: &Type) -> bool {
        matches!(
            (self, ty),
            (Self::Null, _)
                | (Self::Bool(_), Type::Bool)
                | (Self::I16(_), Type::I16)
                | (Self::I32(_), Type::I32)
                | (Self::I64(_), Type::I64)
                | (Self::F64(_), Type::F64)
                | (Self::String(_), Type::String)
                | (Self::Timestamp(_), Type::Timestamp)
                | (Self::Uuid(_), Type::Uuid)
        )
    }

    /// Converts the value to `ty`.
    ///
    /// Integers convert between widths when in range and widen to `f64`.
    /// Strings parse into uuids and RFC 3339 timestamps. Null stays null.
    pub fn cast(self, ty: &Type) -> Result<Value> {
        if self.is_a(ty) {
            return Ok(self);
        }

        let ret = match (&self, ty) {
            (Self::I16(_) | Self::I32(_) | Self::I64(_), Type::I16) => self
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .map(Value::I16),
            (Self::I16(_) | Self::I32(_) | Self::I64(_), Type::I32) => self
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::I32),
            (Self::I16(_) | Self::I32(_), Type::I64) => self.as_i64().map(Value::I64),
            (Self::I16(_) | Self::I32(_) | Self::I64(_), Type::F64) => {
                self.as_i64().map(|v| Value::F64(v as f64))
            }
            // `as` saturates, so out-of-range floats must not reach it
            (Self::F64(v), Type::I16 | Type::I32 | Type::I64)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                return Value::I64(*v as i64).cast(ty);
            }
            (Self::String(v), Type::Uuid) => Some(Value::Uuid(v.parse::<Uuid>()?)),
            (Self::String(v), Type::Timestamp) => Some(Value::Timestamp(
                DateTime::parse_from_rfc3339(v)?.with_timezone(&Utc),
            )),
            (Self::Uuid(v), Type::String) => Some(Value::String(v.to_string())),
            _ => None,
        };

        ret.ok_or_else(|| Error::type_conversion(self, ty.name()))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Null, Self::Null) => true,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);

        match self {
            Self::Bool(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::Null => {}
            Self::Record(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::Timestamp(v) => v.hash(state),
            Self::Uuid(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from {
    ( $( $ty:ty => $variant:ident ),* ) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Self {
                    Self::$variant(src)
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f64 => F64,
    String => String,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid
);

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::type_conversion(value, "i64"))
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "String")),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "bool")),
        }
    }
}
