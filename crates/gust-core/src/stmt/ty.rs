use super::Value;

/// The primitive type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I16,
    I32,
    I64,
    F64,
    String,
    Uuid,

    /// UTC instant
    Timestamp,
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::I16 | Type::I32 | Type::I64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Type::F64)
    }

    /// The value a field of this type holds before anything is assigned.
    ///
    /// Numeric and boolean types have a zero value. Uuids default to the nil
    /// uuid. Strings and timestamps have no zero value and default to null.
    pub fn default_value(&self) -> Value {
        match self {
            Type::Bool => Value::Bool(false),
            Type::I16 => Value::I16(0),
            Type::I32 => Value::I32(0),
            Type::I64 => Value::I64(0),
            Type::F64 => Value::F64(0.0),
            Type::Uuid => Value::Uuid(uuid::Uuid::nil()),
            Type::String | Type::Timestamp => Value::Null,
        }
    }

    /// Returns `true` if `value` is null or equal to this type's default.
    pub fn is_default(&self, value: &Value) -> bool {
        value.is_null() || *value == self.default_value()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "String",
            Type::Uuid => "Uuid",
            Type::Timestamp => "Timestamp",
        }
    }
}
