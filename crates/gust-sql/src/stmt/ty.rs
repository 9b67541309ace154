use gust_core::{schema::app::Field, stmt};

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Double,
    Text,
    VarChar(u64),
    Uuid,
    Timestamp,
}

impl Type {
    pub fn from_field(field: &Field, ty: &stmt::Type) -> Type {
        match ty {
            stmt::Type::Bool => Type::Boolean,
            stmt::Type::I16 => Type::SmallInt,
            stmt::Type::I32 => Type::Integer,
            stmt::Type::I64 => Type::BigInt,
            stmt::Type::F64 => Type::Double,
            stmt::Type::String => match field.max_length() {
                Some(max) => Type::VarChar(max),
                None => Type::Text,
            },
            stmt::Type::Uuid => Type::Uuid,
            stmt::Type::Timestamp => Type::Timestamp,
        }
    }
}
