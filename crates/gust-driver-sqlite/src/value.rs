use chrono::{DateTime, SecondsFormat, Utc};
use gust_core::{
    stmt::{self, Value as CoreValue},
    Error, Result,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Gust value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a Gust value.
    pub fn from_sql(row: &Row, index: usize, ty: &stmt::Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver_operation_failed)?;

        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => match ty {
                stmt::Type::Bool => CoreValue::Bool(value != 0),
                stmt::Type::I16 => CoreValue::I64(value).cast(ty)?,
                stmt::Type::I32 => CoreValue::I64(value).cast(ty)?,
                stmt::Type::I64 => CoreValue::I64(value),
                stmt::Type::F64 => CoreValue::F64(value as f64),
                _ => return Err(Error::type_conversion(CoreValue::I64(value), ty.name())),
            },
            SqlValue::Real(value) => CoreValue::F64(value).cast(ty)?,
            SqlValue::Text(value) => CoreValue::String(value).cast(ty)?,
            SqlValue::Blob(_) => {
                return Err(Error::driver_operation_failed(
                    rusqlite::Error::InvalidColumnType(
                        index,
                        "blob".to_string(),
                        rusqlite::types::Type::Blob,
                    ),
                ))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I16(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(timestamp(v)))),
            Value::Uuid(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Value::Record(_) => Err(rusqlite::Error::ToSqlConversionFailure(
                format!("record values cannot be bound; value={:?}", self.0).into(),
            )),
        }
    }
}

/// Timestamps are stored as RFC 3339 text so they sort lexically
fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}
