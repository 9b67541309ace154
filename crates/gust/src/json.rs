//! Conversion between wire JSON and field values

use gust_core::{
    stmt::{Type, Value},
    Error, Result,
};
use serde_json::Value as Json;

/// Converts a JSON value into a value of type `ty`.
///
/// Integers may arrive as JSON numbers or as numeric strings; the client
/// sends 64-bit integers as strings when they exceed the safe range.
pub(crate) fn value_from_json(json: &Json, ty: &Type) -> Result<Value> {
    let value = match (json, ty) {
        (Json::Null, _) => return Ok(Value::Null),
        (Json::Bool(v), Type::Bool) => Value::Bool(*v),
        (Json::Number(n), _) if ty.is_integer() => match n.as_i64() {
            Some(v) => Value::I64(v),
            None => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
        },
        (Json::Number(n), Type::F64) => match n.as_f64() {
            Some(v) => Value::F64(v),
            None => return Err(Error::type_conversion(loose(json), ty.name())),
        },
        (Json::String(s), _) if ty.is_integer() => match s.trim().parse::<i64>() {
            Ok(v) => Value::I64(v),
            Err(_) => return Err(Error::type_conversion(loose(json), ty.name())),
        },
        (Json::String(s), Type::String | Type::Uuid | Type::Timestamp) => Value::String(s.clone()),
        _ => return Err(Error::type_conversion(loose(json), ty.name())),
    };

    value.cast(ty)
}

/// Converts a field value into its wire JSON form.
pub(crate) fn value_to_json(value: &Value) -> Result<Json> {
    serde_json::to_value(value).map_err(|err| Error::from(anyhow::Error::from(err)))
}

/// Best-effort value used to describe a JSON input in an error message.
fn loose(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(v) => Value::Bool(*v),
        Json::Number(n) => n
            .as_i64()
            .map(Value::I64)
            .unwrap_or_else(|| Value::F64(n.as_f64().unwrap_or(f64::NAN))),
        Json::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}
