use super::Value;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Values serialize to their natural JSON shape. Records (composite keys)
/// become arrays; timestamps use RFC 3339 with millisecond precision.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Null => serializer.serialize_none(),
            Value::Record(record) => {
                let mut seq = serializer.serialize_seq(Some(record.len()))?;
                for field in record {
                    seq.serialize_element(field)?;
                }
                seq.end()
            }
            Value::String(v) => serializer.serialize_str(v),
            Value::Timestamp(v) => serializer.serialize_str(
                &v.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
            Value::Uuid(v) => serializer.collect_str(v),
        }
    }
}
