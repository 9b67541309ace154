use gust_core::{
    schema::app::{FieldId, Model},
    stmt::Value,
};

/// Equality on every primary key column, joined with `AND`.
#[derive(Debug, Clone)]
pub struct Filter {
    pub columns: Vec<FieldId>,
    pub values: Vec<Value>,
}

impl Filter {
    /// Builds the key filter. Composite keys are passed as a record with one
    /// entry per key field.
    pub fn by_key(model: &Model, key: &Value) -> Filter {
        let columns = model.primary_key.fields.clone();

        let values = match key {
            Value::Record(record) if columns.len() > 1 => record.fields.clone(),
            _ => vec![key.clone()],
        };

        Filter { columns, values }
    }
}
