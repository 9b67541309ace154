use super::*;

use gust_core::{
    driver::operation,
    schema::app::{FieldId, ModelId},
    stmt::Value,
    Schema,
};

#[derive(Debug, Clone)]
pub struct Update {
    pub model: ModelId,
    pub assignments: Vec<(FieldId, Value)>,
    pub filter: Filter,
}

impl Statement {
    pub fn update_by_key(schema: &Schema, op: operation::UpdateByKey) -> Self {
        let filter = Filter::by_key(schema.model(op.model), &op.key);

        Statement::Update(Update {
            model: op.model,
            assignments: op.assignments,
            filter,
        })
    }
}
