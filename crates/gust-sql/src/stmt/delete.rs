use super::*;

use gust_core::{driver::operation, schema::app::ModelId, Schema};

#[derive(Debug, Clone)]
pub struct Delete {
    pub model: ModelId,
    pub filter: Filter,
}

impl Statement {
    pub fn delete_by_key(schema: &Schema, op: &operation::DeleteByKey) -> Self {
        Statement::Delete(Delete {
            model: op.model,
            filter: Filter::by_key(schema.model(op.model), &op.key),
        })
    }
}
