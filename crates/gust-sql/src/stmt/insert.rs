use super::*;

use gust_core::{
    driver::operation,
    schema::app::{FieldId, ModelId},
    stmt::ValueRecord,
};

#[derive(Debug, Clone)]
pub struct Insert {
    pub model: ModelId,
    pub columns: Vec<FieldId>,
    pub values: ValueRecord,
    pub returning: Vec<FieldId>,
}

impl From<operation::Insert> for Statement {
    fn from(op: operation::Insert) -> Self {
        Statement::Insert(Insert {
            model: op.model,
            columns: op.columns,
            values: op.values,
            returning: op.returning,
        })
    }
}
