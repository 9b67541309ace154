use super::*;

use gust_core::{
    driver::operation,
    schema::app::{FieldId, Model, ModelId},
    Schema,
};

#[derive(Debug, Clone)]
pub struct Select {
    pub model: ModelId,

    /// Columns returned, in order
    pub columns: Vec<FieldId>,

    pub filter: Option<Filter>,
    pub order_by: Vec<FieldId>,
}

impl Statement {
    pub fn get_by_key(schema: &Schema, op: &operation::GetByKey) -> Self {
        let model = schema.model(op.model);

        Statement::Select(Select {
            filter: Some(Filter::by_key(model, &op.key)),
            ..Select::all_columns(model)
        })
    }

    pub fn scan(schema: &Schema, op: &operation::Scan) -> Self {
        Statement::Select(Select::all_columns(schema.model(op.model)))
    }
}

impl Select {
    fn all_columns(model: &Model) -> Select {
        Select {
            model: model.id,
            columns: model.primitives().map(|field| field.id).collect(),
            filter: None,
            order_by: model.primary_key.fields.clone(),
        }
    }
}
