use super::*;

use crate::{
    schema::app::{FieldId, ModelId},
    stmt,
};

#[derive(Debug, Clone)]
pub struct Insert {
    /// Model to insert into
    pub model: ModelId,

    /// Fields set by the insert, in the same order as `values`
    pub columns: Vec<FieldId>,

    pub values: stmt::ValueRecord,

    /// Fields generated by the store and read back after the insert
    pub returning: Vec<FieldId>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
