use super::*;

use crate::{
    schema::app::{FieldId, ModelId},
    stmt,
};

#[derive(Debug, Clone)]
pub struct UpdateByKey {
    /// Which model to update
    pub model: ModelId,

    /// Key of the record to update. Composite keys are a record.
    pub key: stmt::Value,

    /// Fields to set and their new values
    pub assignments: Vec<(FieldId, stmt::Value)>,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
