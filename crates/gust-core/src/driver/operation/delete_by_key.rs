use super::*;
use crate::{schema::app::ModelId, stmt};

#[derive(Debug, Clone)]
pub struct DeleteByKey {
    /// Which model to delete from
    pub model: ModelId,

    /// Key of the record to delete. Composite keys are a record.
    pub key: stmt::Value,
}

impl From<DeleteByKey> for Operation {
    fn from(value: DeleteByKey) -> Self {
        Self::DeleteByKey(value)
    }
}
