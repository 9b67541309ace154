use super::*;

use crate::{schema::app::ModelId, stmt};

/// Loads one record. The response holds zero or one rows, each with one slot
/// per model field; relation slots are null.
#[derive(Debug, Clone)]
pub struct GetByKey {
    /// Which model to get from
    pub model: ModelId,

    /// Which key to fetch
    pub key: stmt::Value,
}

impl From<GetByKey> for Operation {
    fn from(value: GetByKey) -> Self {
        Self::GetByKey(value)
    }
}
