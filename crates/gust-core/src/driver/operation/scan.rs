use super::*;

use crate::schema::app::ModelId;

/// Loads every record of a model, ordered by primary key. Rows are shaped as
/// for [`GetByKey`].
#[derive(Debug, Clone)]
pub struct Scan {
    pub model: ModelId,
}

impl From<Scan> for Operation {
    fn from(value: Scan) -> Self {
        Self::Scan(value)
    }
}
