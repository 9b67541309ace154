use super::*;

use gust_core::schema::app::{FieldId, Model, ModelId};

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub model: ModelId,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Primary key clause
    pub primary_key: Vec<FieldId>,

    pub foreign_keys: Vec<ForeignKeyDef>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    pub columns: Vec<FieldId>,
    pub target: ModelId,
    pub target_columns: Vec<FieldId>,
}

impl Statement {
    pub fn create_table(model: &Model) -> Self {
        CreateTable {
            model: model.id,
            columns: model.fields.iter().filter_map(ColumnDef::from_field).collect(),
            primary_key: model.primary_key.fields.clone(),
            foreign_keys: model
                .belongs_to()
                .map(|(_, belongs_to)| ForeignKeyDef {
                    columns: belongs_to
                        .foreign_key
                        .fields
                        .iter()
                        .map(|fk_field| fk_field.source)
                        .collect(),
                    target: belongs_to.target,
                    target_columns: belongs_to
                        .foreign_key
                        .fields
                        .iter()
                        .map(|fk_field| fk_field.target)
                        .collect(),
                })
                .collect(),
        }
        .into()
    }
}

impl CreateTable {
    /// The single auto-increment key column, if the key is exactly that.
    pub fn auto_increment_key(&self) -> Option<FieldId> {
        match &self.primary_key[..] {
            [field] => self
                .columns
                .iter()
                .find(|column| column.field == *field && column.auto_increment)
                .map(|column| column.field),
            _ => None,
        }
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
