mod accessor;
pub use accessor::{AccessorTable, PropertyAccessor, TypeAccessors};

use gust_core::{
    schema::app::{FieldId, Model, ModelId},
    stmt::{Value, ValueRecord},
};

/// An instance of a model: one value slot per field, in field order.
/// Relation slots are always null.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub model: ModelId,
    pub record: ValueRecord,
}

impl Entity {
    /// Creates an entity with every field at its unassigned value: null for
    /// nullable fields and relations, the type's zero value otherwise.
    pub fn new(model: &Model) -> Entity {
        let fields = model
            .fields
            .iter()
            .map(|field| match field.primitive_ty() {
                Some(ty) if !field.nullable => ty.default_value(),
                _ => Value::Null,
            })
            .collect();

        Entity {
            model: model.id,
            record: ValueRecord::from_vec(fields),
        }
    }

    pub fn from_record(model: ModelId, record: ValueRecord) -> Entity {
        Entity { model, record }
    }

    #[track_caller]
    pub fn get(&self, field: FieldId) -> &Value {
        assert_eq!(self.model, field.model, "field belongs to another model");
        &self.record[field.index]
    }

    #[track_caller]
    pub fn set(&mut self, field: FieldId, value: impl Into<Value>) {
        assert_eq!(self.model, field.model, "field belongs to another model");
        self.record[field.index] = value.into();
    }

    /// The primary key value. Composite keys are returned as a record.
    pub fn key(&self, model: &Model) -> Value {
        model.key_of(&self.record)
    }
}
