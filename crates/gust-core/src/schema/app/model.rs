use super::{BelongsTo, Field, FieldId, FieldTy, Name, PrimaryKey};
use crate::stmt;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    /// Namespace the model is published under, e.g. `Gust.Tests.Models`
    pub namespace: String,

    /// Fields contained by the model
    pub fields: Vec<Field>,

    /// The primary key for this model.
    pub primary_key: PrimaryKey,

    /// If the schema specifies a table to map the model to, this is set.
    pub table_name: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    /// Iterate over the fields used for the model's primary key.
    pub fn primary_key_fields(&self) -> impl ExactSizeIterator<Item = &'_ Field> {
        self.primary_key
            .fields
            .iter()
            .map(|pk_field| &self.fields[pk_field.index])
    }

    /// Fields stored as columns, in declaration order.
    pub fn primitives(&self) -> impl Iterator<Item = &'_ Field> {
        self.fields.iter().filter(|field| field.ty.is_primitive())
    }

    /// `BelongsTo` relations declared on this model.
    pub fn belongs_to(&self) -> impl Iterator<Item = (&'_ Field, &'_ BelongsTo)> {
        self.fields.iter().filter_map(|field| match &field.ty {
            FieldTy::BelongsTo(belongs_to) => Some((field, belongs_to)),
            _ => None,
        })
    }

    /// Models referenced by this model's foreign keys, including the model
    /// itself when it references its own type.
    pub fn dependencies(&self) -> Vec<ModelId> {
        let mut ret = vec![];

        for (_, belongs_to) in self.belongs_to() {
            if !ret.contains(&belongs_to.target) {
                ret.push(belongs_to.target);
            }
        }

        ret
    }

    /// Returns `true` if `field` is a source field of any foreign key.
    pub fn is_foreign_key(&self, field: FieldId) -> bool {
        self.belongs_to()
            .any(|(_, belongs_to)| belongs_to.foreign_key.contains_source(field))
    }

    /// Wire-format type name, `ShortName:#Namespace`.
    pub fn wire_name(&self) -> String {
        format!("{}:#{}", self.name.upper_camel_case(), self.namespace)
    }

    /// Namespace-qualified type name, `Namespace.ShortName`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name.upper_camel_case())
    }

    /// The table backing this model. Defaults to the pluralized snake case
    /// model name.
    pub fn table_name(&self) -> String {
        match &self.table_name {
            Some(table_name) => table_name.clone(),
            None => self.name.plural().snake_case(),
        }
    }

    /// Extracts the primary key from a record of this model's fields.
    ///
    /// Single-field keys are returned as-is; composite keys as a record.
    pub fn key_of(&self, record: &stmt::ValueRecord) -> stmt::Value {
        match &self.primary_key.fields[..] {
            [field] => record[field.index].clone(),
            fields => stmt::Value::record_from_vec(
                fields.iter().map(|field| record[field.index].clone()).collect(),
            ),
        }
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
