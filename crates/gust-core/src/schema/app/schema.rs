use super::{Field, FieldId, Model, ModelId};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> crate::schema::Builder {
        crate::schema::Builder::default()
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Find a model by its wire-format name, `ShortName:#Namespace`.
    pub fn model_by_wire_name(&self, wire_name: &str) -> Option<&Model> {
        let (short_name, namespace) = wire_name.split_once(":#")?;
        self.models().find(|model| {
            model.namespace == namespace && model.name.upper_camel_case() == short_name
        })
    }
}
