use super::Entity;
use crate::json;

use gust_core::{
    schema::{
        app::{Field, FieldId, Model, ModelId},
        Name,
    },
    stmt::{Type, Value},
    Error, Result, Schema,
};
use indexmap::IndexMap;

/// Typed get/set access to the primitive properties of every model, built
/// once from the schema.
#[derive(Debug, Default)]
pub struct AccessorTable {
    types: IndexMap<ModelId, TypeAccessors>,
}

/// Property accessors of one model, looked up by property name.
#[derive(Debug)]
pub struct TypeAccessors {
    model: ModelId,

    /// Keyed by the snake case property name
    properties: IndexMap<String, PropertyAccessor>,
}

#[derive(Debug, Clone)]
pub struct PropertyAccessor {
    field: FieldId,

    /// camelCase name used on the wire
    wire_name: String,

    ty: Type,
}

impl AccessorTable {
    pub fn new(schema: &Schema) -> AccessorTable {
        AccessorTable {
            types: schema
                .models()
                .map(|model| (model.id, TypeAccessors::new(model)))
                .collect(),
        }
    }

    #[track_caller]
    pub fn get(&self, model: ModelId) -> &TypeAccessors {
        &self.types[&model]
    }
}

impl TypeAccessors {
    fn new(model: &Model) -> TypeAccessors {
        TypeAccessors {
            model: model.id,
            properties: model
                .primitives()
                .map(|field| (Name::new(&field.name.app_name).snake_case(), PropertyAccessor::new(field)))
                .collect(),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Looks up a property by name. Wire names (`blogId`), field names
    /// (`blog_id`) and pascal case (`BlogId`) all resolve to the same property.
    pub fn property(&self, name: &str) -> Option<&PropertyAccessor> {
        self.properties.get(&Name::new(name).snake_case())
    }

    pub fn by_field(&self, field: FieldId) -> Option<&PropertyAccessor> {
        self.properties.values().find(|property| property.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyAccessor> {
        self.properties.values()
    }

    /// Renders the entity as a wire JSON object with camelCase property names.
    /// `$type` carries the namespace-qualified type name.
    pub fn to_json(&self, model: &Model, entity: &Entity) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::new();
        object.insert("$type".to_string(), model.full_name().into());

        for property in self.iter() {
            object.insert(
                property.wire_name.clone(),
                json::value_to_json(property.get(entity))?,
            );
        }

        Ok(object.into())
    }
}

impl PropertyAccessor {
    fn new(field: &Field) -> PropertyAccessor {
        PropertyAccessor {
            field: field.id,
            wire_name: field.name.camel_case(),
            ty: field.primitive_ty().copied().unwrap_or(Type::String),
        }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn get<'a>(&self, entity: &'a Entity) -> &'a Value {
        entity.get(self.field)
    }

    /// Stores `value`, converting it to the property's type.
    pub fn set(&self, entity: &mut Entity, value: Value) -> Result<()> {
        let value = value.cast(&self.ty)?;
        entity.set(self.field, value);
        Ok(())
    }

    /// Stores a wire JSON value, converting it to the property's type.
    pub fn set_json(&self, entity: &mut Entity, json: &serde_json::Value) -> Result<()> {
        let value = json::value_from_json(json, &self.ty).map_err(|err| {
            err.context(Error::from_args(format_args!(
                "invalid value for property `{}`",
                self.wire_name
            )))
        })?;
        entity.set(self.field, value);
        Ok(())
    }
}
