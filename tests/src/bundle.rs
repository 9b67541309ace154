use crate::fixture;

use serde_json::{json, Map, Value as Json};

/// Builds client save bundles for the fixture schema.
#[derive(Debug, Default)]
pub struct SaveBundle {
    entities: Vec<Json>,
    save_options: Option<Json>,
}

/// One entity of a save bundle.
#[derive(Debug, Clone)]
pub struct EntityJson {
    type_name: String,
    state: &'static str,
    properties: Map<String, Json>,
    identity_key: Option<String>,
    original_values: Option<Json>,
}

impl SaveBundle {
    pub fn new() -> SaveBundle {
        SaveBundle::default()
    }

    pub fn entity(mut self, entity: EntityJson) -> SaveBundle {
        self.entities.push(entity.to_json());
        self
    }

    pub fn save_options(mut self, options: Json) -> SaveBundle {
        self.save_options = Some(options);
        self
    }

    pub fn to_json(&self) -> Json {
        let mut bundle = json!({ "entities": self.entities });

        if let Some(options) = &self.save_options {
            bundle["saveOptions"] = options.clone();
        }

        bundle
    }
}

impl EntityJson {
    pub fn added(short_name: &str, properties: Json) -> EntityJson {
        EntityJson::new(short_name, "Added", properties)
    }

    pub fn modified(short_name: &str, properties: Json) -> EntityJson {
        EntityJson::new(short_name, "Modified", properties)
    }

    pub fn deleted(short_name: &str, properties: Json) -> EntityJson {
        EntityJson::new(short_name, "Deleted", properties)
    }

    pub fn unchanged(short_name: &str, properties: Json) -> EntityJson {
        EntityJson::new(short_name, "Unchanged", properties)
    }

    fn new(short_name: &str, state: &'static str, properties: Json) -> EntityJson {
        let Json::Object(properties) = properties else {
            panic!("entity properties must be an object; got {properties}");
        };

        EntityJson {
            type_name: fixture::wire_name(short_name),
            state,
            properties,
            identity_key: None,
            original_values: None,
        }
    }

    /// Marks `property` as a store-generated key; its current value is the
    /// temporary key.
    pub fn identity(mut self, property: &str) -> EntityJson {
        self.identity_key = Some(property.to_string());
        self
    }

    pub fn original_values(mut self, values: Json) -> EntityJson {
        self.original_values = Some(values);
        self
    }

    pub fn to_json(&self) -> Json {
        let mut aspect = json!({
            "entityTypeName": self.type_name,
            "entityState": self.state,
        });

        if let Some(property) = &self.identity_key {
            aspect["autoGeneratedKey"] = json!({
                "propertyName": property,
                "autoGeneratedKeyType": "Identity",
            });
        }

        if let Some(values) = &self.original_values {
            aspect["originalValuesMap"] = values.clone();
        }

        let mut entity = self.properties.clone();
        entity.insert("entityAspect".to_string(), aspect);
        Json::Object(entity)
    }
}
