use gust_core::{stmt::Value, EntityError, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Outcome of a save, in the shape the client expects.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    /// Inserted and updated entities with their final keys
    pub entities: Vec<Json>,

    pub key_mappings: Vec<KeyMapping>,

    pub deleted_keys: Vec<EntityKey>,

    /// Empty unless a failure was converted by the save exception handler
    pub errors: Vec<SaveError>,
}

/// A temporary key that was replaced by a store-assigned key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMapping {
    /// `Namespace.ShortName`
    pub entity_type_name: String,
    pub temp_value: Value,
    pub real_value: Value,
}

/// Identifies a deleted entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityKey {
    /// `ShortName:#Namespace`
    pub entity_type_name: String,
    pub key_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entity_errors: Vec<EntityError>,
}

/// Client options sent along with a save bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveOptions {
    /// Opaque payload for hooks
    pub tag: Option<Json>,

    pub allow_concurrent_saves: bool,
}

impl SaveResult {
    /// A result recording `err` instead of any changes.
    pub fn from_error(err: &Error) -> SaveResult {
        SaveResult {
            errors: vec![SaveError {
                message: err.to_string(),
                entity_errors: err.as_entity_errors().map(<[_]>::to_vec).unwrap_or_default(),
            }],
            ..SaveResult::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn to_json(&self) -> Result<Json> {
        serde_json::to_value(self).map_err(|err| Error::from(anyhow::Error::from(err)))
    }
}
