//! Decoding of client save bundles into mutation records.
//!
//! Decoding is strict about type names and bundle shape and permissive about
//! extra data: properties that match no field are kept in the record's
//! unmapped map.

use crate::{
    AutoGeneratedKey, AutoGeneratedKeyType, Catalog, Entity, EntityState, MutationRecord,
    SaveOptions,
};

use gust_core::{stmt::Value, Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

const ENTITY_ASPECT: &str = "entityAspect";
const UNMAPPED: &str = "__unmapped";

/// A decoded save bundle
#[derive(Debug, Clone, Default)]
pub struct DecodedBundle {
    /// Records in bundle order
    pub records: Vec<MutationRecord>,

    pub save_options: SaveOptions,
}

/// Decodes a full save bundle.
///
/// The bundle must be an object with an `entities` array. Nothing is decoded
/// unless every entity decodes. Two entries targeting the same entity (type
/// and key) are rejected.
pub fn decode(bundle: &Json, catalog: &Catalog) -> Result<DecodedBundle> {
    let Some(entities) = bundle.get("entities").and_then(Json::as_array) else {
        return Err(Error::invalid_save_bundle(
            "save bundle must contain an array of entities",
        ));
    };

    let save_options = match bundle.get("saveOptions") {
        None | Some(Json::Null) => SaveOptions::default(),
        Some(options) => serde_json::from_value(options.clone()).map_err(|err| {
            Error::invalid_save_bundle(format!("malformed `saveOptions`: {err}"))
        })?,
    };

    let mut records = Vec::with_capacity(entities.len());

    for (index, raw) in entities.iter().enumerate() {
        let record = decode_one(raw, catalog)
            .map_err(|err| err.context(format!("failed to decode entity at index {index}")))?;
        records.push(record);
    }

    check_conflicts(&records, catalog)?;

    tracing::debug!(entities = records.len(), "decoded save bundle");

    Ok(DecodedBundle {
        records,
        save_options,
    })
}

/// Decodes one entity object, including its `entityAspect`.
pub fn decode_one(raw: &Json, catalog: &Catalog) -> Result<MutationRecord> {
    let Some(object) = raw.as_object() else {
        return Err(Error::invalid_save_bundle("entity must be a JSON object"));
    };

    let Some(aspect) = object.get(ENTITY_ASPECT).and_then(Json::as_object) else {
        return Err(Error::invalid_save_bundle(format!(
            "entity has no `{ENTITY_ASPECT}` object"
        )));
    };

    let Some(type_name) = aspect.get("entityTypeName").and_then(Json::as_str) else {
        return Err(Error::invalid_save_bundle(
            "`entityAspect` has no `entityTypeName`",
        ));
    };

    let descriptor = catalog.by_wire_name(type_name)?;
    let model = catalog.schema().model(descriptor.model);
    let accessors = catalog.accessors().get(model.id);

    let state = parse_state(aspect.get("entityState"))?;

    let mut entity = Entity::new(model);
    let mut unmapped = IndexMap::new();

    for (name, value) in object {
        match &name[..] {
            ENTITY_ASPECT => {}
            UNMAPPED => match value {
                Json::Object(extra) => {
                    unmapped.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Json::Null => {}
                _ => {
                    return Err(Error::invalid_save_bundle(format!(
                        "`{UNMAPPED}` must be an object"
                    )))
                }
            },
            _ => match accessors.property(name) {
                Some(property) => property.set_json(&mut entity, value)?,
                None => {
                    unmapped.insert(name.clone(), value.clone());
                }
            },
        }
    }

    let auto_generated_key = if state.is_added() {
        match aspect.get("autoGeneratedKey") {
            None | Some(Json::Null) => None,
            Some(Json::Object(key)) => Some(parse_auto_generated_key(key, catalog, &entity)?),
            Some(_) => {
                return Err(Error::invalid_save_bundle(
                    "`autoGeneratedKey` must be an object",
                ))
            }
        }
    } else {
        None
    };

    let original_values = match aspect.get("originalValuesMap") {
        None | Some(Json::Null) => IndexMap::new(),
        Some(Json::Object(values)) => values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Some(_) => {
            return Err(Error::invalid_save_bundle(
                "`originalValuesMap` must be an object",
            ))
        }
    };

    Ok(MutationRecord {
        entity,
        state,
        auto_generated_key,
        original_values,
        unmapped,
    })
}

fn parse_state(state: Option<&Json>) -> Result<EntityState> {
    match state {
        Some(Json::String(name)) => name.parse(),
        Some(Json::Number(code)) => code
            .as_i64()
            .and_then(EntityState::from_code)
            .ok_or_else(|| Error::invalid_save_bundle(format!("unknown entity state `{code}`"))),
        _ => Err(Error::invalid_save_bundle(
            "`entityAspect` has no `entityState`",
        )),
    }
}

fn parse_auto_generated_key(
    key: &Map<String, Json>,
    catalog: &Catalog,
    entity: &Entity,
) -> Result<AutoGeneratedKey> {
    let Some(property_name) = key.get("propertyName").and_then(Json::as_str) else {
        return Err(Error::invalid_save_bundle(
            "`autoGeneratedKey` has no `propertyName`",
        ));
    };

    let key_type = match key.get("autoGeneratedKeyType") {
        Some(Json::String(key_type)) => key_type.parse()?,
        None | Some(Json::Null) => AutoGeneratedKeyType::None,
        Some(other) => {
            return Err(Error::invalid_save_bundle(format!(
                "unsupported auto-generated key type `{other}`"
            )))
        }
    };

    let model = catalog.schema().model(entity.model);

    let field = catalog
        .accessors()
        .get(model.id)
        .property(property_name)
        .map(|property| property.field())
        .filter(|field| model.field(*field).primary_key)
        .ok_or_else(|| {
            Error::invalid_save_bundle(format!(
                "auto-generated key property `{property_name}` is not a key of `{}`",
                model.wire_name()
            ))
        })?;

    let temp_value = match key_type {
        AutoGeneratedKeyType::Identity => Some(entity.get(field).clone()).filter(|v| !v.is_null()),
        AutoGeneratedKeyType::None => None,
    };

    Ok(AutoGeneratedKey {
        property_name: property_name.to_string(),
        field,
        key_type,
        temp_value,
    })
}

fn check_conflicts(records: &[MutationRecord], catalog: &Catalog) -> Result<()> {
    let mut seen = HashMap::<_, &MutationRecord>::with_capacity(records.len());

    for record in records {
        let model = catalog.schema().model(record.model());
        let key = record.entity.key(model).to_key();

        if has_null(&key) {
            continue;
        }

        let Some(first) = seen.insert((model.id, key.clone()), record) else {
            continue;
        };

        if first.is_identity_insert() && record.is_identity_insert() {
            return Err(Error::duplicate_temp_key(model.wire_name(), key));
        }

        return Err(Error::conflicting_entity_state(
            model.wire_name(),
            key,
            first.state,
            record.state,
        ));
    }

    Ok(())
}

fn has_null(key: &Value) -> bool {
    match key {
        Value::Null => true,
        Value::Record(record) => record.iter().any(has_null),
        _ => false,
    }
}
