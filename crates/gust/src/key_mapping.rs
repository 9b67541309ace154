//! Temporary to real key resolution for one save operation.

use crate::KeyMapping;

use gust_core::{
    schema::app::{Model, ModelId},
    stmt::Value,
    Error, Result,
};
use std::collections::HashMap;

/// Tracks the temporary keys of new entities and, once their inserts are
/// flushed, the real keys the store assigned.
///
/// Entries are keyed by entity type and temporary value. Integer keys are
/// compared by value regardless of width.
#[derive(Debug, Default)]
pub struct KeyMappingTable {
    entries: Vec<KeyMappingEntry>,
    index: HashMap<(ModelId, Value), KeyMappingHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMappingEntry {
    pub model: ModelId,

    /// `Namespace.ShortName`
    pub entity_type_name: String,

    pub temp_value: Value,

    /// Unset until the owning insert is flushed
    pub real_value: Option<Value>,
}

/// Refers to one entry of a [`KeyMappingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyMappingHandle(usize);

impl KeyMappingTable {
    pub fn new() -> KeyMappingTable {
        KeyMappingTable::default()
    }

    /// Starts tracking `temp_value` for `model`. A temporary value may only
    /// be registered once per type.
    pub fn register(&mut self, model: &Model, temp_value: Value) -> Result<KeyMappingHandle> {
        let key = (model.id, temp_value.to_key());

        if self.index.contains_key(&key) {
            return Err(Error::duplicate_temp_key(model.wire_name(), temp_value));
        }

        let handle = KeyMappingHandle(self.entries.len());
        self.entries.push(KeyMappingEntry {
            model: model.id,
            entity_type_name: model.full_name(),
            temp_value,
            real_value: None,
        });
        self.index.insert(key, handle);

        Ok(handle)
    }

    /// The real key for `value` if `value` is a temporary key of `model`
    /// whose insert has already been flushed.
    pub fn resolve(&self, model: ModelId, value: &Value) -> Option<&Value> {
        let handle = self.index.get(&(model, value.to_key()))?;
        self.entries[handle.0].real_value.as_ref()
    }

    pub fn handle(&self, model: ModelId, temp_value: &Value) -> Option<KeyMappingHandle> {
        self.index.get(&(model, temp_value.to_key())).copied()
    }

    #[track_caller]
    pub fn get(&self, handle: KeyMappingHandle) -> &KeyMappingEntry {
        &self.entries[handle.0]
    }

    /// Records the store-assigned key of a tracked entry.
    #[track_caller]
    pub fn set_real(&mut self, handle: KeyMappingHandle, real_value: Value) {
        let entry = &mut self.entries[handle.0];

        tracing::debug!(
            entity_type = %entry.entity_type_name,
            temp = ?entry.temp_value,
            real = ?real_value,
            "resolved temporary key"
        );

        entry.real_value = Some(real_value);
    }

    pub fn entries(&self) -> &[KeyMappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire key mappings for every entry whose real key is known.
    pub fn to_key_mappings(&self) -> Vec<KeyMapping> {
        self.entries
            .iter()
            .filter_map(|entry| {
                Some(KeyMapping {
                    entity_type_name: entry.entity_type_name.clone(),
                    temp_value: entry.temp_value.clone(),
                    real_value: entry.real_value.clone()?,
                })
            })
            .collect()
    }
}
