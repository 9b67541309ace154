use crate::Entity;

use gust_core::{
    schema::app::{FieldId, ModelId},
    stmt::Value,
    Error, Result,
};
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::{fmt, str::FromStr};

/// The state a client wants an entity to end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    Detached,
    Unchanged,
    Deleted,
    Modified,
    Added,
}

/// How the key of a new entity is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AutoGeneratedKeyType {
    /// The client supplies the key
    #[default]
    None,

    /// The store assigns the key; the client value is a placeholder
    Identity,
}

/// Auto-generated key instruction attached to a new entity.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoGeneratedKey {
    /// Wire name of the key property
    pub property_name: String,

    /// The key field the instruction refers to
    pub field: FieldId,

    pub key_type: AutoGeneratedKeyType,

    /// Placeholder key the client assigned, captured when the record is
    /// created. Only set for `Identity` keys.
    pub temp_value: Option<Value>,
}

/// One client-submitted entity change.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub entity: Entity,

    pub state: EntityState,

    pub auto_generated_key: Option<AutoGeneratedKey>,

    /// Pre-change values reported by the client. Untrusted.
    pub original_values: IndexMap<String, Json>,

    /// Properties in the payload that are not mapped to a field
    pub unmapped: IndexMap<String, Json>,
}

/// Mutation records grouped by model, in the order their models were first
/// seen.
#[derive(Debug, Clone, Default)]
pub struct SaveMap {
    records: IndexMap<ModelId, Vec<MutationRecord>>,
}

impl EntityState {
    pub fn name(self) -> &'static str {
        match self {
            EntityState::Detached => "Detached",
            EntityState::Unchanged => "Unchanged",
            EntityState::Deleted => "Deleted",
            EntityState::Modified => "Modified",
            EntityState::Added => "Added",
        }
    }

    pub fn is_added(self) -> bool {
        matches!(self, EntityState::Added)
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, EntityState::Deleted)
    }

    /// `Added` or `Modified`
    pub fn is_upsert(self) -> bool {
        matches!(self, EntityState::Added | EntityState::Modified)
    }

    /// Maps the numeric codes some clients send in place of state names.
    pub fn from_code(code: i64) -> Option<EntityState> {
        Some(match code {
            0 => EntityState::Detached,
            1 => EntityState::Unchanged,
            2 => EntityState::Deleted,
            3 => EntityState::Modified,
            4 => EntityState::Added,
            _ => return None,
        })
    }
}

impl FromStr for EntityState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        [
            EntityState::Detached,
            EntityState::Unchanged,
            EntityState::Deleted,
            EntityState::Modified,
            EntityState::Added,
        ]
        .into_iter()
        .find(|state| state.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::invalid_save_bundle(format!("unknown entity state `{s}`")))
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AutoGeneratedKeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("none") => Ok(AutoGeneratedKeyType::None),
            s if s.eq_ignore_ascii_case("identity") => Ok(AutoGeneratedKeyType::Identity),
            s => Err(Error::invalid_save_bundle(format!(
                "unsupported auto-generated key type `{s}`"
            ))),
        }
    }
}

impl MutationRecord {
    pub fn new(entity: Entity, state: EntityState) -> MutationRecord {
        MutationRecord {
            entity,
            state,
            auto_generated_key: None,
            original_values: IndexMap::new(),
            unmapped: IndexMap::new(),
        }
    }

    pub fn model(&self) -> ModelId {
        self.entity.model
    }

    /// Returns `true` for a new entity whose key the store assigns.
    pub fn is_identity_insert(&self) -> bool {
        self.state.is_added()
            && self
                .auto_generated_key
                .as_ref()
                .is_some_and(|key| key.key_type == AutoGeneratedKeyType::Identity)
    }

    /// The temporary key of an identity insert.
    pub fn temp_value(&self) -> Option<&Value> {
        if !self.is_identity_insert() {
            return None;
        }

        self.auto_generated_key.as_ref()?.temp_value.as_ref()
    }
}

impl SaveMap {
    pub fn new() -> SaveMap {
        SaveMap::default()
    }

    pub fn push(&mut self, record: MutationRecord) {
        self.records.entry(record.model()).or_default().push(record);
    }

    pub fn get(&self, model: ModelId) -> Option<&[MutationRecord]> {
        self.records.get(&model).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, model: ModelId) -> Option<&mut Vec<MutationRecord>> {
        self.records.get_mut(&model)
    }

    /// Removes every record of `model`, returning them.
    pub fn remove(&mut self, model: ModelId) -> Vec<MutationRecord> {
        self.records.shift_remove(&model).unwrap_or_default()
    }

    /// Keeps only the records for which `f` returns `true`. Models left
    /// without records are dropped.
    pub fn retain(&mut self, mut f: impl FnMut(&MutationRecord) -> bool) {
        for records in self.records.values_mut() {
            records.retain(&mut f);
        }

        self.records.retain(|_, records| !records.is_empty());
    }

    pub fn models(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.records.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &[MutationRecord])> {
        self.records
            .iter()
            .map(|(model, records)| (*model, records.as_slice()))
    }

    pub fn records(&self) -> impl Iterator<Item = &MutationRecord> {
        self.records.values().flatten()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<MutationRecord> for SaveMap {
    fn from_iter<I: IntoIterator<Item = MutationRecord>>(iter: I) -> Self {
        let mut map = SaveMap::new();
        for record in iter {
            map.push(record);
        }
        map
    }
}

impl IntoIterator for SaveMap {
    type Item = MutationRecord;
    type IntoIter = std::iter::Flatten<indexmap::map::IntoValues<ModelId, Vec<MutationRecord>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values().flatten()
    }
}
