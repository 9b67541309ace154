//! Extension points invoked by [`PersistManager`](crate::PersistManager).
//!
//! Every hook is optional. An unset hook behaves as: allow every entity,
//! leave the save map as is, do nothing after saving, never convert a
//! failure.

use crate::{EntityKey, KeyMappingTable, MutationRecord, SaveMap, SaveOptions, SaveWorkState};

use gust_core::{Error, Result};
use std::{fmt, sync::Arc};

type BeforeSaveEntity = dyn Fn(&MutationRecord) -> Result<bool> + Send + Sync;
type BeforeSaveEntities = dyn Fn(&mut SaveMap, &SaveOptions) -> Result<()> + Send + Sync;
type AfterSaveEntities = dyn Fn(&SaveMap, &KeyMappingTable, &[EntityKey]) -> Result<()> + Send + Sync;
type HandleSaveException = dyn Fn(&Error, &SaveWorkState) -> bool + Send + Sync;

#[derive(Clone, Default)]
pub struct Hooks {
    before_save_entity: Option<Arc<BeforeSaveEntity>>,
    before_save_entities: Option<Arc<BeforeSaveEntities>>,
    after_save_entities: Option<Arc<AfterSaveEntities>>,
    handle_save_exception: Option<Arc<HandleSaveException>>,
}

impl Hooks {
    pub fn new() -> Hooks {
        Hooks::default()
    }

    /// Called for every record right before it is handed to the store.
    /// Returning `false` leaves the record out of the save and the result.
    pub fn before_save_entity(
        mut self,
        f: impl Fn(&MutationRecord) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.before_save_entity = Some(Arc::new(f));
        self
    }

    /// Called once with every decoded record, grouped by type. Records may be
    /// added, removed or changed.
    pub fn before_save_entities(
        mut self,
        f: impl Fn(&mut SaveMap, &SaveOptions) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_save_entities = Some(Arc::new(f));
        self
    }

    /// Called after every layer is flushed and before the transaction
    /// commits. An error aborts the save and rolls it back.
    pub fn after_save_entities(
        mut self,
        f: impl Fn(&SaveMap, &KeyMappingTable, &[EntityKey]) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_save_entities = Some(Arc::new(f));
        self
    }

    /// Called when a save fails. Returning `true` turns the failure into a
    /// result with recorded errors instead of an `Err`.
    pub fn handle_save_exception(
        mut self,
        f: impl Fn(&Error, &SaveWorkState) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.handle_save_exception = Some(Arc::new(f));
        self
    }

    pub(crate) fn call_before_save_entity(&self, record: &MutationRecord) -> Result<bool> {
        match &self.before_save_entity {
            Some(f) => f(record),
            None => Ok(true),
        }
    }

    pub(crate) fn call_before_save_entities(
        &self,
        map: &mut SaveMap,
        options: &SaveOptions,
    ) -> Result<()> {
        match &self.before_save_entities {
            Some(f) => f(map, options),
            None => Ok(()),
        }
    }

    pub(crate) fn call_after_save_entities(
        &self,
        map: &SaveMap,
        key_mappings: &KeyMappingTable,
        deleted_keys: &[EntityKey],
    ) -> Result<()> {
        match &self.after_save_entities {
            Some(f) => f(map, key_mappings, deleted_keys),
            None => Ok(()),
        }
    }

    pub(crate) fn call_handle_save_exception(&self, err: &Error, state: &SaveWorkState) -> bool {
        match &self.handle_save_exception {
            Some(f) => f(err, state),
            None => false,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_save_entity", &self.before_save_entity.is_some())
            .field("before_save_entities", &self.before_save_entities.is_some())
            .field("after_save_entities", &self.after_save_entities.is_some())
            .field("handle_save_exception", &self.handle_save_exception.is_some())
            .finish()
    }
}
