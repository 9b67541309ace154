use crate::{
    decode, fk_rewriter::rewrite_foreign_keys, metadata, session::Layer, AutoGeneratedKey,
    AutoGeneratedKeyType, Catalog, Db, Entity, EntityKey, EntityState, GustConfig, Hooks,
    KeyMappingEntry, KeyMappingTable, MutationRecord, SaveMap, SaveOptions, SaveResult, Session,
};

use gust_core::{schema::app::ModelId, EntityError, Error, Result};
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::{collections::HashSet, sync::Arc};

/// Applies client save bundles to the store.
///
/// A save decodes the bundle, lets hooks adjust it, then flushes one layer
/// per entity type: inserts and updates from principals to dependents,
/// deletes from dependents to principals. Temporary keys held by foreign
/// keys are replaced with real keys as the principal layers are flushed.
/// Unless configured otherwise, the whole save runs in one transaction that
/// is rolled back on any failure.
#[derive(Debug)]
pub struct PersistManager {
    db: Db,
    catalog: Arc<Catalog>,
    config: GustConfig,
    hooks: Hooks,

    /// Options of the most recent save
    save_options: SaveOptions,

    /// State of the most recent save
    work_state: Option<SaveWorkState>,
}

/// Progress of a save operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStage {
    #[default]
    Decoding,
    Grouping,
    CommittingUpserts,
    RewritingDeleteOrder,
    CommittingDeletes,
    Finalizing,
    Done,
    Failed,
}

/// What a save operation worked on. Kept after the save for inspection and
/// handed to the save exception hook on failure.
#[derive(Debug, Clone, Default)]
pub struct SaveWorkState {
    pub stage: SaveStage,

    /// Stage the save was in when it failed
    pub failed_stage: Option<SaveStage>,

    /// Records grouped by type, after `BeforeSaveEntities` and vetoes
    pub save_map: SaveMap,

    pub save_options: SaveOptions,

    pub key_mappings: Vec<KeyMappingEntry>,

    pub deleted_keys: Vec<EntityKey>,

    /// Entity errors raised by a hook
    pub entity_errors: Vec<EntityError>,
}

impl PersistManager {
    /// Creates a manager with default configuration and no hooks. Fails if
    /// the schema's type dependencies contain a cycle.
    pub fn new(db: Db) -> Result<PersistManager> {
        let catalog = Catalog::describe_types(db.schema())?;
        Ok(PersistManager::with_catalog(db, Arc::new(catalog)))
    }

    /// Creates a manager sharing an already built catalog.
    pub fn with_catalog(db: Db, catalog: Arc<Catalog>) -> PersistManager {
        PersistManager {
            db,
            catalog,
            config: GustConfig::default(),
            hooks: Hooks::default(),
            save_options: SaveOptions::default(),
            work_state: None,
        }
    }

    pub fn with_config(mut self, config: GustConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &GustConfig {
        &self.config
    }

    pub fn save_options(&self) -> &SaveOptions {
        &self.save_options
    }

    pub fn save_work_state(&self) -> Option<&SaveWorkState> {
        self.work_state.as_ref()
    }

    /// Client metadata for the schema, formatted per the metadata options.
    pub fn metadata_json(&self) -> Result<String> {
        metadata::extract(self.catalog.schema()).to_json(self.config.metadata.pretty)
    }

    /// Decodes one entity of a save bundle, for records built outside a
    /// bundle.
    pub fn entity_info_from_json(&self, raw: &Json) -> Result<MutationRecord> {
        decode::decode_one(raw, &self.catalog)
    }

    /// Builds a record for an entity the host created itself, so it can be
    /// passed to [`save_records`](Self::save_records) or added by a hook.
    ///
    /// With `Identity`, the entity's single key field must be populated by
    /// the store and its current value is used as the temporary key.
    pub fn create_entity_info(
        &self,
        entity: Entity,
        state: EntityState,
        key_type: Option<AutoGeneratedKeyType>,
        unmapped: IndexMap<String, Json>,
        original_values: IndexMap<String, Json>,
    ) -> Result<MutationRecord> {
        let model = self.catalog.schema().model(entity.model);

        let auto_generated_key = match key_type {
            None => None,
            Some(key_type) => {
                let [field] = &model.primary_key.fields[..] else {
                    return Err(Error::invalid_save_bundle(format!(
                        "`{}` has a composite key; auto-generated keys need a single key field",
                        model.wire_name()
                    )));
                };

                let temp_value = match key_type {
                    AutoGeneratedKeyType::Identity if state.is_added() => {
                        Some(entity.get(*field).clone()).filter(|value| !value.is_null())
                    }
                    _ => None,
                };

                Some(AutoGeneratedKey {
                    property_name: model.field(*field).name.camel_case(),
                    field: *field,
                    key_type,
                    temp_value,
                })
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

    /// Saves a client bundle given as JSON text.
    pub async fn save_changes_str(&mut self, bundle: &str) -> Result<SaveResult> {
        let bundle: Json = serde_json::from_str(bundle).map_err(|err| {
            Error::invalid_save_bundle(format!("save bundle is not valid JSON: {err}"))
        })?;

        self.save_changes(&bundle).await
    }

    /// Saves a client bundle.
    pub async fn save_changes(&mut self, bundle: &Json) -> Result<SaveResult> {
        let mut state = SaveWorkState::default();

        let ret = match decode::decode(bundle, &self.catalog) {
            Ok(decoded) => {
                state.save_options = decoded.save_options;
                self.execute(decoded.records, &mut state).await
            }
            Err(err) => Err(err),
        };

        self.finish(ret, state)
    }

    /// Saves already decoded records.
    pub async fn save_records(
        &mut self,
        records: Vec<MutationRecord>,
        save_options: SaveOptions,
    ) -> Result<SaveResult> {
        let mut state = SaveWorkState {
            save_options,
            ..SaveWorkState::default()
        };

        let ret = self.execute(records, &mut state).await;
        self.finish(ret, state)
    }

    fn finish(&mut self, ret: Result<SaveResult>, mut state: SaveWorkState) -> Result<SaveResult> {
        self.save_options = state.save_options.clone();

        let err = match ret {
            Ok(result) => {
                state.stage = SaveStage::Done;
                self.work_state = Some(state);
                return Ok(result);
            }
            Err(err) => err,
        };

        state.failed_stage = Some(state.stage);
        state.stage = SaveStage::Failed;

        // Entity errors go back to the caller as they are
        if let Some(errors) = err.as_entity_errors() {
            state.entity_errors = errors.to_vec();
            self.work_state = Some(state);
            return Err(err);
        }

        let converted = self.hooks.call_handle_save_exception(&err, &state);
        self.work_state = Some(state);

        if !converted {
            return Err(err);
        }

        tracing::warn!(error = %err, "save failed; recorded in the save result");
        Ok(SaveResult::from_error(&err))
    }

    async fn execute(
        &self,
        records: Vec<MutationRecord>,
        state: &mut SaveWorkState,
    ) -> Result<SaveResult> {
        let settings = &self.config.transaction_settings;
        let mut session = self.db.session().await;

        if settings.uses_transaction() {
            session.begin(settings).await?;
        }

        let mut ret = self.run(&mut session, records, state).await;

        if ret.is_ok() && session.in_transaction() {
            if let Err(err) = session.commit().await {
                ret = Err(err);
            }
        }

        if let Err(err) = &ret {
            if session.in_transaction() {
                match session.rollback().await {
                    Ok(()) => tracing::warn!(
                        stage = ?state.stage,
                        error = %err,
                        "save failed; transaction rolled back"
                    ),
                    Err(rollback_err) => tracing::warn!(
                        stage = ?state.stage,
                        error = %err,
                        rollback_error = %rollback_err,
                        "save failed; rollback failed"
                    ),
                }
            }
        }

        ret
    }

    async fn run(
        &self,
        session: &mut Session,
        records: Vec<MutationRecord>,
        state: &mut SaveWorkState,
    ) -> Result<SaveResult> {
        let catalog = self.catalog.clone();
        let schema = catalog.schema().clone();
        let mut key_mappings = KeyMappingTable::new();

        state.stage = SaveStage::Decoding;

        for record in &records {
            if let Some(temp_value) = record.temp_value() {
                key_mappings.register(schema.model(record.model()), temp_value.clone())?;
            }
        }

        state.stage = SaveStage::Grouping;
        state.save_map = records.into_iter().collect();

        self.hooks
            .call_before_save_entities(&mut state.save_map, &state.save_options)?;

        self.register_added_keys(&state.save_map, &mut key_mappings)?;

        let order: Vec<ModelId> = catalog
            .types()
            .iter()
            .map(|descriptor| descriptor.model)
            .filter(|model| state.save_map.get(*model).is_some())
            .collect();

        state.stage = SaveStage::CommittingUpserts;

        for model in &order {
            let descriptor = catalog.get(*model);
            let Some(records) = state.save_map.get_mut(*model) else {
                continue;
            };

            let rewritten = rewrite_foreign_keys(descriptor, records, &key_mappings, &schema);

            for record in records.iter_mut().filter(|record| record.is_identity_insert()) {
                if let Some(key) = &record.auto_generated_key {
                    let field = schema.field(key.field);
                    if let (Some(_), Some(ty)) = (field.auto, field.primitive_ty()) {
                        record.entity.set(key.field, ty.default_value());
                    }
                }
            }

            self.apply_vetoes(records, EntityState::is_upsert)?;

            let mut layer = Layer::new();
            for record in records.iter_mut().filter(|record| record.state.is_upsert()) {
                layer.set_state(&mut record.entity, record.state);
            }

            tracing::debug!(
                model = %descriptor.full_name,
                added = layer.count(EntityState::Added),
                modified = layer.count(EntityState::Modified),
                foreign_keys_rewritten = rewritten,
                "saving layer"
            );

            session.flush(layer).await?;

            for record in records.iter().filter(|record| record.is_identity_insert()) {
                let Some(key) = &record.auto_generated_key else {
                    continue;
                };

                let handle = key
                    .temp_value
                    .as_ref()
                    .and_then(|temp_value| key_mappings.handle(*model, temp_value));

                if let Some(handle) = handle {
                    key_mappings.set_real(handle, record.entity.get(key.field).clone());
                }
            }
        }

        state.stage = SaveStage::RewritingDeleteOrder;
        let delete_order: Vec<ModelId> = order.iter().rev().copied().collect();

        state.stage = SaveStage::CommittingDeletes;
        let mut deleted_keys = vec![];

        for model in &delete_order {
            let descriptor = catalog.get(*model);
            let Some(records) = state.save_map.get_mut(*model) else {
                continue;
            };

            self.apply_vetoes(records, EntityState::is_deleted)?;

            let model_schema = schema.model(*model);
            let mut keys = vec![];
            let mut layer = Layer::new();

            for record in records.iter_mut().filter(|record| record.state.is_deleted()) {
                keys.push(EntityKey {
                    entity_type_name: descriptor.wire_name.clone(),
                    key_value: record.entity.key(model_schema),
                });
                layer.set_state(&mut record.entity, EntityState::Deleted);
            }

            if layer.is_empty() {
                continue;
            }

            tracing::debug!(
                model = %descriptor.full_name,
                deleted = layer.len(),
                "deleting layer"
            );

            session.flush(layer).await?;
            deleted_keys.extend(keys);
        }

        state.stage = SaveStage::Finalizing;
        state.key_mappings = key_mappings.entries().to_vec();
        state.deleted_keys = deleted_keys.clone();

        self.hooks
            .call_after_save_entities(&state.save_map, &key_mappings, &deleted_keys)?;

        let mut entities = vec![];
        for record in state.save_map.records().filter(|record| record.state.is_upsert()) {
            let model = schema.model(record.model());
            entities.push(
                catalog
                    .accessors()
                    .get(model.id)
                    .to_json(model, &record.entity)?,
            );
        }

        let result = SaveResult {
            entities,
            key_mappings: key_mappings.to_key_mappings(),
            deleted_keys,
            errors: vec![],
        };

        tracing::info!(
            entities = result.entities.len(),
            key_mappings = result.key_mappings.len(),
            deleted = result.deleted_keys.len(),
            "saved changes"
        );

        Ok(result)
    }

    /// Registers temporary keys of identity inserts `BeforeSaveEntities`
    /// added. Temporary keys must still be unique per type.
    fn register_added_keys(&self, map: &SaveMap, key_mappings: &mut KeyMappingTable) -> Result<()> {
        let schema = self.catalog.schema();
        let mut seen = HashSet::new();

        for record in map.records() {
            let Some(temp_value) = record.temp_value() else {
                continue;
            };

            let model = schema.model(record.model());

            if !seen.insert((model.id, temp_value.to_key())) {
                return Err(Error::duplicate_temp_key(model.wire_name(), temp_value.clone()));
            }

            if key_mappings.handle(model.id, temp_value).is_none() {
                key_mappings.register(model, temp_value.clone())?;
            }
        }

        Ok(())
    }

    /// Runs `BeforeSaveEntity` over the records in the states `applies`
    /// selects and drops the vetoed ones.
    fn apply_vetoes(
        &self,
        records: &mut Vec<MutationRecord>,
        applies: fn(EntityState) -> bool,
    ) -> Result<()> {
        let mut keep = Vec::with_capacity(records.len());

        for record in records.iter() {
            keep.push(!applies(record.state) || self.hooks.call_before_save_entity(record)?);
        }

        let mut keep = keep.into_iter();
        records.retain(|_| keep.next().unwrap_or(true));
        Ok(())
    }
}
