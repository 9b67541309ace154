//! Change tracking against one connection.

use crate::{Entity, EntityState, TransactionSettings};

use gust_core::{
    driver::{
        operation::{DeleteByKey, Insert, Transaction, UpdateByKey},
        Connection, Operation, Response,
    },
    schema::app::{AutoStrategy, Model},
    stmt::{Type, ValueRecord},
    Error, Result, Schema,
};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Exclusive use of the database connection, with transaction control and
/// flushing of pending entity changes.
///
/// If dropped with a transaction still open, the transaction is rolled back.
pub struct Session {
    schema: Arc<Schema>,

    /// `Option` so that `Drop` can move it into a rollback task
    connection: Option<OwnedMutexGuard<Box<dyn Connection>>>,

    /// Open transactions, including savepoints
    depth: u32,
}

/// Entity changes flushed together.
#[derive(Debug, Default)]
pub struct Layer<'a> {
    pending: Vec<(&'a mut Entity, EntityState)>,
}

impl Session {
    pub(crate) fn new(schema: Arc<Schema>, connection: OwnedMutexGuard<Box<dyn Connection>>) -> Session {
        Session {
            schema,
            connection: Some(connection),
            depth: 0,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn in_transaction(&self) -> bool {
        self.depth > 0
    }

    /// Starts a transaction, or a savepoint when one is already open.
    pub async fn begin(&mut self, settings: &TransactionSettings) -> Result<()> {
        self.exec(
            Transaction::Start {
                isolation: Some(settings.isolation_level),
                timeout: Some(settings.timeout),
            }
            .into(),
        )
        .await?;
        self.depth += 1;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<()> {
        self.exec(Transaction::Commit.into()).await?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<()> {
        // The transaction is gone whether or not the rollback succeeds
        self.depth = self.depth.saturating_sub(1);
        self.exec(Transaction::Rollback.into()).await?;
        Ok(())
    }

    /// Writes every change of `layer` to the store, in the order the changes
    /// were added.
    ///
    /// Inserted entities are updated in place with the values the store
    /// generated. `Unchanged` and `Detached` entities are skipped.
    pub async fn flush(&mut self, layer: Layer<'_>) -> Result<()> {
        for (entity, state) in layer.pending {
            match state {
                EntityState::Added => self.insert(entity).await?,
                EntityState::Modified => self.update(entity).await?,
                EntityState::Deleted => self.delete(entity).await?,
                EntityState::Unchanged | EntityState::Detached => {}
            }
        }

        Ok(())
    }

    async fn insert(&mut self, entity: &mut Entity) -> Result<()> {
        let schema = self.schema.clone();
        let model = schema.model(entity.model);

        let mut columns = vec![];
        let mut values = vec![];
        let mut returning = vec![];

        for field in model.primitives() {
            let value = entity.get(field.id);
            let ty = field.primitive_ty().copied().unwrap_or(Type::String);

            match field.auto {
                Some(AutoStrategy::Increment) if ty.is_default(value) => {
                    returning.push(field.id);
                    continue;
                }
                Some(AutoStrategy::Uuid) if ty.is_default(value) => {
                    entity.set(field.id, uuid::Uuid::new_v4());
                }
                _ => {}
            }

            columns.push(field.id);
            values.push(entity.get(field.id).clone());
        }

        let op = Insert {
            model: model.id,
            columns,
            values: ValueRecord::from_vec(values),
            returning: returning.clone(),
        };

        let response = self.exec(op.into()).await?;

        if returning.is_empty() {
            return Ok(());
        }

        let Some(row) = response.rows.into_values().into_iter().next() else {
            return Err(Error::record_not_found(format!(
                "insert into {} returned no generated values",
                model.table_name()
            )));
        };

        for (field, value) in returning.into_iter().zip(row) {
            entity.set(field, value);
        }

        Ok(())
    }

    async fn update(&mut self, entity: &Entity) -> Result<()> {
        let model = self.schema.model(entity.model);

        let assignments: Vec<_> = model
            .primitives()
            .filter(|field| !field.primary_key)
            .map(|field| (field.id, entity.get(field.id).clone()))
            .collect();

        // Key-only entities have nothing to update
        if assignments.is_empty() {
            return Ok(());
        }

        let op = UpdateByKey {
            model: model.id,
            key: entity.key(model),
            assignments,
        };

        self.exec(op.into()).await?;
        Ok(())
    }

    async fn delete(&mut self, entity: &Entity) -> Result<()> {
        let model: &Model = self.schema.model(entity.model);
        let op = DeleteByKey {
            model: model.id,
            key: entity.key(model),
        };

        self.exec(op.into()).await?;
        Ok(())
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(gust_core::err!("session connection is closed"));
        };

        connection.exec(&self.schema, op).await
    }
}

impl<'a> Layer<'a> {
    pub fn new() -> Layer<'a> {
        Layer::default()
    }

    /// Queues `entity` to be brought to `state` on the next flush.
    pub fn set_state(&mut self, entity: &'a mut Entity, state: EntityState) {
        self.pending.push((entity, state));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued changes in `state`
    pub fn count(&self, state: EntityState) -> usize {
        self.pending.iter().filter(|(_, s)| *s == state).count()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.depth == 0 {
            return;
        }

        let Some(mut connection) = self.connection.take() else {
            return;
        };

        let schema = self.schema.clone();
        let depth = self.depth;

        tokio::spawn(async move {
            for _ in 0..depth {
                let _ = connection.exec(&schema, Transaction::Rollback.into()).await;
            }
        });
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("depth", &self.depth)
            .finish()
    }
}
