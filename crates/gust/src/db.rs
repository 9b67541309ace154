mod builder;
pub use builder::Builder;

use crate::{Entity, Session};

use gust_core::{
    driver::{
        operation::{GetByKey, Scan},
        Capability, Connection, Driver,
    },
    schema::app::ModelId,
    stmt::Value,
    Result, Schema,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state between all `Db` clones.
struct Shared {
    schema: Arc<Schema>,
    driver: Box<dyn Driver>,

    /// Every handle goes through one connection. Sessions hold it for their
    /// whole lifetime.
    connection: Arc<Mutex<Box<dyn Connection>>>,
}

/// A database handle: a schema bound to a driver connection.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.driver.capability()
    }

    /// Creates the tables backing every model of the schema.
    pub async fn push_schema(&self) -> Result<()> {
        let mut connection = self.shared.connection.lock().await;
        connection.push_schema(&self.shared.schema).await
    }

    /// Opens a change tracking session. The session has exclusive use of the
    /// connection until it is dropped.
    pub async fn session(&self) -> Session {
        let connection = self.shared.connection.clone().lock_owned().await;
        Session::new(self.shared.schema.clone(), connection)
    }

    /// Loads one entity by primary key. Composite keys are passed as a record.
    pub async fn get_by_key(&self, model: ModelId, key: impl Into<Value>) -> Result<Option<Entity>> {
        let op = GetByKey {
            model,
            key: key.into(),
        };

        let mut connection = self.shared.connection.lock().await;
        let rows = connection
            .exec(&self.shared.schema, op.into())
            .await?
            .rows
            .into_values();

        Ok(rows
            .into_iter()
            .next()
            .map(|record| Entity::from_record(model, record)))
    }

    /// Loads every entity of `model`, ordered by primary key.
    pub async fn all(&self, model: ModelId) -> Result<Vec<Entity>> {
        let mut connection = self.shared.connection.lock().await;
        let rows = connection
            .exec(&self.shared.schema, Scan { model }.into())
            .await?
            .rows
            .into_values();

        Ok(rows
            .into_iter()
            .map(|record| Entity::from_record(model, record))
            .collect())
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .field("models", &self.shared.schema.models().len())
            .finish()
    }
}
