mod capability;
pub use capability::Capability;

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

mod transaction_manager;
pub use transaction_manager::{IsolationLevel, TransactionManager};

use crate::{async_trait, Result, Schema};

use std::{borrow::Cow, fmt::Debug, sync::Arc};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL the driver was configured with
    fn url(&self) -> Cow<'_, str>;

    /// Describes what the store supports
    fn capability(&self) -> &'static Capability;

    /// Open a new connection to the store
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> Result<Response>;

    /// Create the tables backing every model in the schema
    async fn push_schema(&mut self, schema: &Schema) -> Result<()>;
}
