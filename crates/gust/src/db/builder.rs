use super::{Db, Shared};

use gust_core::{driver::Driver, Error, Result, Schema};
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Default)]
pub struct Builder {
    schema: Option<Schema>,
}

impl Builder {
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// Connects using the driver selected by the URL scheme.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        let parsed = Url::parse(url).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url}"))
        })?;

        match parsed.scheme() {
            #[cfg(feature = "sqlite")]
            "sqlite" => self.build(gust_driver_sqlite::Sqlite::new(url)?).await,
            scheme => Err(Error::invalid_connection_url(format!(
                "unsupported database; scheme={scheme}; url={url}"
            ))),
        }
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = self.schema.take().unwrap_or_default();
        let connection = driver.connect().await?;

        tracing::debug!(url = %driver.url(), models = schema.models().len(), "connected");

        Ok(Db {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                driver: Box::new(driver),
                connection: Arc::new(Mutex::new(connection)),
            }),
        })
    }
}
