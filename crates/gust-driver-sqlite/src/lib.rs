mod value;
pub(crate) use value::Value;

use gust_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Capability, Driver, IsolationLevel, Response, TransactionManager,
    },
    schema::app::FieldId,
    stmt, Error, Result, Schema,
};
use gust_sql::{self as sql};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn gust_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    transactions: TransactionManager,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        // Foreign keys are enforced per connection
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Error::driver_operation_failed)?;

        Ok(Self {
            connection,
            transactions: TransactionManager::sqlite(),
        })
    }

    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            Transaction::Start { isolation, timeout } => {
                if let Some(isolation) = isolation.filter(|i| *i != IsolationLevel::Serializable) {
                    tracing::debug!(
                        ?isolation,
                        "sqlite transactions are serializable; requested isolation level not applied"
                    );
                }

                if let Some(timeout) = timeout {
                    self.connection
                        .busy_timeout(timeout)
                        .map_err(Error::driver_operation_failed)?;
                }

                self.transactions.start()
            }
            Transaction::Commit => self.transactions.commit(),
            Transaction::Rollback => self.transactions.rollback(),
        };

        tracing::trace!(%sql, "sqlite transaction");

        self.connection
            .execute_batch(&sql)
            .map_err(Error::driver_operation_failed)?;

        Ok(Response::count(0))
    }

    fn create_table(&mut self, schema: &Schema, stmt: &sql::Statement) -> Result<()> {
        let mut params = Vec::<stmt::Value>::new();
        let sql = sql::Serializer::sqlite(schema).serialize(stmt, &mut params);
        debug_assert!(params.is_empty());

        tracing::debug!(%sql, "creating table");

        self.connection
            .execute(&sql, [])
            .map_err(Error::driver_operation_failed)?;

        Ok(())
    }
}

#[async_trait]
impl gust_core::driver::Connection for Connection {
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        let (sql, not_found): (sql::Statement, Option<String>) = match op {
            Operation::Transaction(op) => return self.transaction(op),
            Operation::Insert(op) => (op.into(), None),
            Operation::UpdateByKey(op) => {
                let context = not_found_context(schema, op.model, &op.key);
                (sql::Statement::update_by_key(schema, op), Some(context))
            }
            Operation::DeleteByKey(op) => (
                sql::Statement::delete_by_key(schema, &op),
                Some(not_found_context(schema, op.model, &op.key)),
            ),
            Operation::GetByKey(op) => (sql::Statement::get_by_key(schema, &op), None),
            Operation::Scan(op) => (sql::Statement::scan(schema, &op), None),
        };

        let mut params = Vec::<stmt::Value>::new();
        let sql_str = sql::Serializer::sqlite(schema).serialize(&sql, &mut params);

        tracing::trace!(sql = %sql_str, params = params.len(), "sqlite exec");

        let mut stmt = self
            .connection
            .prepare_cached(&sql_str)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let Some(ret_fields) = returning_fields(&sql) else {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)?;

            if count == 0 {
                if let Some(context) = not_found {
                    return Err(Error::record_not_found(context));
                }
            }

            return Ok(Response::count(count as _));
        };

        let ret_tys = ret_fields
            .iter()
            .map(|field| {
                schema.field(*field).primitive_ty().copied().ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "`{}` is a relation and has no column",
                        schema.field(*field).full_name(schema)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut items = vec![];

            for (index, ty) in ret_tys.iter().enumerate() {
                items.push(Value::from_sql(row, index, ty)?.into_inner());
            }

            ret.push(shape_row(schema, &sql, &ret_fields, items));
        }

        Ok(Response::values(ret))
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for model in schema.models() {
            self.create_table(schema, &sql::Statement::create_table(model))?;
        }

        Ok(())
    }
}

fn returning_fields(stmt: &sql::Statement) -> Option<Vec<FieldId>> {
    stmt.returning_width()?;

    match stmt {
        sql::Statement::Insert(stmt) => Some(stmt.returning.clone()),
        sql::Statement::Select(stmt) => Some(stmt.columns.clone()),
        _ => None,
    }
}

/// Select rows are widened to one slot per model field so callers can index
/// them by field. Insert rows keep the `RETURNING` order.
fn shape_row(
    schema: &Schema,
    stmt: &sql::Statement,
    fields: &[FieldId],
    items: Vec<stmt::Value>,
) -> stmt::ValueRecord {
    let sql::Statement::Select(select) = stmt else {
        return stmt::ValueRecord::from_vec(items);
    };

    let model = schema.model(select.model);
    let mut record = stmt::ValueRecord::nulls(model.fields.len());

    for (field, value) in fields.iter().zip(items) {
        record[field.index] = value;
    }

    record
}

fn not_found_context(
    schema: &Schema,
    model: gust_core::schema::app::ModelId,
    key: &stmt::Value,
) -> String {
    format!("table={} key={:?}", schema.model(model).table_name(), key)
}
