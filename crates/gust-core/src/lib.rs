pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{EntityError, Error, IntoError};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses Gust's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
