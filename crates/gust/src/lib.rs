pub mod catalog;
pub use catalog::{Catalog, EntityTypeDescriptor, ForeignKeyDescriptor};

mod config;
pub use config::{GustConfig, MetadataOptions, TransactionSettings, TransactionType};

pub mod db;
pub use db::Db;

pub mod decode;

mod entity;
pub use entity::{AccessorTable, Entity, PropertyAccessor, TypeAccessors};

mod fk_rewriter;
pub use fk_rewriter::rewrite_foreign_keys;

pub mod hooks;
pub use hooks::Hooks;

mod json;

pub mod key_mapping;
pub use key_mapping::{KeyMappingEntry, KeyMappingHandle, KeyMappingTable};

pub mod metadata;

mod mutation;
pub use mutation::{AutoGeneratedKey, AutoGeneratedKeyType, EntityState, MutationRecord, SaveMap};

mod persist;
pub use persist::{PersistManager, SaveStage, SaveWorkState};

mod save_result;
pub use save_result::{EntityKey, KeyMapping, SaveError, SaveOptions, SaveResult};

pub mod session;
pub use session::Session;

pub use gust_core::{
    bail, driver, err, schema, stmt, EntityError, Error, IntoError, Result, Schema,
};
