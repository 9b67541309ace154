//! Dynamic values flowing between the adapter and the drivers.

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;

#[cfg(feature = "serde")]
mod value_serde;
