pub mod app;
pub use app::Schema;

mod builder;
pub use builder::{Builder, ModelBuilder};

mod name;
pub use name::Name;
