mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

use super::{FieldId, FieldTy, ForeignKey, Model, ModelId, Schema};
