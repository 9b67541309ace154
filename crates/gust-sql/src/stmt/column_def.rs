use super::Type;

use gust_core::schema::app::{Field, FieldId};

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub field: FieldId,
    pub ty: Type,
    pub nullable: bool,

    /// The store assigns the value from a sequence
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Returns `None` for relation fields, which have no column.
    pub(crate) fn from_field(field: &Field) -> Option<ColumnDef> {
        let ty = field.primitive_ty()?;

        Some(ColumnDef {
            field: field.id,
            ty: Type::from_field(field, ty),
            nullable: field.nullable,
            auto_increment: field.is_auto_increment(),
        })
    }
}
