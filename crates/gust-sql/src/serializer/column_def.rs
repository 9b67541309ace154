use super::{Formatter, Params, ToSql};

use crate::stmt::ColumnDef;

/// A column definition. `rowid_key` marks the column SQLite uses as the rowid
/// alias, which must be spelled `INTEGER PRIMARY KEY`.
pub(super) struct Column<'a> {
    pub(super) def: &'a ColumnDef,
    pub(super) rowid_key: bool,
}

impl ToSql for Column<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = f.serializer.column_name(self.def.field);

        fmt!(f, name " ");

        if self.rowid_key {
            fmt!(f, "INTEGER PRIMARY KEY");
        } else {
            fmt!(f, self.def.ty);
        }

        if !self.def.nullable {
            fmt!(f, " NOT NULL");
        }
    }
}
