use super::{Formatter, Params, ToSql};

use crate::stmt::Filter;

impl ToSql for &Filter {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let mut s = "";
        for (column, value) in self.columns.iter().zip(&self.values) {
            let name = f.serializer.column_name(*column);
            fmt!(f, s name " = " value);
            s = " AND ";
        }
    }
}
