use super::{Formatter, Params, ToSql};

use gust_core::stmt;

/// Values are always bound as parameters
impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self);
        placeholder.to_sql(f);
    }
}
