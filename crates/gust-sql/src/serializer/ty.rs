use super::{Params, ToSql};

use crate::stmt::Type;

impl ToSql for Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        // Declared types only pick the column affinity
        let name = match self {
            Type::Boolean => "BOOLEAN".to_string(),
            Type::SmallInt | Type::Integer | Type::BigInt => "INTEGER".to_string(),
            Type::Double => "REAL".to_string(),
            Type::Text | Type::Uuid | Type::Timestamp => "TEXT".to_string(),
            Type::VarChar(max) => format!("VARCHAR({max})"),
        };

        fmt!(f, name);
    }
}
