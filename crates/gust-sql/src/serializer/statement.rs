use super::{column_def::Column, Comma, Formatter, Params, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = f.serializer.table_name(self.model);
        let rowid_key = self.auto_increment_key();

        let columns = Comma(self.columns.iter().map(|def| Column {
            def,
            rowid_key: Some(def.field) == rowid_key,
        }));

        fmt!(f, "CREATE TABLE " table " (" columns);

        if rowid_key.is_none() {
            let pk = Comma(
                self.primary_key
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );
            fmt!(f, ", PRIMARY KEY (" pk ")");
        }

        for fk in &self.foreign_keys {
            let columns = Comma(
                fk.columns
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );
            let target = f.serializer.table_name(fk.target);
            let target_columns = Comma(
                fk.target_columns
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );

            fmt!(f, ", FOREIGN KEY (" columns ") REFERENCES " target " (" target_columns ")");
        }

        fmt!(f, ")");
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = f.serializer.table_name(self.model);

        if self.columns.is_empty() {
            fmt!(f, "INSERT INTO " table " DEFAULT VALUES");
        } else {
            let columns = Comma(
                self.columns
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );
            let values = Comma(self.values.iter());

            fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ")");
        }

        if !self.returning.is_empty() {
            let returning = Comma(
                self.returning
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );
            fmt!(f, " RETURNING " returning);
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = f.serializer.table_name(self.model);

        fmt!(f, "UPDATE " table " SET ");

        let mut s = "";
        for (field, value) in &self.assignments {
            let name = f.serializer.column_name(*field);
            fmt!(f, s name " = " value);
            s = ", ";
        }

        let filter = &self.filter;
        fmt!(f, " WHERE " filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = f.serializer.table_name(self.model);
        let filter = &self.filter;
        fmt!(f, "DELETE FROM " table " WHERE " filter);
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(
            self.columns
                .iter()
                .map(|field| f.serializer.column_name(*field))
                .collect::<Vec<_>>(),
        );
        let table = f.serializer.table_name(self.model);

        fmt!(f, "SELECT " columns " FROM " table);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.order_by.is_empty() {
            let order_by = Comma(
                self.order_by
                    .iter()
                    .map(|field| f.serializer.column_name(*field))
                    .collect::<Vec<_>>(),
            );
            fmt!(f, " ORDER BY " order_by);
        }
    }
}
