mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::{CreateTable, ForeignKeyDef};

mod delete;
pub use delete::Delete;

mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod select;
pub use select::Select;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// Number of columns each returned row carries, `None` when the statement
    /// only reports a row count.
    pub fn returning_width(&self) -> Option<usize> {
        match self {
            Statement::Insert(stmt) if !stmt.returning.is_empty() => Some(stmt.returning.len()),
            Statement::Select(stmt) => Some(stmt.columns.len()),
            _ => None,
        }
    }
}
