mod delete_by_key;
pub use delete_by_key::DeleteByKey;

mod get_by_key;
pub use get_by_key::GetByKey;

mod insert;
pub use insert::Insert;

mod scan;
pub use scan::Scan;

mod transaction;
pub use transaction::Transaction;

mod update_by_key;
pub use update_by_key::UpdateByKey;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a new record
    Insert(Insert),

    /// Delete the record identified by the given key
    DeleteByKey(DeleteByKey),

    /// Get a record by its primary key
    GetByKey(GetByKey),

    /// Read every record of a model
    Scan(Scan),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Update a record by the primary key
    UpdateByKey(UpdateByKey),
}

impl Operation {
    /// Short name used when logging operations
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Insert(_) => "insert",
            Operation::DeleteByKey(_) => "delete_by_key",
            Operation::GetByKey(_) => "get_by_key",
            Operation::Scan(_) => "scan",
            Operation::Transaction(_) => "transaction",
            Operation::UpdateByKey(_) => "update_by_key",
        }
    }
}
