use super::Operation;
use crate::driver::IsolationLevel;

use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Transaction {
    /// Start a transaction
    Start {
        isolation: Option<IsolationLevel>,

        /// Advisory; drivers without statement timeouts ignore it
        timeout: Option<Duration>,
    },

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl Transaction {
    pub fn start() -> Self {
        Transaction::Start {
            isolation: None,
            timeout: None,
        }
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
