use gust_core::driver::IsolationLevel;

use std::time::Duration;

/// Settings for one [`PersistManager`](crate::PersistManager).
///
/// There is no process-wide default instance; every manager is handed its own
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct GustConfig {
    pub transaction_settings: TransactionSettings,
    pub metadata: MetadataOptions,
}

#[derive(Debug, Clone)]
pub struct TransactionSettings {
    /// Isolation level requested when the save transaction starts
    pub isolation_level: IsolationLevel,

    /// Passed to the driver when the transaction starts. Drivers may treat it
    /// as a lock wait limit or ignore it.
    pub timeout: Duration,

    pub transaction_type: TransactionType,
}

/// How a save is wrapped in a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionType {
    /// All layers run inside one transaction on the save connection
    #[default]
    DbTransaction,

    /// No enclosing transaction. Every layer flush is final, so a failure
    /// leaves the layers committed before it in place.
    None,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Indent the metadata JSON
    pub pretty: bool,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            isolation_level: IsolationLevel::ReadCommitted,
            timeout: Duration::from_secs(60),
            transaction_type: TransactionType::DbTransaction,
        }
    }
}

impl TransactionSettings {
    pub fn uses_transaction(&self) -> bool {
        self.transaction_type == TransactionType::DbTransaction
    }
}
