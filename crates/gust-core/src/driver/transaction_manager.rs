use std::borrow::Cow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsolationLevel {
    ReadUncommitted,
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

/// Manages transaction nesting depth and generates the SQL for
/// `BEGIN`/`SAVEPOINT`, `COMMIT`/`RELEASE SAVEPOINT`, and
/// `ROLLBACK`/`ROLLBACK TO SAVEPOINT` based on the current nesting level.
#[derive(Debug)]
pub struct TransactionManager {
    depth: u32,
}

impl TransactionManager {
    /// `BEGIN` / `COMMIT` / `ROLLBACK`. SQLite transactions are always
    /// serializable, so no isolation level is sent.
    pub fn sqlite() -> Self {
        Self { depth: 0 }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the SQL to begin a transaction or create a savepoint, and
    /// increments the nesting depth.
    pub fn start(&mut self) -> Cow<'static, str> {
        let sql = if self.depth > 0 {
            Cow::Owned(format!("SAVEPOINT sp_{}", self.depth))
        } else {
            Cow::Borrowed("BEGIN")
        };
        self.depth += 1;
        sql
    }

    /// Returns the SQL to commit the current transaction or release a
    /// savepoint, and decrements the nesting depth.
    pub fn commit(&mut self) -> Cow<'static, str> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            Cow::Borrowed("COMMIT")
        } else {
            Cow::Owned(format!("RELEASE SAVEPOINT sp_{}", self.depth))
        }
    }

    /// Returns the SQL to roll back the current transaction or savepoint, and
    /// decrements the nesting depth.
    pub fn rollback(&mut self) -> Cow<'static, str> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            Cow::Borrowed("ROLLBACK")
        } else {
            Cow::Owned(format!("ROLLBACK TO SAVEPOINT sp_{}", self.depth))
        }
    }
}
