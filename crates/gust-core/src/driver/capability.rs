#[derive(Debug)]
pub struct Capability {
    /// When true, the store uses a SQL-based query language.
    pub sql: bool,

    /// Supports `RETURNING` on insert, used to read back generated keys.
    pub returning: bool,

    /// The isolation level of a transaction can be chosen when it starts. If
    /// false, every transaction runs serializable.
    pub isolation_levels: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        returning: true,
        isolation_levels: false,
    };
}
