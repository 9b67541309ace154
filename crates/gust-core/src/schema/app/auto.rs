/// How the store populates a key field for new records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoStrategy {
    /// The database assigns an increasing integer
    Increment,

    /// A random (v4) uuid is generated when the record is inserted
    Uuid,
}

impl AutoStrategy {
    /// Returns `true` if the auto is [`Increment`].
    ///
    /// [`Increment`]: AutoStrategy::Increment
    #[must_use]
    pub fn is_increment(&self) -> bool {
        matches!(self, Self::Increment)
    }
}
