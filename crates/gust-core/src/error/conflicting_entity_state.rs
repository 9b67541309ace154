use super::Error;

/// Error when one save bundle carries the same entity (type and key) more
/// than once.
#[derive(Debug)]
pub(super) struct ConflictingEntityState {
    entity_type: Box<str>,
    key: Box<str>,
    first: Box<str>,
    second: Box<str>,
}

impl std::error::Error for ConflictingEntityState {}

impl core::fmt::Display for ConflictingEntityState {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "entity `{}` with key {} appears more than once in the save bundle ({} and {})",
            self.entity_type, self.key, self.first, self.second
        )
    }
}

impl Error {
    /// Creates a conflicting entity state error.
    ///
    /// Raised while decoding when two records in one batch target the same
    /// entity. No merge semantics are attempted.
    pub fn conflicting_entity_state(
        entity_type: impl Into<String>,
        key: impl core::fmt::Debug,
        first: impl core::fmt::Display,
        second: impl core::fmt::Display,
    ) -> Error {
        Error::from(super::ErrorKind::ConflictingEntityState(
            ConflictingEntityState {
                entity_type: entity_type.into().into(),
                key: format!("{key:?}").into(),
                first: first.to_string().into(),
                second: second.to_string().into(),
            },
        ))
    }

    /// Returns `true` if this error is a conflicting entity state error.
    pub fn is_conflicting_entity_state(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::ConflictingEntityState(_)))
    }
}
