use super::Error;
use crate::stmt::Value;

/// Error when two new entities of one type share a temporary key.
#[derive(Debug)]
pub(super) struct DuplicateTempKey {
    entity_type: Box<str>,
    temp_value: Value,
}

impl std::error::Error for DuplicateTempKey {}

impl core::fmt::Display for DuplicateTempKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "temporary key {:?} registered twice for entity type `{}`",
            self.temp_value, self.entity_type
        )
    }
}

impl Error {
    /// Creates a duplicate temporary key error.
    pub fn duplicate_temp_key(entity_type: impl Into<String>, temp_value: Value) -> Error {
        Error::from(super::ErrorKind::DuplicateTempKey(DuplicateTempKey {
            entity_type: entity_type.into().into(),
            temp_value,
        }))
    }

    /// Returns `true` if this error is a duplicate temporary key error.
    pub fn is_duplicate_temp_key(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::DuplicateTempKey(_)))
    }
}
