use super::Error;
use crate::stmt::Value;

/// A validation or business rule failure tied to one entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EntityError {
    /// Short machine-readable name, e.g. `"Forbidden"`.
    pub error_name: String,

    /// Wire name of the entity type, `ShortName:#Namespace`.
    pub entity_type_name: String,

    /// Primary key values of the offending entity.
    pub key_values: Vec<Value>,

    /// The property the failure is about, if any.
    pub property_name: Option<String>,

    pub error_message: String,
}

/// Error carrying entity-level failures raised by save hooks.
#[derive(Debug)]
pub(super) struct EntityErrors {
    message: Box<str>,
    errors: Vec<EntityError>,
}

impl std::error::Error for EntityErrors {}

impl core::fmt::Display for EntityErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let plural = if self.errors.len() == 1 { "" } else { "s" };
        write!(
            f,
            "{} ({} entity error{})",
            self.message,
            self.errors.len(),
            plural
        )
    }
}

impl Error {
    /// Creates an error from a list of entity errors.
    ///
    /// Hooks raise this to abort a save with structured, per-entity
    /// feedback. It is never converted by the save exception handler.
    pub fn entity_errors(message: impl Into<String>, errors: Vec<EntityError>) -> Error {
        Error::from(super::ErrorKind::EntityErrors(EntityErrors {
            message: message.into().into(),
            errors,
        }))
    }

    /// Returns `true` if this error carries entity errors.
    pub fn is_entity_errors(&self) -> bool {
        self.as_entity_errors().is_some()
    }

    /// Returns the entity errors carried anywhere in the context chain.
    pub fn as_entity_errors(&self) -> Option<&[EntityError]> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::EntityErrors(inner) => Some(&inner.errors[..]),
            _ => None,
        })
    }
}
