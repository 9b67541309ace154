use super::Error;

/// Error when a save bundle does not have the expected shape.
///
/// This occurs when:
/// - The bundle has no `entities` array
/// - An entity is not a JSON object or has no `entityAspect`
/// - The entity state or key generation type is not recognized
#[derive(Debug)]
pub(super) struct InvalidSaveBundle {
    message: Box<str>,
}

impl std::error::Error for InvalidSaveBundle {}

impl core::fmt::Display for InvalidSaveBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid save bundle: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid save bundle error.
    pub fn invalid_save_bundle(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSaveBundle(InvalidSaveBundle {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid save bundle error.
    pub fn is_invalid_save_bundle(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidSaveBundle(_)))
    }
}
