use super::Error;

/// Error when entity types cannot be put in dependency order.
///
/// Raised while building the entity type catalog: after every type without
/// outstanding dependencies was emitted, some types remain and each of them
/// depends on another remaining type.
#[derive(Debug)]
pub(super) struct DependencyCycle {
    remaining: Vec<String>,
}

impl std::error::Error for DependencyCycle {}

impl core::fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "entity type dependency cycle; no progress possible ordering: {}",
            self.remaining.join(", ")
        )
    }
}

impl Error {
    /// Creates a dependency cycle error listing the types left unordered.
    pub fn dependency_cycle<I, S>(remaining: I) -> Error
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::from(super::ErrorKind::DependencyCycle(DependencyCycle {
            remaining: remaining.into_iter().map(Into::into).collect(),
        }))
    }

    /// Returns `true` if this error is a dependency cycle error.
    pub fn is_dependency_cycle(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::DependencyCycle(_)))
    }
}
