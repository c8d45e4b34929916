use thiserror::Error;

/// Boxed error raised by a caller-supplied factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by registry operations.
///
/// Every variant except [`RegistryError::Factory`] is a container error. `NotFound` and
/// `TypeMismatch` are the specializations raised by `get` for a well-formed identifier.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A key of a non string-like type was used where an identifier is required.
    #[error("Service ID must be a string, {given} given.")]
    InvalidIdentifier { given: &'static str },

    #[error("Service with ID '{id}' not found.")]
    NotFound { id: String },

    /// The entry resolved, but not to the requested type.
    #[error("Service with ID '{id}' is not a {expected}.")]
    TypeMismatch { id: String, expected: &'static str },

    /// A singleton whose factory failed on its first (and only) evaluation.
    #[error("Singleton factory failed on first resolution: {reason}")]
    SingletonPoisoned { reason: String },

    /// Error raised inside a factory, passed through untouched.
    #[error(transparent)]
    Factory(BoxError),
}

impl RegistryError {
    /// Lifts any error into a factory failure.
    ///
    /// ```rust
    /// use keyed_registry::{Factory, Registry, RegistryError};
    ///
    /// let registry = Registry::new();
    /// registry.set(
    ///     "port",
    ///     Factory::fallible(|_| "80x".parse::<u16>().map_err(RegistryError::factory)),
    /// );
    /// assert!(!registry.get::<u16>("port").unwrap_err().is_container_error());
    /// ```
    pub fn factory(err: impl Into<BoxError>) -> Self {
        RegistryError::Factory(err.into())
    }

    /// True only for a well-formed identifier that was never set.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// True for every failure detected by the registry itself, as opposed to one raised
    /// by a factory.
    pub fn is_container_error(&self) -> bool {
        !matches!(self, RegistryError::Factory(_))
    }
}
