/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `Registry::set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use keyed_registry::RegistryEvent;
///
/// let event = RegistryEvent::Set { id: "db".to_string() };
/// assert_eq!(event.to_string(), "set { id: db }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// An entry was stored under `id`.
    Set { id: String },

    /// An entry was requested.
    Get {
        id: String,
        /// Whether the identifier was present
        found: bool,
    },

    /// An existence check was performed.
    Has { id: String, found: bool },

    /// A provider was installed.
    Install {
        /// The type name of the provider
        provider: &'static str,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Set { id } => write!(f, "set {{ id: {id} }}"),
            RegistryEvent::Get { id, found } => write!(f, "get {{ id: {id}, found: {found} }}"),
            RegistryEvent::Has { id, found } => write!(f, "has {{ id: {id}, found: {found} }}"),
            RegistryEvent::Install { provider } => {
                write!(f, "install {{ provider: {provider} }}")
            }
        }
    }
}

/// Trace callback forwarding registry events to `tracing`.
///
/// Writes (`set`, `install`) are logged at `debug`, reads at `trace`.
///
/// ```rust
/// use keyed_registry::{log_to_tracing, Registry};
///
/// let registry = Registry::new();
/// registry.set_trace_callback(log_to_tracing);
/// registry.set_value("answer", 42u32);
/// ```
pub fn log_to_tracing(event: &RegistryEvent) {
    match event {
        RegistryEvent::Set { id } => tracing::debug!(id = %id, "registry set"),
        RegistryEvent::Install { provider } => {
            tracing::debug!(provider = %provider, "registry install")
        }
        RegistryEvent::Get { id, found } => tracing::trace!(id = %id, found, "registry get"),
        RegistryEvent::Has { id, found } => tracing::trace!(id = %id, found, "registry has"),
    }
}
