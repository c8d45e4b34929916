//! The identifier-keyed store.
//!
//! A [`Registry`] maps string identifiers to [`Entry`] values. Reads of a factory entry run
//! the factory with the registry itself, so factories can pull their own dependencies:
//!
//! ```
//! use keyed_registry::{Factory, Registry};
//! use std::sync::Arc;
//!
//! struct Config { url: String }
//! struct Client { config: Arc<Config> }
//!
//! let registry = Registry::new();
//! registry
//!     .set_value("config", Config { url: "postgres://localhost".into() })
//!     .set(
//!         "client",
//!         Registry::as_singleton(Factory::fallible(|r| {
//!             Ok::<_, keyed_registry::RegistryError>(Client { config: r.get("config")? })
//!         })),
//!     );
//!
//! let client: Arc<Client> = registry.get("client").unwrap();
//! assert_eq!(client.config.url, "postgres://localhost");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use crate::entry::{Entry, Factory, Shared};
use crate::provider::Provider;
use crate::{RegistryError, RegistryEvent};

/// User-supplied tracing callback.
///
/// The callback is invoked after the registry and trace locks have been released, so it
/// may use the registry it observes.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// String-keyed store of values and factories.
///
/// Entries are never removed; the last `set` for an identifier wins.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Entry>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates an empty registry with no trace callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry pre-seeded with `entries`.
    ///
    /// ```
    /// use keyed_registry::{Entry, Factory, Registry};
    ///
    /// let registry = Registry::with_entries([
    ///     ("foo", Entry::value("bar")),
    ///     ("baz", Factory::new(|_| "qux").into()),
    /// ]);
    /// assert_eq!(*registry.get::<&str>("foo").unwrap(), "bar");
    /// assert_eq!(*registry.get::<&str>("baz").unwrap(), "qux");
    /// ```
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            trace: Mutex::new(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a callback invoked on every `set`, `get`, `has` and `install`.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback. Registered entries are not affected.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Store
    // -------------------------------------------------------------------------------------------------

    /// Stores `entry` under `id`, replacing any previous entry.
    pub fn set(&self, id: impl Into<String>, entry: impl Into<Entry>) -> &Self {
        let id = id.into();
        self.entries
            .write()
            // Every write is a single insert, so a poisoned map is still consistent.
            .unwrap_or_else(|p| p.into_inner())
            .insert(id.clone(), entry.into());

        self.emit_event(RegistryEvent::Set { id });
        self
    }

    /// Stores an immediate value.
    pub fn set_value<T: Send + Sync + 'static>(&self, id: impl Into<String>, value: T) -> &Self {
        self.set(id, Entry::value(value))
    }

    /// Stores a factory that runs on every `get`.
    pub fn set_factory<T, F>(&self, id: impl Into<String>, factory: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> T + Send + Sync + 'static,
    {
        self.set(id, Factory::new(factory))
    }

    /// Whether `id` is present. Never resolves a factory.
    pub fn has(&self, id: &str) -> bool {
        let found = self
            .entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(id);

        self.emit_event(RegistryEvent::Has {
            id: id.to_string(),
            found,
        });
        found
    }

    /// Resolves `id` without downcasting.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if `id` was never set
    /// - whatever the entry's factory returns, unchanged
    pub fn resolve(&self, id: &str) -> Result<Shared, RegistryError> {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(id)
            .cloned();

        self.emit_event(RegistryEvent::Get {
            id: id.to_string(),
            found: entry.is_some(),
        });

        // The map lock is released here so the factory can use the registry.
        match entry {
            Some(entry) => entry.resolve(self),
            None => Err(RegistryError::NotFound { id: id.to_string() }),
        }
    }

    /// Resolves `id` as a `T`.
    ///
    /// Factory entries are invoked on every call; wrap them with
    /// [`Registry::as_singleton`] to cache the result.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if `id` was never set
    /// - [`RegistryError::TypeMismatch`] if the entry does not resolve to a `T`
    /// - whatever the entry's factory returns, unchanged
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, RegistryError> {
        self.resolve(id)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolves `id` as a `T` and returns an owned clone of the value.
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(&self, id: &str) -> Result<T, RegistryError> {
        let arc = self.get::<T>(id)?;
        Ok((*arc).clone())
    }

    /// Lets `provider` register its entries, then returns the registry for chaining.
    pub fn install<P: Provider + ?Sized>(&self, provider: &P) -> &Self {
        self.emit_event(RegistryEvent::Install {
            provider: std::any::type_name::<P>(),
        });
        provider.populate(self);
        self
    }

    /// Identifiers currently present, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Number of identifiers present.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Whether nothing has been set yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------------------------------
    // Combinators
    // -------------------------------------------------------------------------------------------------

    /// See [`Factory::opaque`].
    pub fn as_opaque<T: Send + Sync + 'static>(value: T) -> Factory {
        Factory::opaque(value)
    }

    /// See [`Factory::singleton`].
    pub fn as_singleton(factory: Factory) -> Factory {
        Factory::singleton(factory)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("ids", &self.ids()).finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
