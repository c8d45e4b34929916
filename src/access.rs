//! Subscript-style and property-style access.
//!
//! Both layers only forward to [`Registry::get`], [`Registry::has`] and [`Registry::set`].
//! Neither can remove an entry: their `unset` operations do nothing.

use std::any::Any;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{Entry, Registry, RegistryError};

/// Returns the identifier behind `key` if its type is string-like.
fn identifier<K: Any>(key: &K) -> Option<&str> {
    let key = key as &dyn Any;
    if let Some(s) = key.downcast_ref::<&'static str>() {
        Some(*s)
    } else if let Some(s) = key.downcast_ref::<String>() {
        Some(s.as_str())
    } else if let Some(s) = key.downcast_ref::<Box<str>>() {
        Some(&**s)
    } else if let Some(s) = key.downcast_ref::<Arc<str>>() {
        Some(&**s)
    } else if let Some(s) = key.downcast_ref::<Cow<'static, str>>() {
        Some(&**s)
    } else {
        None
    }
}

fn require_identifier<K: Any>(key: &K) -> Result<&str, RegistryError> {
    identifier(key).ok_or(RegistryError::InvalidIdentifier {
        given: std::any::type_name::<K>(),
    })
}

/// Keyed access with keys of any type, rejecting those that are not strings.
///
/// Keys are inspected through [`Any`], so they must be `'static`: a borrowed `&str` built at
/// runtime is not accepted. Pass the owned `String` (or use [`Registry::get`],
/// [`Registry::has`] and [`Registry::set`] directly, which take any `&str`).
///
/// ```rust
/// use keyed_registry::{Entry, Registry, SubscriptAccess};
///
/// let registry = Registry::new();
/// registry.index_set(&"thirteen", Entry::value(13)).unwrap();
///
/// assert!(registry.index_exists(&"thirteen"));
/// assert!(!registry.index_exists(&13));
/// assert!(registry.index_set(&13, Entry::value("thirteen")).is_err());
/// ```
pub trait SubscriptAccess {
    fn index_get<T: Send + Sync + 'static, K: Any>(&self, key: &K) -> Result<Arc<T>, RegistryError>;

    /// `false` for keys that are not string-like; never fails.
    fn index_exists<K: Any>(&self, key: &K) -> bool;

    fn index_set<K: Any>(&self, key: &K, entry: impl Into<Entry>) -> Result<(), RegistryError>;

    /// No-op: entries cannot be removed.
    fn index_unset<K: Any>(&self, key: &K);
}

impl SubscriptAccess for Registry {
    fn index_get<T: Send + Sync + 'static, K: Any>(&self, key: &K) -> Result<Arc<T>, RegistryError> {
        self.get(require_identifier(key)?)
    }

    fn index_exists<K: Any>(&self, key: &K) -> bool {
        identifier(key).is_some_and(|id| self.has(id))
    }

    fn index_set<K: Any>(&self, key: &K, entry: impl Into<Entry>) -> Result<(), RegistryError> {
        self.set(require_identifier(key)?, entry);
        Ok(())
    }

    fn index_unset<K: Any>(&self, _key: &K) {}
}

/// A named, typed handle onto one registry entry.
///
/// Usually generated with [`properties!`](crate::properties).
pub struct Property<T> {
    id: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Property<T> {
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            _type: PhantomData,
        }
    }

    pub const fn id(&self) -> &'static str {
        self.id
    }

    pub fn get(&self, registry: &Registry) -> Result<Arc<T>, RegistryError> {
        registry.get(self.id)
    }

    pub fn has(&self, registry: &Registry) -> bool {
        registry.has(self.id)
    }

    pub fn set(&self, registry: &Registry, entry: impl Into<Entry>) {
        registry.set(self.id, entry);
    }

    pub fn set_value(&self, registry: &Registry, value: T) {
        registry.set(self.id, Entry::value(value));
    }

    /// No-op: entries cannot be removed.
    pub fn unset(&self, _registry: &Registry) {}
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
