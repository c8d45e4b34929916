//! Bulk registration and registry awareness.

use std::sync::Arc;

use crate::Registry;

/// A module that registers a batch of entries when installed.
///
/// Installing a provider is the same as running its `set` calls in place; later providers
/// overwrite earlier ones on shared identifiers.
///
/// ```rust
/// use keyed_registry::{Provider, Registry};
///
/// struct Thirteen;
///
/// impl Provider for Thirteen {
///     fn populate(&self, registry: &Registry) {
///         registry.set_factory("thirteen", |_| 13);
///     }
/// }
///
/// let registry = Registry::new();
/// registry.install(&Thirteen);
/// assert_eq!(*registry.get::<i32>("thirteen").unwrap(), 13);
/// ```
pub trait Provider {
    fn populate(&self, registry: &Registry);
}

impl<F> Provider for F
where
    F: Fn(&Registry),
{
    fn populate(&self, registry: &Registry) {
        self(registry)
    }
}

/// Something that keeps a reference to the registry it was wired from.
pub trait RegistryAware {
    fn registry(&self) -> Option<&Arc<Registry>>;

    fn set_registry(&mut self, registry: Arc<Registry>);
}

/// Plain holder implementing [`RegistryAware`], meant to be embedded in services.
///
/// ```rust
/// use keyed_registry::{Registry, RegistryAware, RegistryHandle};
/// use std::sync::Arc;
///
/// let mut handle = RegistryHandle::default();
/// assert!(handle.registry().is_none());
///
/// let registry = Arc::new(Registry::new());
/// handle.set_registry(Arc::clone(&registry));
/// assert!(Arc::ptr_eq(handle.registry().unwrap(), &registry));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RegistryHandle {
    registry: Option<Arc<Registry>>,
}

impl RegistryHandle {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }
}

impl RegistryAware for RegistryHandle {
    fn registry(&self) -> Option<&Arc<Registry>> {
        self.registry.as_ref()
    }

    fn set_registry(&mut self, registry: Arc<Registry>) {
        self.registry = Some(registry);
    }
}
