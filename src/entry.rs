//! Registry entries and the factory combinators.
//!
//! An [`Entry`] is explicitly tagged: [`Entry::Value`] is returned as-is, [`Entry::Factory`]
//! is invoked with the registry on every read. Storing a callable as data is just
//! `Entry::value(f)`; no invokability check is ever made.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::{Registry, RegistryError};

/// Type-erased, reference-counted value handed out by the registry.
pub type Shared = Arc<dyn Any + Send + Sync>;

type FactoryFn = dyn Fn(&Registry) -> Result<Shared, RegistryError> + Send + Sync;

/// A value or a deferred computation stored under an identifier.
#[derive(Clone)]
pub enum Entry {
    /// Immediate entry, returned unchanged.
    Value(Shared),
    /// Deferred entry, invoked with the registry at read time.
    Factory(Factory),
}

impl Entry {
    /// Wraps `value` in an `Arc` and stores it as an immediate entry.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Entry::Value(Arc::new(value))
    }

    /// Stores an existing `Arc` without re-wrapping it, so reads return the same allocation.
    pub fn value_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Entry::Value(value)
    }

    /// Whether the entry is deferred.
    pub fn is_factory(&self) -> bool {
        matches!(self, Entry::Factory(_))
    }

    pub(crate) fn resolve(&self, registry: &Registry) -> Result<Shared, RegistryError> {
        match self {
            Entry::Value(value) => Ok(Arc::clone(value)),
            Entry::Factory(factory) => factory.call(registry),
        }
    }
}

impl From<Factory> for Entry {
    fn from(factory: Factory) -> Self {
        Entry::Factory(factory)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(_) => f.write_str("Entry::Value(..)"),
            Entry::Factory(_) => f.write_str("Entry::Factory(..)"),
        }
    }
}

/// A cloneable handle to a deferred computation.
///
/// Cloning shares the underlying closure, including any singleton state it carries.
#[derive(Clone)]
pub struct Factory(Arc<FactoryFn>);

impl Factory {
    /// Wraps an infallible factory.
    ///
    /// ```rust
    /// use keyed_registry::{Factory, Registry};
    ///
    /// let registry = Registry::new();
    /// registry.set_value("base", 40u32);
    /// registry.set("answer", Factory::new(|r| *r.get::<u32>("base").unwrap() + 2));
    ///
    /// assert_eq!(*registry.get::<u32>("answer").unwrap(), 42);
    /// ```
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> T + Send + Sync + 'static,
    {
        Factory(Arc::new(move |registry: &Registry| {
            Ok(Arc::new(factory(registry)) as Shared)
        }))
    }

    /// Wraps a factory that may fail. Its error reaches the `get` caller unchanged.
    pub fn fallible<T, E, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<RegistryError>,
        F: Fn(&Registry) -> Result<T, E> + Send + Sync + 'static,
    {
        Factory(Arc::new(move |registry: &Registry| {
            factory(registry)
                .map(|value| Arc::new(value) as Shared)
                .map_err(Into::into)
        }))
    }

    /// Wraps a factory producing type-erased values directly.
    pub fn from_shared<F>(factory: F) -> Self
    where
        F: Fn(&Registry) -> Result<Shared, RegistryError> + Send + Sync + 'static,
    {
        Factory(Arc::new(factory))
    }

    /// A factory that ignores the registry and always returns `value` itself.
    ///
    /// Every call yields the same allocation, so the wrapped value (typically a closure)
    /// is handed out as data and never invoked.
    pub fn opaque<T: Send + Sync + 'static>(value: T) -> Self {
        let value: Shared = Arc::new(value);
        Factory(Arc::new(move |_: &Registry| Ok(Arc::clone(&value))))
    }

    /// Wraps `factory` so it is evaluated at most once.
    ///
    /// Each call creates fresh state, so two singletons over the same factory cache
    /// independently. The first evaluation holds the wrapper's lock; concurrent readers wait
    /// for it and then share its result. If that evaluation fails or panics the wrapper is
    /// poisoned: later calls return [`RegistryError::SingletonPoisoned`] and the factory is
    /// never retried.
    pub fn singleton(factory: Factory) -> Self {
        let state = Mutex::new(SingletonState::Pending);
        Factory(Arc::new(move |registry: &Registry| {
            let mut guard = state.lock().unwrap_or_else(|poisoned| {
                let mut guard = poisoned.into_inner();
                if matches!(*guard, SingletonState::Pending) {
                    *guard = SingletonState::Failed("factory panicked".to_string());
                }
                guard
            });

            match &*guard {
                SingletonState::Resolved(value) => return Ok(Arc::clone(value)),
                SingletonState::Failed(reason) => {
                    return Err(RegistryError::SingletonPoisoned {
                        reason: reason.clone(),
                    })
                }
                SingletonState::Pending => {}
            }

            match factory.call(registry) {
                Ok(value) => {
                    *guard = SingletonState::Resolved(Arc::clone(&value));
                    Ok(value)
                }
                Err(err) => {
                    *guard = SingletonState::Failed(err.to_string());
                    Err(err)
                }
            }
        }))
    }

    /// Runs the factory against `registry`.
    pub fn call(&self, registry: &Registry) -> Result<Shared, RegistryError> {
        (self.0)(registry)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

enum SingletonState {
    Pending,
    Resolved(Shared),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Factory {
        let counter = Arc::clone(counter);
        Factory::new(move |_| counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[test]
    fn test_value_resolves_to_same_allocation() {
        let registry = Registry::new();
        let entry = Entry::value(7u8);
        let a = entry.resolve(&registry).unwrap();
        let b = entry.resolve(&registry).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!entry.is_factory());
    }

    #[test]
    fn test_value_arc_keeps_callers_allocation() {
        let registry = Registry::new();
        let config = Arc::new("postgres://localhost".to_string());
        registry.set("config", Entry::value_arc(Arc::clone(&config)));

        let stored: Arc<String> = registry.get("config").unwrap();
        assert!(Arc::ptr_eq(&stored, &config));
        assert_eq!(Arc::strong_count(&config), 3);
    }

    #[test]
    fn test_from_shared_resolves_through_get() {
        let registry = Registry::new();
        registry.set_value("width", 6u32);
        registry.set(
            "area",
            Factory::from_shared(|r| {
                let width = r.get::<u32>("width")?;
                Ok(Arc::new(*width * 7) as Shared)
            }),
        );

        assert_eq!(*registry.get::<u32>("area").unwrap(), 42);
        assert!(matches!(
            registry.get::<u64>("area"),
            Err(RegistryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_plain_factory_runs_every_call() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let factory = counting(&counter);

        for _ in 0..4 {
            factory.call(&registry).unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_opaque_returns_identical_value() {
        let registry = Registry::new();
        let factory = Factory::opaque(|x: i32| x * 2);
        let a = factory.call(&registry).unwrap();
        let b = factory.call(&registry).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_singleton_runs_once() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let singleton = Factory::singleton(counting(&counter));

        let first = singleton.call(&registry).unwrap();
        let second = singleton.call(&registry).unwrap();
        let third = singleton.call(&registry).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[test]
    fn test_singleton_clone_shares_state() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let singleton = Factory::singleton(counting(&counter));
        let clone = singleton.clone();

        singleton.call(&registry).unwrap();
        clone.call(&registry).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_singleton_poisoned_after_error() {
        let registry = Registry::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let singleton = Factory::singleton(Factory::fallible(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            "nope".parse::<u32>().map_err(RegistryError::factory)
        }));

        let first = singleton.call(&registry).unwrap_err();
        assert!(matches!(first, RegistryError::Factory(_)));

        let second = singleton.call(&registry).unwrap_err();
        match second {
            RegistryError::SingletonPoisoned { reason } => {
                assert_eq!(reason, first.to_string())
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_singleton_poisoned_after_panic() {
        let registry = Registry::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let singleton = Factory::singleton(Factory::new(move |_| -> u32 {
            seen.fetch_add(1, Ordering::SeqCst);
            panic!("boom")
        }));

        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            singleton.call(&registry)
        }));
        assert!(first.is_err());

        let second = singleton.call(&registry);
        assert!(matches!(
            second,
            Err(RegistryError::SingletonPoisoned { .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_singleton_concurrent_first_resolution() {
        let registry = Arc::new(Registry::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let slow = Arc::clone(&counter);
        let singleton = Factory::singleton(Factory::new(move |_| {
            std::thread::sleep(std::time::Duration::from_millis(20));
            slow.fetch_add(1, Ordering::SeqCst)
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let singleton = singleton.clone();
                std::thread::spawn(move || singleton.call(&registry).unwrap())
            })
            .collect();

        let results: Vec<Shared> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
