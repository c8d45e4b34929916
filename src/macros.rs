//! Macros for process-wide registries and property-style accessors.

/// Creates a process-wide registry with a single macro invocation.
///
/// The macro generates a module containing a lazily-created [`Registry`](crate::Registry)
/// and free functions delegating to it.
///
/// # Examples
///
/// ```rust
/// use keyed_registry::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(global);
///
/// global::set_value("answer", 42i32);
/// global::set_factory("greeting", |r| format!("answer is {}", r.get::<i32>("answer").unwrap()));
///
/// let answer: Arc<i32> = global::get("answer").unwrap();
/// assert_eq!(*answer, 42);
/// assert_eq!(global::get_cloned::<String>("greeting").unwrap(), "answer is 42");
/// ```
///
/// # Multiple Registries
///
/// Each invocation is isolated:
///
/// ```rust
/// use keyed_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::set_value("url", "postgres://localhost".to_string());
///
/// assert!(database::has("url"));
/// assert!(!cache::has("url"));
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<$crate::Registry> = LazyLock::new($crate::Registry::new);

            /// The underlying registry.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            /// Store an entry under `id`.
            pub fn set(id: impl Into<String>, entry: impl Into<$crate::Entry>) {
                REGISTRY.set(id, entry);
            }

            /// Store an immediate value under `id`.
            pub fn set_value<T: Send + Sync + 'static>(id: impl Into<String>, value: T) {
                REGISTRY.set_value(id, value);
            }

            /// Store a factory evaluated on every read.
            pub fn set_factory<T, F>(id: impl Into<String>, factory: F)
            where
                T: Send + Sync + 'static,
                F: Fn(&$crate::Registry) -> T + Send + Sync + 'static,
            {
                REGISTRY.set_factory(id, factory);
            }

            /// Resolve `id` as a `T`.
            pub fn get<T: Send + Sync + 'static>(id: &str) -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get(id)
            }

            /// Resolve `id` and clone the value.
            pub fn get_cloned<T: Send + Sync + Clone + 'static>(
                id: &str,
            ) -> Result<T, $crate::RegistryError> {
                REGISTRY.get_cloned(id)
            }

            /// Check whether `id` is present.
            pub fn has(id: &str) -> bool {
                REGISTRY.has(id)
            }

            /// Install a provider.
            pub fn install<P: $crate::Provider + ?Sized>(provider: &P) {
                REGISTRY.install(provider);
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}

/// Declares property-style accessors for a fixed set of entries.
///
/// Each field becomes an associated function returning a [`Property`](crate::Property)
/// named after the field.
///
/// ```rust
/// use keyed_registry::{properties, Registry};
///
/// properties! {
///     pub struct App {
///         thirteen: i32,
///         greeting: String,
///     }
/// }
///
/// let registry = Registry::new();
/// App::thirteen().set_value(&registry, 13);
/// App::greeting().set_value(&registry, "hi".to_string());
///
/// assert_eq!(*App::thirteen().get(&registry).unwrap(), 13);
/// assert!(App::greeting().has(&registry));
/// ```
#[macro_export]
macro_rules! properties {
    ($vis:vis struct $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $vis struct $name;

        impl $name {
            $(
                #[allow(dead_code)]
                pub const fn $field() -> $crate::Property<$ty> {
                    $crate::Property::new(stringify!($field))
                }
            )*
        }
    };
}
