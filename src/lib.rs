//! # Keyed Registry
//!
//! A minimal inversion-of-control registry: values and lazily evaluated factories stored
//! under string identifiers, with once-only (singleton) evaluation and bulk registration
//! through providers.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_registry::{Factory, Registry};
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! registry
//!     .set_value("greeting", "Hello, World!".to_string())
//!     .set_factory("length", |r| r.get::<String>("greeting").unwrap().len())
//!     .set("shared", Registry::as_singleton(Factory::new(|_| vec![1, 2, 3])));
//!
//! let message: Arc<String> = registry.get("greeting").unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! assert_eq!(*registry.get::<usize>("length").unwrap(), 13);
//!
//! let a: Arc<Vec<i32>> = registry.get("shared").unwrap();
//! let b: Arc<Vec<i32>> = registry.get("shared").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! ## Entries
//!
//! - [`Entry::Value`] is returned as stored, even when it is a closure
//! - [`Entry::Factory`] runs on every read unless wrapped with [`Registry::as_singleton`]
//! - [`Registry::as_opaque`] builds a factory that hands back its value untouched
//!
//! ## Main Types
//!
//! - [`Registry`] - the store (`set`, `get`, `has`, `install`)
//! - [`Provider`] - bulk registration hook
//! - [`SubscriptAccess`] and [`Property`] - access sugar over `get`/`has`/`set`
//! - [`define_registry!`] - process-wide registries
//! - [`RegistryError`] - failure kinds

mod access;
mod entry;
mod macros;
mod provider;
mod registry;
mod registry_error;
mod registry_event;

pub use access::{Property, SubscriptAccess};
pub use entry::{Entry, Factory, Shared};
pub use provider::{Provider, RegistryAware, RegistryHandle};
pub use registry::{Registry, TraceCallback};
pub use registry_error::{BoxError, RegistryError};
pub use registry_event::{log_to_tracing, RegistryEvent};
