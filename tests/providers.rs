//! Integration tests for provider installation.

use keyed_registry::{Factory, Provider, Registry, RegistryAware, RegistryHandle};
use std::sync::Arc;

struct ThirteenProvider;

impl Provider for ThirteenProvider {
    fn populate(&self, registry: &Registry) {
        registry.set_factory("thirteen", |_| 13i32);
    }
}

struct GreetingProvider {
    name: &'static str,
}

impl Provider for GreetingProvider {
    fn populate(&self, registry: &Registry) {
        let name = self.name;
        registry
            .set_value("name", name.to_string())
            .set(
                "greeting",
                Registry::as_singleton(Factory::fallible(|r| {
                    let name = r.get::<String>("name")?;
                    Ok::<_, keyed_registry::RegistryError>(format!("Hello, {name}!"))
                })),
            );
    }
}

#[test]
fn test_install() {
    let registry = Registry::new();
    registry.install(&ThirteenProvider);
    assert!(registry.has("thirteen"));
    assert_eq!(*registry.get::<i32>("thirteen").unwrap(), 13);
}

#[test]
fn test_install_is_chainable() {
    let registry = Registry::new();
    let greeting = registry
        .install(&ThirteenProvider)
        .install(&GreetingProvider { name: "World" })
        .get_cloned::<String>("greeting")
        .unwrap();

    assert_eq!(greeting, "Hello, World!");
}

#[test]
fn test_disjoint_providers_both_resolve() {
    let registry = Registry::new();
    registry.install(&ThirteenProvider);
    registry.install(&GreetingProvider { name: "Ada" });

    assert_eq!(*registry.get::<i32>("thirteen").unwrap(), 13);
    assert_eq!(&*registry.get::<String>("greeting").unwrap(), "Hello, Ada!");
    assert_eq!(registry.ids(), vec!["greeting", "name", "thirteen"]);
}

#[test]
fn test_later_provider_overwrites() {
    let registry = Registry::new();
    registry.set_value("thirteen", "not yet".to_string());
    registry.install(&ThirteenProvider);
    assert_eq!(*registry.get::<i32>("thirteen").unwrap(), 13);

    registry.install(&|r: &Registry| {
        r.set_value("thirteen", 31i32);
    });
    assert_eq!(*registry.get::<i32>("thirteen").unwrap(), 31);
}

#[test]
fn test_install_equals_inline_registration() {
    let installed = Registry::new();
    installed.install(&GreetingProvider { name: "Bob" });

    let inline = Registry::new();
    GreetingProvider { name: "Bob" }.populate(&inline);

    assert_eq!(installed.ids(), inline.ids());
    assert_eq!(
        installed.get_cloned::<String>("greeting").unwrap(),
        inline.get_cloned::<String>("greeting").unwrap()
    );
}

#[test]
fn test_service_keeps_registry() {
    #[derive(Default)]
    struct Mailer {
        handle: RegistryHandle,
    }

    impl RegistryAware for Mailer {
        fn registry(&self) -> Option<&Arc<Registry>> {
            self.handle.registry()
        }

        fn set_registry(&mut self, registry: Arc<Registry>) {
            self.handle.set_registry(registry);
        }
    }

    let registry = Arc::new(Registry::new());
    registry.set_value("from", "noreply@example.com".to_string());

    let mut mailer = Mailer::default();
    assert!(mailer.registry().is_none());
    mailer.set_registry(Arc::clone(&registry));

    let from = mailer
        .registry()
        .unwrap()
        .get_cloned::<String>("from")
        .unwrap();
    assert_eq!(from, "noreply@example.com");
}
