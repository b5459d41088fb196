use alloc::{collections::BTreeMap, string::String};

use crate::{
    container::SERVICE_CONTAINER_ID,
    instantiator::{boxed_factory, BoxedCloneFactory, Factory},
    naming::normalize_id,
};

/// Builder for the container's factory table.
///
/// Factories are registered under lower-cased service ids; registering the
/// same id twice replaces the earlier factory.
#[derive(Default)]
pub struct RegistryBuilder {
    factories: BTreeMap<String, BoxedCloneFactory>,
}

impl RegistryBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for a service id.
    ///
    /// # Panics
    /// Panics if `id` is the reserved `service_container` id.
    #[must_use]
    pub fn factory<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Factory + Send + Sync,
    {
        let id = normalize_id(&id.into());
        assert!(
            id != SERVICE_CONTAINER_ID,
            "a factory can't be registered for the container's own id"
        );
        self.factories.insert(id, boxed_factory(factory));
        self
    }

    #[inline]
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

/// Immutable factory table keyed by service id.
///
/// The explicit replacement for factory-method-by-naming-convention lookup:
/// every resolvable id is registered here at build time, which also makes
/// id enumeration reflection-free.
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, BoxedCloneFactory>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub(crate) fn get(&self, id: &str) -> Option<BoxedCloneFactory> {
        self.factories.get(id).cloned()
    }

    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered service ids, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::RegistryBuilder;
    use crate::errors::InstantiateErrorKind;

    use alloc::vec::Vec;

    #[test]
    fn test_build_empty() {
        let registry = RegistryBuilder::new().build();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_normalized_and_sorted() {
        let registry = RegistryBuilder::new()
            .factory("Newsletter_Manager", |_| Ok::<_, InstantiateErrorKind>(()))
            .factory("mailer", |_| Ok::<_, InstantiateErrorKind>(()))
            .build();

        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, ["mailer", "newsletter_manager"]);
        assert!(registry.contains("newsletter_manager"));
        assert!(!registry.contains("Newsletter_Manager"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_id_replaces_factory() {
        let registry = RegistryBuilder::new()
            .factory("mailer", |_| Ok::<_, InstantiateErrorKind>(1i32))
            .factory("mailer", |_| Ok::<_, InstantiateErrorKind>(2i32))
            .build();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "a factory can't be registered for the container's own id")]
    fn test_container_id_rejected() {
        let _ = RegistryBuilder::new().factory("Service_Container", |_| Ok::<_, InstantiateErrorKind>(()));
    }
}
