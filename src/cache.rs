use alloc::{borrow::ToOwned as _, collections::BTreeMap, string::String, vec::Vec};

use crate::container::Instance;

/// Services displaced by a re-entrant scope activation, keyed by the scope
/// they belonged to.
pub(crate) type ScopedSnapshot = BTreeMap<String, BTreeMap<String, Instance>>;

/// The container's mutable resolution state.
///
/// `services` is the authoritative lookup map across the active scope chain;
/// `scoped` only records which ids belong to which active scope so they can
/// be torn down on leave or displacement. `loading` holds the ids currently
/// being resolved, in call order, for cycle detection.
#[derive(Default)]
pub(crate) struct Cache {
    services: BTreeMap<String, Instance>,
    scoped: BTreeMap<String, BTreeMap<String, Instance>>,
    stacks: BTreeMap<String, Vec<ScopedSnapshot>>,
    loading: Vec<String>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub(crate) fn get(&self, id: &str) -> Option<Instance> {
        self.services.get(id).cloned()
    }

    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    pub(crate) fn insert(&mut self, id: String, instance: Instance) {
        self.services.insert(id, instance);
    }

    pub(crate) fn insert_scoped(&mut self, scope: &str, id: String, instance: Instance) {
        if let Some(map) = self.scoped.get_mut(scope) {
            map.insert(id.clone(), instance.clone());
        }
        self.services.insert(id, instance);
    }

    #[must_use]
    pub(crate) fn is_scope_active(&self, name: &str) -> bool {
        self.scoped.contains_key(name)
    }

    #[must_use]
    pub(crate) fn is_loading(&self, id: &str) -> bool {
        self.loading.iter().any(|loading| loading == id)
    }

    #[must_use]
    pub(crate) fn loading_chain(&self) -> Vec<String> {
        self.loading.clone()
    }

    pub(crate) fn begin_loading(&mut self, id: &str) {
        self.loading.push(id.to_owned());
    }

    pub(crate) fn end_loading(&mut self, id: &str) {
        if let Some(position) = self.loading.iter().rposition(|loading| loading == id) {
            self.loading.remove(position);
        }
    }

    /// Pushes the live services of `name` and its descendants onto `name`'s
    /// stack and removes them from the live maps, so a re-entrant activation
    /// starts clean.
    pub(crate) fn displace(&mut self, name: &str, descendants: &[String]) {
        let snapshot = self.take_scoped(name, descendants);
        self.stacks.entry(name.to_owned()).or_default().push(snapshot);
    }

    /// Activates `name` with an empty scoped map.
    pub(crate) fn activate(&mut self, name: &str) {
        self.scoped.insert(name.to_owned(), BTreeMap::new());
    }

    /// Removes the live services of `name` and its descendants, deactivating
    /// those scopes.
    pub(crate) fn evict(&mut self, name: &str, descendants: &[String]) {
        let _ = self.take_scoped(name, descendants);
    }

    /// Restores the most recent snapshot displaced by a re-entrant activation
    /// of `name`, if any.
    pub(crate) fn restore(&mut self, name: &str) {
        let Some(stack) = self.stacks.get_mut(name) else {
            return;
        };
        let Some(snapshot) = stack.pop() else {
            return;
        };
        if stack.is_empty() {
            self.stacks.remove(name);
        }
        for (scope, services) in snapshot {
            for (id, instance) in &services {
                self.services.insert(id.clone(), instance.clone());
            }
            self.scoped.insert(scope, services);
        }
    }

    #[must_use]
    pub(crate) fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    fn take_scoped(&mut self, name: &str, descendants: &[String]) -> ScopedSnapshot {
        let mut snapshot = ScopedSnapshot::new();
        if let Some(services) = self.scoped.remove(name) {
            snapshot.insert(name.to_owned(), services);
        }
        for descendant in descendants {
            if let Some(services) = self.scoped.remove(descendant) {
                snapshot.insert(descendant.clone(), services);
            }
        }
        for services in snapshot.values() {
            for id in services.keys() {
                self.services.remove(id);
            }
        }
        snapshot
    }
}
