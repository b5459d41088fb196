use alloc::{borrow::ToOwned as _, collections::BTreeMap, string::String, vec::Vec};

use crate::errors::AddScopeErrorKind;

/// Implicit root scope; services stored here live as long as the container.
pub const CONTAINER_SCOPE: &str = "container";

/// Reserved scope name for never-cached services; services can't be stored
/// under it.
pub const PROTOTYPE_SCOPE: &str = "prototype";

/// Declared scopes with their parent links and precomputed descendant lists.
///
/// The graph is a forest rooted at the implicit [`CONTAINER_SCOPE`]: a scope's
/// parent must pre-exist at declaration time, so cycles are impossible.
/// Whether a scope is currently *active* is container state, not graph state.
#[derive(Debug, Default)]
pub(crate) struct ScopeGraph {
    parents: BTreeMap<String, String>,
    children: BTreeMap<String, Vec<String>>,
}

impl ScopeGraph {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declares a scope under `parent`, appending it to the descendant list
    /// of every ancestor up to the root.
    pub(crate) fn add(&mut self, name: &str, parent: &str) -> Result<(), AddScopeErrorKind> {
        if name == CONTAINER_SCOPE || name == PROTOTYPE_SCOPE {
            return Err(AddScopeErrorKind::ReservedName { name: name.to_owned() });
        }
        if self.parents.contains_key(name) {
            return Err(AddScopeErrorKind::Duplicate { name: name.to_owned() });
        }
        if parent != CONTAINER_SCOPE && !self.parents.contains_key(parent) {
            return Err(AddScopeErrorKind::UnknownParent {
                name: name.to_owned(),
                parent: parent.to_owned(),
            });
        }

        self.parents.insert(name.to_owned(), parent.to_owned());
        self.children.insert(name.to_owned(), Vec::new());

        let mut ancestor = parent.to_owned();
        while ancestor != CONTAINER_SCOPE {
            if let Some(descendants) = self.children.get_mut(&ancestor) {
                descendants.push(name.to_owned());
            }
            match self.parents.get(&ancestor) {
                Some(next) => ancestor = next.clone(),
                None => break,
            }
        }

        Ok(())
    }

    #[must_use]
    pub(crate) fn has(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    #[must_use]
    pub(crate) fn parent(&self, name: &str) -> Option<&str> {
        self.parents.get(name).map(String::as_str)
    }

    /// Transitive descendants of `name`, in declaration order.
    #[must_use]
    pub(crate) fn children(&self, name: &str) -> &[String] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{ScopeGraph, CONTAINER_SCOPE, PROTOTYPE_SCOPE};
    use crate::errors::AddScopeErrorKind;

    #[test]
    fn test_add_under_root() {
        let mut graph = ScopeGraph::new();
        graph.add("request", CONTAINER_SCOPE).unwrap();

        assert!(graph.has("request"));
        assert_eq!(graph.parent("request"), Some(CONTAINER_SCOPE));
        assert!(graph.children("request").is_empty());
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut graph = ScopeGraph::new();

        assert!(matches!(
            graph.add(CONTAINER_SCOPE, CONTAINER_SCOPE),
            Err(AddScopeErrorKind::ReservedName { .. })
        ));
        assert!(matches!(
            graph.add(PROTOTYPE_SCOPE, CONTAINER_SCOPE),
            Err(AddScopeErrorKind::ReservedName { .. })
        ));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut graph = ScopeGraph::new();
        graph.add("request", CONTAINER_SCOPE).unwrap();

        assert!(matches!(
            graph.add("request", CONTAINER_SCOPE),
            Err(AddScopeErrorKind::Duplicate { .. })
        ));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut graph = ScopeGraph::new();

        assert!(matches!(
            graph.add("child", "request"),
            Err(AddScopeErrorKind::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_descendants_propagate_to_all_ancestors() {
        let mut graph = ScopeGraph::new();
        graph.add("request", CONTAINER_SCOPE).unwrap();
        graph.add("subrequest", "request").unwrap();
        graph.add("widget", "subrequest").unwrap();

        assert_eq!(graph.children("request"), ["subrequest", "widget"]);
        assert_eq!(graph.children("subrequest"), ["widget"]);
        assert!(graph.children("widget").is_empty());
    }
}
