use alloc::{borrow::ToOwned, collections::BTreeSet, string::String, sync::Arc, vec::Vec};
use core::any::{Any, TypeId};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    cache::Cache,
    errors::{
        AddScopeErrorKind, EnterScopeErrorKind, InstantiateErrorKind, LeaveScopeErrorKind, ParametersErrorKind, ResolveErrorKind,
        SetErrorKind,
    },
    naming::normalize_id,
    parameters::{ParameterStore, ParameterValue},
    registry::Registry,
    scope::{ScopeGraph, CONTAINER_SCOPE, PROTOTYPE_SCOPE},
    service::Service as _,
};

/// A resolved service instance as stored in the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The id under which the container resolves itself.
pub const SERVICE_CONTAINER_ID: &str = "service_container";

/// What [`Container::get_with`] does when an id has neither a cached
/// instance nor a registered factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidBehavior {
    /// Fail with [`ResolveErrorKind::NotFound`].
    Raise,
    /// Yield [`Resolved::Absent`].
    ReturnNull,
    /// Yield [`Resolved::Omitted`], telling the caller to skip the value
    /// entirely rather than substitute an empty one.
    Ignore,
}

/// Outcome of a resolution with a non-raising [`InvalidBehavior`].
#[derive(Clone)]
pub enum Resolved {
    Found(Instance),
    Absent,
    Omitted,
}

impl Resolved {
    #[inline]
    #[must_use]
    pub fn instance(self) -> Option<Instance> {
        match self {
            Self::Found(instance) => Some(instance),
            Self::Absent | Self::Omitted => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[inline]
    #[must_use]
    pub fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }
}

/// A string-keyed service container with hierarchical scopes.
///
/// The handle is cheap to clone and shares one set of state; factories
/// receive a clone to resolve their own dependencies through, so a `get`
/// may re-enter the container on the same thread without deadlocking.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: Registry,
    scopes: Mutex<ScopeGraph>,
    parameters: Mutex<ParameterStore>,
    cache: Mutex<Cache>,
}

impl Container {
    /// Creates a container over a factory registry with empty parameters.
    #[inline]
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_parameters(registry, ParameterStore::new())
    }

    /// Creates a container over a factory registry and an initial parameter
    /// store.
    #[must_use]
    pub fn with_parameters(registry: Registry, parameters: ParameterStore) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                scopes: Mutex::new(ScopeGraph::new()),
                parameters: Mutex::new(parameters),
                cache: Mutex::new(Cache::new()),
            }),
        }
    }

    /// Stores a service instance in the root container scope.
    pub fn set(&self, id: &str, instance: Instance) {
        let id = normalize_id(id);
        debug!(service = %id, "Set");
        self.inner.cache.lock().insert(id, instance);
    }

    /// Stores a value as a service instance in the root container scope.
    pub fn set_value<T: Send + Sync + 'static>(&self, id: &str, value: T) {
        self.set(id, Arc::new(value));
    }

    /// Stores a service instance in a scope.
    ///
    /// The instance lands in the flat lookup map as well; the scoped map only
    /// records ownership so the instance can be torn down when the scope is
    /// left or re-entered.
    ///
    /// # Errors
    /// - [`SetErrorKind::PrototypeScope`] for the reserved prototype scope
    /// - [`SetErrorKind::InactiveScope`] if the scope is not currently active
    pub fn set_scoped(&self, id: &str, instance: Instance, scope: &str) -> Result<(), SetErrorKind> {
        if scope == PROTOTYPE_SCOPE {
            let err = SetErrorKind::PrototypeScope;
            error!("{}", err);
            return Err(err);
        }
        if scope == CONTAINER_SCOPE {
            self.set(id, instance);
            return Ok(());
        }

        let id = normalize_id(id);
        let mut cache = self.inner.cache.lock();
        if !cache.is_scope_active(scope) {
            let err = SetErrorKind::InactiveScope { scope: scope.to_owned() };
            error!("{}", err);
            return Err(err);
        }
        debug!(service = %id, scope = scope, "Set");
        cache.insert_scoped(scope, id, instance);
        Ok(())
    }

    /// Stores a value as a service instance in a scope.
    ///
    /// # Errors
    /// See [`Self::set_scoped`].
    pub fn set_scoped_value<T: Send + Sync + 'static>(&self, id: &str, value: T, scope: &str) -> Result<(), SetErrorKind> {
        self.set_scoped(id, Arc::new(value), scope)
    }

    /// Gets a service by id, resolving it through its registered factory on
    /// a cache miss.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotFound`] if the id has neither a cached
    ///   instance nor a factory
    /// - [`ResolveErrorKind::CircularReference`] if the id is already being
    ///   resolved higher up the call chain
    /// - [`ResolveErrorKind::Factory`] if the factory fails
    pub fn get(&self, id: &str) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("get", service = id);
        let _guard = span.enter();

        match self.resolve(id)? {
            Some(instance) => Ok(instance),
            None => {
                let err = ResolveErrorKind::NotFound { id: normalize_id(id) };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Gets a service by id with an explicit missing-service behavior.
    ///
    /// Cycle detection and factory failures are never suppressed; only the
    /// "nothing is registered under this id" case is subject to
    /// `invalid_behavior`.
    ///
    /// # Errors
    /// See [`Self::get`]; `NotFound` is only returned under
    /// [`InvalidBehavior::Raise`].
    pub fn get_with(&self, id: &str, invalid_behavior: InvalidBehavior) -> Result<Resolved, ResolveErrorKind> {
        let span = info_span!("get", service = id);
        let _guard = span.enter();

        match self.resolve(id)? {
            Some(instance) => Ok(Resolved::Found(instance)),
            None => match invalid_behavior {
                InvalidBehavior::Raise => {
                    let err = ResolveErrorKind::NotFound { id: normalize_id(id) };
                    error!("{}", err);
                    Err(err)
                }
                InvalidBehavior::ReturnNull => {
                    debug!("Not found, treated as absent");
                    Ok(Resolved::Absent)
                }
                InvalidBehavior::Ignore => {
                    debug!("Not found, treated as omitted");
                    Ok(Resolved::Omitted)
                }
            },
        }
    }

    /// Gets a service by id and downcasts it to a concrete type.
    ///
    /// # Errors
    /// See [`Self::get`], plus [`ResolveErrorKind::IncorrectType`] when the
    /// stored instance is not a `T`.
    pub fn get_downcast<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ResolveErrorKind> {
        let instance = self.get(id)?;
        let actual = (*instance).type_id();
        instance.downcast::<T>().map_err(|_| {
            let err = ResolveErrorKind::IncorrectType {
                id: normalize_id(id),
                expected: TypeId::of::<T>(),
                actual,
            };
            error!("{}", err);
            err
        })
    }

    /// True if the id is cached, buildable by a registered factory, or the
    /// container's own id. Never triggers resolution.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        let id = normalize_id(id);
        if id == SERVICE_CONTAINER_ID {
            return true;
        }
        self.inner.cache.lock().contains(&id) || self.inner.registry.contains(&id)
    }

    /// Declares a scope under a parent scope.
    ///
    /// # Errors
    /// - [`AddScopeErrorKind::ReservedName`] for `container`/`prototype`
    /// - [`AddScopeErrorKind::Duplicate`] if already declared
    /// - [`AddScopeErrorKind::UnknownParent`] if the parent isn't declared
    pub fn add_scope(&self, name: &str, parent: &str) -> Result<(), AddScopeErrorKind> {
        self.inner.scopes.lock().add(name, parent).inspect_err(|err| error!("{}", err))?;
        debug!(scope = name, parent = parent, "Scope declared");
        Ok(())
    }

    #[must_use]
    pub fn has_scope(&self, name: &str) -> bool {
        self.inner.scopes.lock().has(name)
    }

    /// True iff the scope has been entered and not yet left.
    #[must_use]
    pub fn is_scope_active(&self, name: &str) -> bool {
        self.inner.cache.lock().is_scope_active(name)
    }

    /// Activates a scope.
    ///
    /// Re-entering an already active scope displaces its (and its
    /// descendants') live services onto the scope's stack; the new activation
    /// starts with no scoped services either way.
    ///
    /// # Errors
    /// - [`EnterScopeErrorKind::UnknownScope`] if the scope was never declared
    /// - [`EnterScopeErrorKind::InactiveParent`] if the declared parent is not
    ///   active
    pub fn enter_scope(&self, name: &str) -> Result<(), EnterScopeErrorKind> {
        let (parent, descendants) = {
            let scopes = self.inner.scopes.lock();
            match scopes.parent(name) {
                Some(parent) => (parent.to_owned(), scopes.children(name).to_vec()),
                None => {
                    let err = EnterScopeErrorKind::UnknownScope { name: name.to_owned() };
                    error!("{}", err);
                    return Err(err);
                }
            }
        };

        let mut cache = self.inner.cache.lock();
        if parent != CONTAINER_SCOPE && !cache.is_scope_active(&parent) {
            let err = EnterScopeErrorKind::InactiveParent {
                name: name.to_owned(),
                parent,
            };
            error!("{}", err);
            return Err(err);
        }
        if cache.is_scope_active(name) {
            debug!(scope = name, "Displacing services of the already active scope");
            cache.displace(name, &descendants);
        }
        cache.activate(name);
        debug!(scope = name, "Scope entered");
        Ok(())
    }

    /// Deactivates a scope, evicting its and its descendants' services and
    /// restoring the services displaced by an enclosing re-entrant
    /// activation, if any.
    ///
    /// # Errors
    /// Returns [`LeaveScopeErrorKind::Inactive`] if the scope is not active.
    pub fn leave_scope(&self, name: &str) -> Result<(), LeaveScopeErrorKind> {
        let descendants = self.inner.scopes.lock().children(name).to_vec();

        let mut cache = self.inner.cache.lock();
        if !cache.is_scope_active(name) {
            let err = LeaveScopeErrorKind::Inactive { name: name.to_owned() };
            error!("{}", err);
            return Err(err);
        }
        cache.evict(name, &descendants);
        cache.restore(name);
        debug!(scope = name, "Scope left");
        Ok(())
    }

    /// All resolvable service ids: cached instances, registered factories and
    /// the container's own id, sorted.
    #[must_use]
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: BTreeSet<String> = self.inner.registry.ids().map(ToOwned::to_owned).collect();
        ids.extend(self.inner.cache.lock().service_ids().map(ToOwned::to_owned));
        ids.insert(SERVICE_CONTAINER_ID.to_owned());
        ids.into_iter().collect()
    }

    /// Gets a parameter by name.
    ///
    /// # Errors
    /// Returns [`ParametersErrorKind::NotFound`] if the name isn't set.
    pub fn parameter(&self, name: &str) -> Result<ParameterValue, ParametersErrorKind> {
        self.inner.parameters.lock().get(name)
    }

    /// Sets a parameter.
    ///
    /// # Errors
    /// Returns [`ParametersErrorKind::Frozen`] after [`Self::compile`].
    pub fn set_parameter(&self, name: &str, value: impl Into<ParameterValue>) -> Result<(), ParametersErrorKind> {
        self.inner.parameters.lock().set(name, value).inspect_err(|err| error!("{}", err))
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.inner.parameters.lock().has(name)
    }

    /// Resolves all parameter placeholders and freezes the parameter store.
    ///
    /// Compiling twice is allowed: the second resolution finds nothing left
    /// to substitute.
    ///
    /// # Errors
    /// Propagates [`ParametersErrorKind`] failures from resolution.
    pub fn compile(&self) -> Result<(), ParametersErrorKind> {
        let mut parameters = self.inner.parameters.lock();
        parameters.resolve().inspect_err(|err| error!("{}", err))?;
        parameters.freeze();
        debug!("Container compiled");
        Ok(())
    }

    /// True once [`Self::compile`] has frozen the parameters.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.inner.parameters.lock().is_frozen()
    }

    fn resolve(&self, id: &str) -> Result<Option<Instance>, ResolveErrorKind> {
        let id = normalize_id(id);
        if id == SERVICE_CONTAINER_ID {
            return Ok(Some(Arc::new(self.clone()) as Instance));
        }

        let factory = {
            let mut cache = self.inner.cache.lock();
            if let Some(instance) = cache.get(&id) {
                debug!("Found in cache");
                return Ok(Some(instance));
            }
            if cache.is_loading(&id) {
                let err = ResolveErrorKind::CircularReference {
                    id: id.clone(),
                    chain: cache.loading_chain(),
                };
                error!("{}", err);
                return Err(err);
            }
            let Some(factory) = self.inner.registry.get(&id) else {
                debug!("Not found in cache and no factory is registered");
                return Ok(None);
            };
            cache.begin_loading(&id);
            factory
        };

        // the lock is released: the factory may recurse into `get`
        let loading = LoadingGuard {
            cache: &self.inner.cache,
            id: &id,
        };
        let mut factory = factory;
        let result = factory.call(self.clone());
        drop(loading);

        match result {
            Ok(instance) => {
                debug!("Resolved");
                // a singleton factory stores the canonical instance via `set`
                // before returning; hand back the stored one so cache hits and
                // factory-produced results agree
                let stored = self.inner.cache.lock().get(&id);
                Ok(Some(stored.unwrap_or(instance)))
            }
            Err(InstantiateErrorKind::Resolve(inner)) => {
                // a nested resolution failure propagates unchanged, so cycle
                // errors surface at the outermost caller with the full chain
                Err(*inner)
            }
            Err(err) => {
                let err = ResolveErrorKind::Factory { id, source: err };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

/// Unmarks a loading id on every exit path, including factory panics.
struct LoadingGuard<'a> {
    cache: &'a Mutex<Cache>,
    id: &'a str,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.cache.lock().end_loading(self.id);
    }
}
