#![no_std]

extern crate alloc;

pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod naming;
pub(crate) mod parameters;
pub(crate) mod reference;
pub(crate) mod registry;
pub(crate) mod registry_macros;
pub(crate) mod scope;
pub(crate) mod service;

pub use container::{Container, Instance, InvalidBehavior, Resolved, SERVICE_CONTAINER_ID};
pub use errors::{
    AddScopeErrorKind, EnterScopeErrorKind, InstantiateErrorKind, LeaveScopeErrorKind, ParametersErrorKind, ResolveErrorKind,
    SetErrorKind,
};
pub use instantiator::{instance, Factory};
pub use naming::{camelize, factory_method_name, id_from_factory_method, underscore};
pub use parameters::{ParameterStore, ParameterValue};
pub use reference::Reference;
pub use registry::{Registry, RegistryBuilder};
pub use scope::{CONTAINER_SCOPE, PROTOTYPE_SCOPE};
