use alloc::{string::String, vec::Vec};
use core::any::TypeId;

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Service {id} not found: no instance has been set and no factory is registered")]
    NotFound { id: String },
    #[error("Circular reference detected while resolving service {id}, path: {}", chain.join(" -> "))]
    CircularReference { id: String, chain: Vec<String> },
    #[error("Incorrect service type for {id}. Actual: {actual:?}, expected: {expected:?}")]
    IncorrectType {
        id: String,
        expected: TypeId,
        actual: TypeId,
    },
    #[error("Factory for service {id} failed")]
    Factory {
        id: String,
        #[source]
        source: InstantiateErrorKind,
    },
}
