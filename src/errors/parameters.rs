use alloc::{string::String, vec::Vec};

#[derive(thiserror::Error, Debug)]
pub enum ParametersErrorKind {
    #[error("Parameter {name} not found")]
    NotFound { name: String },
    #[error("The parameter store is frozen, no further changes are allowed")]
    Frozen,
    #[error("Circular reference detected while resolving parameter {name}, path: {}", chain.join(" -> "))]
    CircularReference { name: String, chain: Vec<String> },
    #[error("Parameter {name} holds a non-scalar value and can't be inlined into a string")]
    NonScalarInline { name: String },
}
