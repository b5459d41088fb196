use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum AddScopeErrorKind {
    #[error("Scope name {name} is reserved and can't be declared")]
    ReservedName { name: String },
    #[error("Scope {name} is already declared")]
    Duplicate { name: String },
    #[error("Parent scope {parent} of scope {name} is not declared")]
    UnknownParent { name: String, parent: String },
}

#[derive(thiserror::Error, Debug)]
pub enum EnterScopeErrorKind {
    #[error("Scope {name} is not declared")]
    UnknownScope { name: String },
    #[error("Parent scope {parent} of scope {name} is not active")]
    InactiveParent { name: String, parent: String },
}

#[derive(thiserror::Error, Debug)]
pub enum LeaveScopeErrorKind {
    #[error("Scope {name} is not active")]
    Inactive { name: String },
}

#[derive(thiserror::Error, Debug)]
pub enum SetErrorKind {
    #[error("A service can't be stored in the prototype scope")]
    PrototypeScope,
    #[error("Scope {scope} is not active")]
    InactiveScope { scope: String },
}
