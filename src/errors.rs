mod container;
mod instantiate;
mod parameters;
mod resolve;

pub use container::{AddScopeErrorKind, EnterScopeErrorKind, LeaveScopeErrorKind, SetErrorKind};
pub use instantiate::InstantiateErrorKind;
pub use parameters::ParametersErrorKind;
pub use resolve::ResolveErrorKind;
