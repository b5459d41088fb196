use alloc::string::String;
use core::fmt::{self, Display, Formatter};

use crate::container::InvalidBehavior;

/// An inert pointer to another service by id.
///
/// References are produced by definition/configuration layers wherever one
/// service's construction needs to point at another without resolving it
/// eagerly; only such a layer dereferences them, by translating the
/// descriptor into a [`Container::get_with`](crate::Container::get_with)
/// call when the dependent service is instantiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    id: String,
    invalid_behavior: InvalidBehavior,
    strict: bool,
}

impl Reference {
    /// Creates a strict reference that raises when the target is missing.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "reference target id can't be empty");
        Self {
            id,
            invalid_behavior: InvalidBehavior::Raise,
            strict: true,
        }
    }

    #[must_use]
    pub fn with_invalid_behavior(mut self, invalid_behavior: InvalidBehavior) -> Self {
        self.invalid_behavior = invalid_behavior;
        self
    }

    /// Marks the reference as tolerated when absent or mismatched during
    /// partial compilation.
    #[must_use]
    pub fn non_strict(mut self) -> Self {
        self.strict = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn invalid_behavior(&self) -> InvalidBehavior {
        self.invalid_behavior
    }

    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Reference;
    use crate::container::InvalidBehavior;

    use alloc::string::ToString as _;

    #[test]
    fn test_defaults() {
        let reference = Reference::new("mailer");

        assert_eq!(reference.id(), "mailer");
        assert_eq!(reference.invalid_behavior(), InvalidBehavior::Raise);
        assert!(reference.is_strict());
    }

    #[test]
    fn test_modifiers() {
        let reference = Reference::new("mailer")
            .with_invalid_behavior(InvalidBehavior::ReturnNull)
            .non_strict();

        assert_eq!(reference.invalid_behavior(), InvalidBehavior::ReturnNull);
        assert!(!reference.is_strict());
    }

    #[test]
    fn test_display_yields_target_id() {
        assert_eq!(Reference::new("mailer").to_string(), "mailer");
    }

    #[test]
    #[should_panic(expected = "reference target id can't be empty")]
    fn test_empty_id_rejected() {
        let _ = Reference::new("");
    }
}
