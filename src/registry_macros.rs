/// Builds a [`Registry`](crate::Registry) from `"id" => factory` pairs.
///
/// ```rust
/// use coffer::{registry, Container, InstantiateErrorKind};
///
/// struct Mailer;
///
/// let container = Container::new(registry! {
///     "mailer" => |_| Ok::<_, InstantiateErrorKind>(Mailer),
/// });
///
/// assert!(container.has("mailer"));
/// ```
#[macro_export]
macro_rules! registry {
    () => {
        $crate::RegistryBuilder::new().build()
    };
    ( $( $id:expr => $factory:expr ),+ $(,)? ) => {
        $crate::RegistryBuilder::new()
            $( .factory($id, $factory) )+
            .build()
    };
}
