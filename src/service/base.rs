use crate::Container;

/// A unit of work driven by the container.
///
/// Factories are erased into services before they are stored in the
/// registry; the request is always the container handle the factory may
/// resolve its own dependencies through.
pub(crate) trait Service {
    type Response;
    type Error;

    fn call(&mut self, container: Container) -> Result<Self::Response, Self::Error>;
}
