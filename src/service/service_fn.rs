use super::base::Service;
use crate::Container;

#[inline]
#[must_use]
pub(crate) const fn service_fn<T>(f: T) -> ServiceFn<T> {
    ServiceFn { f }
}

#[derive(Clone)]
pub(crate) struct ServiceFn<T> {
    f: T,
}

impl<F, Response, Error> Service for ServiceFn<F>
where
    F: FnMut(Container) -> Result<Response, Error>,
{
    type Response = Response;
    type Error = Error;

    #[inline]
    fn call(&mut self, container: Container) -> Result<Self::Response, Self::Error> {
        (self.f)(container)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::convert::Infallible;

    use super::{service_fn, Service as _};
    use crate::{Container, Registry};

    #[test]
    fn test_service() {
        let container = Container::new(Registry::default());
        let mut service = service_fn(|container: Container| Ok::<_, Infallible>(container.has("service_container")));

        assert!(service.call(container).unwrap());
    }
}
