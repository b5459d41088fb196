use alloc::boxed::Box;

use super::base::Service;
use crate::Container;

pub(crate) struct BoxCloneService<Response, Error>(
    pub(crate) Box<dyn CloneService<Response = Response, Error = Error> + Send + Sync>,
);

pub(crate) trait CloneService: Service {
    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneService<Response = Self::Response, Error = Self::Error> + Send + Sync>;
}

impl<T> CloneService for T
where
    T: Service + Clone + Send + Sync + 'static,
{
    #[inline]
    fn clone_box(&self) -> Box<dyn CloneService<Response = T::Response, Error = T::Error> + Send + Sync> {
        Box::new(self.clone())
    }
}

impl<Response, Error> Clone for BoxCloneService<Response, Error> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl<Response, Error> Service for BoxCloneService<Response, Error> {
    type Response = Response;
    type Error = Error;

    #[inline]
    fn call(&mut self, container: Container) -> Result<Self::Response, Self::Error> {
        self.0.call(container)
    }
}
