use alloc::{boxed::Box, sync::Arc};
use tracing::debug;

use crate::{
    container::Instance,
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService},
    Container,
};

/// A lazy creation function for one service id.
///
/// Factories receive the container handle and pull their own dependencies
/// from it by id. A factory that should behave as a singleton stores its
/// result back through [`Container::set`]; the container never caches
/// factory results on its own.
pub trait Factory: Clone + 'static {
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn create(&mut self, container: Container) -> Result<Self::Provides, Self::Error>;
}

impl<F, Provides, Error> Factory for F
where
    F: FnMut(Container) -> Result<Provides, Error> + Clone + 'static,
    Provides: Send + Sync + 'static,
    Error: Into<InstantiateErrorKind>,
{
    type Provides = Provides;
    type Error = Error;

    fn create(&mut self, container: Container) -> Result<Self::Provides, Self::Error> {
        self(container)
    }
}

pub(crate) type BoxedCloneFactory = BoxCloneService<Instance, InstantiateErrorKind>;

#[must_use]
pub(crate) fn boxed_factory<F>(factory: F) -> BoxedCloneFactory
where
    F: Factory + Send + Sync,
{
    BoxCloneService(Box::new(service_fn(move |container| {
        match factory.clone().create(container) {
            Ok(provides) => {
                debug!("Instantiated");
                Ok(Arc::new(provides) as Instance)
            }
            Err(err) => Err(err.into()),
        }
    })))
}

/// Wrapper to create a factory that just returns a value created outside the
/// container.
#[inline]
#[must_use]
pub const fn instance<T: Clone + Send + Sync + 'static>(val: T) -> impl Factory<Provides = T, Error = InstantiateErrorKind> {
    move |_: Container| Ok(val.clone())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{boxed_factory, instance};
    use crate::{errors::InstantiateErrorKind, service::Service as _, Container, Registry};

    use alloc::{
        format,
        string::{String, ToString},
        sync::Arc,
    };
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;
    use tracing_test::traced_test;

    struct Mailer {
        transport: &'static str,
    }

    #[test]
    #[traced_test]
    fn test_boxed_factory() {
        let call_count = Arc::new(AtomicU8::new(0));

        let mut factory = boxed_factory({
            let call_count = call_count.clone();
            move |_: Container| {
                call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call mailer factory");
                Ok::<_, InstantiateErrorKind>(Mailer { transport: "smtp" })
            }
        });

        let container = Container::new(Registry::default());

        let mailer_1 = factory.call(container.clone()).unwrap();
        let mailer_2 = factory.call(container).unwrap();

        assert_eq!(mailer_1.downcast::<Mailer>().unwrap().transport, "smtp");
        assert_eq!(mailer_2.downcast::<Mailer>().unwrap().transport, "smtp");
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_instance_factory() {
        let mut factory = boxed_factory(instance("static value"));
        let container = Container::new(Registry::default());

        let value = factory.call(container).unwrap();

        assert_eq!(*value.downcast::<&str>().unwrap(), "static value");
    }
}
