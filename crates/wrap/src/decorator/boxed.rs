use crate::decorator::Decorator;
use crate::wrapped::Wrapped;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

type DynDecorator<M> = dyn Decorator<Wrapped<M>, Out = Wrapped<M>> + Send + Sync;

#[derive(Debug, Clone, Copy)]
enum Identity {
    /// every value of the type decorates the same way, see [`crate::proxy`]
    Type(TypeId),
    /// the boxed value itself, shared by clones
    Instance,
}

/// A type-erased decorator of [`Wrapped`] values.
///
/// Equality is what removing a decorator from a list matches on. A decorator boxed with
/// [`BoxDecorator::new`] is only equal to its clones, so two decorators of the same type but with
/// different state are told apart. Decorators built by [`proxy`](crate::proxy) carry no state and
/// are equal whenever they build the same proxy type.
pub struct BoxDecorator<M> {
    identity: Identity,
    name: &'static str,
    decorator: Arc<DynDecorator<M>>,
}

impl<M: Send + Sync + 'static> BoxDecorator<M> {
    pub fn new<D>(decorator: D) -> Self
    where
        D: Decorator<Wrapped<M>, Out = Wrapped<M>> + Send + Sync + 'static,
    {
        Self { identity: Identity::Instance, name: type_name::<D>(), decorator: Arc::new(decorator) }
    }

    /// Boxes a stateless decorator, equal to every other one boxed with the same `id`.
    pub(crate) fn stateless<D>(id: TypeId, name: &'static str, decorator: D) -> Self
    where
        D: Decorator<Wrapped<M>, Out = Wrapped<M>> + Send + Sync + 'static,
    {
        Self { identity: Identity::Type(id), name, decorator: Arc::new(decorator) }
    }
}

impl<M> BoxDecorator<M> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<M> Decorator<Wrapped<M>> for BoxDecorator<M> {
    type Out = Wrapped<M>;

    #[inline]
    fn decorate(&self, raw: Wrapped<M>) -> Self::Out {
        self.decorator.decorate(raw)
    }
}

impl<M> Clone for BoxDecorator<M> {
    fn clone(&self) -> Self {
        Self { identity: self.identity, name: self.name, decorator: Arc::clone(&self.decorator) }
    }
}

impl<M> PartialEq for BoxDecorator<M> {
    fn eq(&self, other: &Self) -> bool {
        match (self.identity, other.identity) {
            (Identity::Type(a), Identity::Type(b)) => a == b,
            (Identity::Instance, Identity::Instance) => Arc::ptr_eq(&self.decorator, &other.decorator),
            _ => false,
        }
    }
}

impl<M> Eq for BoxDecorator<M> {}

impl<M> fmt::Debug for BoxDecorator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxDecorator").field(&self.name).finish()
    }
}
