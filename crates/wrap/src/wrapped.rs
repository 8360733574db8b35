//! Values decorated by a chain of proxies.
//!
//! A [`Wrapped`] value is either a bare [`Record`] or the outermost [`Proxy`] of a chain. Every
//! proxy keeps a reference to the value it wraps, so the chain can always be walked back down to
//! the record it was built on, see [`unwrap`].

use crate::decorator::Decorator;
use crate::proxy::Proxy;
use micro_orm::Record;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

type DynProxy<M> = dyn Proxy<Model = M>;

pub enum Wrapped<M> {
    Bare(Record<M>),
    Proxied(Arc<DynProxy<M>>),
}

fn as_any<M: 'static>(proxy: &DynProxy<M>) -> &(dyn Any + 'static) {
    proxy
}

impl<M: Send + Sync + 'static> Wrapped<M> {
    pub fn new(record: Record<M>) -> Self {
        Wrapped::Bare(record)
    }

    pub fn from_proxy<P: Proxy<Model = M>>(proxy: P) -> Self {
        Wrapped::Proxied(Arc::new(proxy))
    }

    /// Returns the outermost proxy, `None` for a bare record.
    pub fn outer(&self) -> Option<&DynProxy<M>> {
        match self {
            Wrapped::Bare(_) => None,
            Wrapped::Proxied(proxy) => Some(&**proxy),
        }
    }

    /// Returns the value the outermost proxy wraps.
    pub fn inner(&self) -> Option<&Wrapped<M>> {
        self.outer().map(|proxy| proxy.wrapped())
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Wrapped::Proxied(_))
    }

    /// Iterates over the proxies of the chain, outermost first.
    pub fn layers(&self) -> Layers<'_, M> {
        Layers { next: Some(self) }
    }

    pub fn depth(&self) -> usize {
        self.layers().count()
    }

    /// Returns `true` if the outermost proxy is a `P`.
    pub fn is<P: Proxy<Model = M>>(&self) -> bool {
        self.outer().is_some_and(|proxy| as_any(proxy).is::<P>())
    }

    /// Finds the outermost proxy of type `P` anywhere in the chain.
    pub fn layer<P: Proxy<Model = M>>(&self) -> Option<&P> {
        self.layers().find_map(|proxy| as_any(proxy).downcast_ref::<P>())
    }

    /// Returns the record at the bottom of the chain.
    pub fn record(&self) -> &Record<M> {
        let mut current = self;
        loop {
            match current {
                Wrapped::Bare(record) => return record,
                Wrapped::Proxied(proxy) => current = proxy.wrapped(),
            }
        }
    }

    pub fn into_record(self) -> Record<M> {
        unwrap(&self)
    }
}

/// Applies `decorators` in order, each one wraps the output of the previous one.
///
/// The last decorator ends up outermost. With no decorator the value is returned unchanged.
pub fn wrap<M, D>(value: impl Into<Wrapped<M>>, decorators: &[D]) -> Wrapped<M>
where
    M: Send + Sync + 'static,
    D: Decorator<Wrapped<M>, Out = Wrapped<M>>,
{
    decorators.iter().fold(value.into(), |wrapped, decorator| decorator.decorate(wrapped))
}

/// Strips every proxy and returns the record the chain was built on.
pub fn unwrap<M: Send + Sync + 'static>(wrapped: &Wrapped<M>) -> Record<M> {
    triomphe::Arc::clone(wrapped.record())
}

/// Iterator over the proxies of a [`Wrapped`] chain, see [`Wrapped::layers`].
pub struct Layers<'a, M> {
    next: Option<&'a Wrapped<M>>,
}

impl<'a, M: Send + Sync + 'static> Iterator for Layers<'a, M> {
    type Item = &'a DynProxy<M>;

    fn next(&mut self) -> Option<Self::Item> {
        let proxy = self.next?.outer()?;
        self.next = Some(proxy.wrapped());
        Some(proxy)
    }
}

impl<M> fmt::Debug for Layers<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layers").finish_non_exhaustive()
    }
}

impl<M: Send + Sync + 'static> Deref for Wrapped<M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.record()
    }
}

impl<M> Clone for Wrapped<M> {
    fn clone(&self) -> Self {
        match self {
            Wrapped::Bare(record) => Wrapped::Bare(triomphe::Arc::clone(record)),
            Wrapped::Proxied(proxy) => Wrapped::Proxied(Arc::clone(proxy)),
        }
    }
}

impl<M: Send + Sync + 'static> From<Record<M>> for Wrapped<M> {
    fn from(record: Record<M>) -> Self {
        Wrapped::new(record)
    }
}

impl<M: PartialEq + Send + Sync + 'static> PartialEq for Wrapped<M> {
    fn eq(&self, other: &Self) -> bool {
        **self.record() == **other.record()
    }
}

impl<M: Eq + Send + Sync + 'static> Eq for Wrapped<M> {}

impl<M: fmt::Debug + Send + Sync + 'static> fmt::Debug for Wrapped<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layers = self.layers().map(|proxy| proxy.name()).collect::<Vec<_>>();
        f.debug_struct("Wrapped").field("layers", &layers).field("record", &**self.record()).finish()
    }
}
