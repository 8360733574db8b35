use crate::decorator::{BoxDecorator, Decorator};
use crate::wrapped::Wrapped;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// A layer around a [`Wrapped`] value.
///
/// A proxy exposes its own capabilities as methods on itself, and reaches the record it decorates
/// through [`Wrapped`]'s `Deref`. The chain can be queried for a capability with
/// [`Wrapped::is`] and [`Wrapped::layer`].
///
/// # Example
///
/// ```
/// use micro_orm::{Model, Record};
/// use micro_wrap::{proxy, unwrap, wrap, Proxy, Wrapped};
///
/// #[derive(Debug)]
/// struct Article {
///     id: u32,
///     title: &'static str,
/// }
///
/// impl Model for Article {
///     const NAME: &'static str = "article";
///     type Pk = u32;
///
///     fn pk(&self) -> u32 {
///         self.id
///     }
/// }
///
/// struct Shouting {
///     inner: Wrapped<Article>,
/// }
///
/// impl Shouting {
///     fn title(&self) -> String {
///         self.inner.title.to_uppercase()
///     }
/// }
///
/// impl Proxy for Shouting {
///     type Model = Article;
///
///     fn new(inner: Wrapped<Article>) -> Self {
///         Self { inner }
///     }
///
///     fn wrapped(&self) -> &Wrapped<Article> {
///         &self.inner
///     }
/// }
///
/// let record = Record::new(Article { id: 1, title: "hello" });
/// let wrapped = wrap(Record::clone(&record), &[proxy::<Shouting>()]);
///
/// assert_eq!(wrapped.id, 1);
/// assert_eq!(wrapped.layer::<Shouting>().unwrap().title(), "HELLO");
/// assert!(Record::ptr_eq(&unwrap(&wrapped), &record));
/// ```
pub trait Proxy: Any + Send + Sync {
    /// the record type at the bottom of the chain
    type Model;

    /// Builds the proxy around `inner`.
    fn new(inner: Wrapped<Self::Model>) -> Self
    where
        Self: Sized;

    /// Returns the value this proxy wraps.
    fn wrapped(&self) -> &Wrapped<Self::Model>;

    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// The decorator which builds a `P` around its input.
pub struct ProxyDecorator<P> {
    _proxy: PhantomData<fn() -> P>,
}

impl<P: Proxy> ProxyDecorator<P> {
    pub fn new() -> Self {
        Self { _proxy: PhantomData }
    }
}

impl<P: Proxy> Default for ProxyDecorator<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for ProxyDecorator<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ProxyDecorator<P> {}

impl<P> fmt::Debug for ProxyDecorator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProxyDecorator").field(&type_name::<P>()).finish()
    }
}

impl<P> Decorator<Wrapped<P::Model>> for ProxyDecorator<P>
where
    P: Proxy,
    P::Model: Send + Sync + 'static,
{
    type Out = Wrapped<P::Model>;

    fn decorate(&self, raw: Wrapped<P::Model>) -> Self::Out {
        Wrapped::from_proxy(P::new(raw))
    }
}

/// Returns the decorator constructing a `P`, ready to be put in a decorator list.
///
/// Every call returns an equal decorator, so a decorator added with `proxy::<P>()` can be removed
/// with another `proxy::<P>()`.
pub fn proxy<P>() -> BoxDecorator<P::Model>
where
    P: Proxy,
    P::Model: Send + Sync + 'static,
{
    BoxDecorator::stateless(TypeId::of::<ProxyDecorator<P>>(), type_name::<P>(), ProxyDecorator::<P>::new())
}

#[cfg(test)]
mod tests {
    use super::{proxy, Proxy, ProxyDecorator};
    use crate::decorator::{BoxDecorator, Decorator};
    use crate::wrapped::{unwrap, wrap, Wrapped};
    use micro_orm::{Model, Record};

    #[derive(Debug, PartialEq)]
    struct Example {
        id: u32,
    }

    impl Model for Example {
        const NAME: &'static str = "example";
        type Pk = u32;

        fn pk(&self) -> u32 {
            self.id
        }
    }

    struct WrappedUp {
        inner: Wrapped<Example>,
    }

    impl WrappedUp {
        fn is_wrapped_up(&self) -> bool {
            true
        }
    }

    impl Proxy for WrappedUp {
        type Model = Example;

        fn new(inner: Wrapped<Example>) -> Self {
            Self { inner }
        }

        fn wrapped(&self) -> &Wrapped<Example> {
            &self.inner
        }
    }

    struct Unwrappable {
        inner: Wrapped<Example>,
    }

    impl Unwrappable {
        fn can_be_unwrapped(&self) -> bool {
            true
        }
    }

    impl Proxy for Unwrappable {
        type Model = Example;

        fn new(inner: Wrapped<Example>) -> Self {
            Self { inner }
        }

        fn wrapped(&self) -> &Wrapped<Example> {
            &self.inner
        }
    }

    fn record() -> Record<Example> {
        Record::new(Example { id: 3 })
    }

    #[test]
    fn test_wrap_without_decorators() {
        let record = record();
        let wrapped = wrap(Record::clone(&record), &[] as &[BoxDecorator<Example>]);

        assert!(!wrapped.is_wrapped());
        assert_eq!(wrapped.depth(), 0);
        assert!(wrapped.inner().is_none());
        assert!(Record::ptr_eq(wrapped.record(), &record));
    }

    #[test]
    fn test_capabilities() {
        let wrapped = wrap(record(), &[proxy::<WrappedUp>(), proxy::<Unwrappable>()]);

        assert_eq!(wrapped.depth(), 2);
        assert_eq!(wrapped.id, 3);
        assert!(wrapped.layer::<WrappedUp>().is_some_and(WrappedUp::is_wrapped_up));
        assert!(wrapped.layer::<Unwrappable>().is_some_and(Unwrappable::can_be_unwrapped));
    }

    #[test]
    fn test_order_decides_outermost() {
        let a_then_b = wrap(record(), &[proxy::<WrappedUp>(), proxy::<Unwrappable>()]);
        let b_then_a = wrap(record(), &[proxy::<Unwrappable>(), proxy::<WrappedUp>()]);

        assert!(a_then_b.is::<Unwrappable>());
        assert!(!a_then_b.is::<WrappedUp>());
        assert!(b_then_a.is::<WrappedUp>());
        assert!(!b_then_a.is::<Unwrappable>());

        assert!(a_then_b.inner().is_some_and(Wrapped::is::<WrappedUp>));
        assert_eq!(a_then_b, b_then_a);
    }

    #[test]
    fn test_unwrap_returns_the_same_record() {
        let record = record();
        let wrapped = wrap(Record::clone(&record), &[proxy::<WrappedUp>(), proxy::<Unwrappable>(), proxy::<WrappedUp>()]);

        let unwrapped = unwrap(&wrapped);
        assert!(Record::ptr_eq(&unwrapped, &record));
        assert!(Record::ptr_eq(&wrapped.clone().into_record(), &record));

        let bare = Wrapped::new(unwrapped);
        assert!(bare.layer::<WrappedUp>().is_none());
        assert!(bare.layer::<Unwrappable>().is_none());
    }

    #[test]
    fn test_wrapping_does_not_touch_the_input() {
        let inner = wrap(record(), &[proxy::<WrappedUp>()]);
        let outer = wrap(inner.clone(), &[proxy::<Unwrappable>()]);

        assert_eq!(inner.depth(), 1);
        assert_eq!(outer.depth(), 2);
        assert!(inner.layer::<Unwrappable>().is_none());
    }

    #[test]
    fn test_proxy_identity() {
        assert_eq!(proxy::<WrappedUp>(), proxy::<WrappedUp>());
        assert_ne!(proxy::<WrappedUp>(), proxy::<Unwrappable>());
        assert!(proxy::<WrappedUp>().name().ends_with("WrappedUp"));
    }

    #[test]
    fn test_proxy_decorator() {
        let wrapped = ProxyDecorator::<WrappedUp>::new().decorate(Wrapped::new(record()));
        assert!(wrapped.is::<WrappedUp>());
        assert_eq!(wrapped.depth(), 1);

        // boxed by hand it is a decorator of its own, not the one `proxy` returns
        let boxed = BoxDecorator::new(ProxyDecorator::<WrappedUp>::new());
        assert_ne!(boxed, proxy::<WrappedUp>());
        assert!(boxed.decorate(wrapped).layer::<WrappedUp>().is_some());
    }

    #[test]
    fn test_debug_lists_layers() {
        let wrapped = wrap(record(), &[proxy::<WrappedUp>()]);
        let debug = format!("{wrapped:?}");
        assert!(debug.contains("WrappedUp"));
        assert!(debug.contains("id: 3"));
    }
}
