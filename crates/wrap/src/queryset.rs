//! Query sets which wrap every record they produce.
//!
//! [`Wrapping`] is a [`Flavor`]: it rides along with a [`QuerySet`] and is carried over each
//! time the engine derives a new query set, so filtering or ordering a wrapping query set keeps
//! its decorators. Configuring the decorators never changes a query set in place, every call
//! returns a new one.

use crate::decorator::BoxDecorator;
use crate::error::WrapError;
use crate::wrapped::{wrap, Wrapped};
use micro_orm::{Flavor, Model, QuerySet, Record};
use std::fmt;
use tracing::trace;

/// The ordered decorator list of a wrapping query set.
pub struct Wrapping<M> {
    decorators: Vec<BoxDecorator<M>>,
}

impl<M> Wrapping<M> {
    pub fn new(decorators: Vec<BoxDecorator<M>>) -> Self {
        Self { decorators }
    }

    pub fn decorators(&self) -> &[BoxDecorator<M>] {
        &self.decorators
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl<M> Default for Wrapping<M> {
    fn default() -> Self {
        Self { decorators: vec![] }
    }
}

impl<M> Clone for Wrapping<M> {
    fn clone(&self) -> Self {
        Self { decorators: self.decorators.clone() }
    }
}

impl<M> fmt::Debug for Wrapping<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.decorators.iter().map(BoxDecorator::name)).finish()
    }
}

impl<M: Model> Flavor<M> for Wrapping<M> {
    type Item = Wrapped<M>;

    /// The decorator list survives every derivation unchanged.
    fn chain(&self) -> Self {
        Self { decorators: self.decorators.clone() }
    }

    fn produce(&self, record: Record<M>) -> Self::Item {
        if self.decorators.is_empty() {
            return Wrapped::new(record);
        }

        trace!(model = M::NAME, pk = ?record.pk(), decorators = self.decorators.len(), "wrap record");
        wrap(record, &self.decorators)
    }
}

pub type WrappingQuerySet<M> = QuerySet<M, Wrapping<M>>;

/// Decorator configuration of a [`WrappingQuerySet`].
pub trait WrappingQuerySetExt: Sized {
    type Model: Model;

    /// Returns a query set with `decorators` appended, the last one ends up outermost.
    fn wrap(&self, decorators: &[BoxDecorator<Self::Model>]) -> Self;

    /// Returns a query set producing bare records.
    fn reset_wrapping(&self) -> Self;

    /// Returns a query set with one occurrence of each of `decorators` removed.
    ///
    /// # Errors
    ///
    /// [`WrapError::InvalidArgument`] if `decorators` is empty, [`WrapError::NotFound`] if one of
    /// them is not in the current list.
    fn remove_wrappers(&self, decorators: &[BoxDecorator<Self::Model>]) -> Result<Self, WrapError>;

    fn decorators(&self) -> &[BoxDecorator<Self::Model>];
}

impl<M: Model> WrappingQuerySetExt for WrappingQuerySet<M> {
    type Model = M;

    fn wrap(&self, decorators: &[BoxDecorator<M>]) -> Self {
        let mut next = self.flavor().decorators.clone();
        next.extend_from_slice(decorators);
        trace!(model = M::NAME, added = decorators.len(), total = next.len(), "wrappers added");
        self.with_flavor(Wrapping::new(next))
    }

    fn reset_wrapping(&self) -> Self {
        trace!(model = M::NAME, removed = self.flavor().decorators.len(), "wrappers reset");
        self.with_flavor(Wrapping::default())
    }

    fn remove_wrappers(&self, decorators: &[BoxDecorator<M>]) -> Result<Self, WrapError> {
        if decorators.is_empty() {
            return Err(WrapError::invalid_argument("at least one decorator must be named to remove wrappers"));
        }

        let current = &self.flavor().decorators;
        let count = current.len();
        let mut remaining = current.clone();
        for decorator in decorators {
            let index = remaining
                .iter()
                .position(|existing| existing == decorator)
                .ok_or_else(|| WrapError::not_found(decorator.name(), count))?;
            remaining.remove(index);
        }

        trace!(model = M::NAME, removed = decorators.len(), total = remaining.len(), "wrappers removed");
        Ok(self.with_flavor(Wrapping::new(remaining)))
    }

    fn decorators(&self) -> &[BoxDecorator<M>] {
        self.flavor().decorators()
    }
}

#[cfg(test)]
mod tests {
    use super::{Wrapping, WrappingQuerySet, WrappingQuerySetExt};
    use crate::{proxy, BoxDecorator, Decorator, Proxy, WrapError, Wrapped};
    use micro_orm::{Database, Model};

    #[derive(Debug)]
    struct Row {
        id: u32,
    }

    impl Model for Row {
        const NAME: &'static str = "row";
        type Pk = u32;

        fn pk(&self) -> u32 {
            self.id
        }
    }

    struct A(Wrapped<Row>);
    struct B(Wrapped<Row>);

    impl Proxy for A {
        type Model = Row;

        fn new(inner: Wrapped<Row>) -> Self {
            Self(inner)
        }

        fn wrapped(&self) -> &Wrapped<Row> {
            &self.0
        }
    }

    impl Proxy for B {
        type Model = Row;

        fn new(inner: Wrapped<Row>) -> Self {
            Self(inner)
        }

        fn wrapped(&self) -> &Wrapped<Row> {
            &self.0
        }
    }

    /// a proxy whose content depends on the decorator which built it
    struct Tagged {
        inner: Wrapped<Row>,
        tag: &'static str,
    }

    impl Proxy for Tagged {
        type Model = Row;

        fn new(inner: Wrapped<Row>) -> Self {
            Self { inner, tag: "" }
        }

        fn wrapped(&self) -> &Wrapped<Row> {
            &self.inner
        }
    }

    struct Tagger(&'static str);

    impl Decorator<Wrapped<Row>> for Tagger {
        type Out = Wrapped<Row>;

        fn decorate(&self, raw: Wrapped<Row>) -> Self::Out {
            Wrapped::from_proxy(Tagged { inner: raw, tag: self.0 })
        }
    }

    /// outermost first
    fn tags(row: &Wrapped<Row>) -> Vec<&'static str> {
        let mut tags = vec![];
        let mut current = row.layer::<Tagged>();
        while let Some(tagged) = current {
            tags.push(tagged.tag);
            current = tagged.wrapped().layer::<Tagged>();
        }
        tags
    }

    fn queryset() -> WrappingQuerySet<Row> {
        let db = Database::builder().register::<Row>().build();
        db.insert(Row { id: 1 }).unwrap();
        db.insert(Row { id: 2 }).unwrap();
        db.manager::<Row, Wrapping<Row>>().unwrap().get_queryset()
    }

    fn names(queryset: &WrappingQuerySet<Row>) -> Vec<&'static str> {
        queryset.decorators().iter().map(BoxDecorator::name).map(|name| name.rsplit("::").next().unwrap_or(name)).collect()
    }

    #[test]
    fn test_wrap_appends() {
        let queryset = queryset().wrap(&[proxy::<A>()]).wrap(&[proxy::<B>(), proxy::<A>()]);
        assert_eq!(names(&queryset), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_wrap_nothing() {
        let queryset = queryset().wrap(&[]);
        assert!(queryset.decorators().is_empty());
        assert!(queryset.iter().all(|row| !row.is_wrapped()));
    }

    #[test]
    fn test_configuring_is_copy_on_write() {
        let base = queryset();
        let wrapped = base.wrap(&[proxy::<A>()]);
        let both = wrapped.wrap(&[proxy::<B>()]);
        let reset = both.reset_wrapping();

        assert!(base.decorators().is_empty());
        assert_eq!(names(&wrapped), vec!["A"]);
        assert_eq!(names(&both), vec!["A", "B"]);
        assert!(reset.decorators().is_empty());
        assert!(base.iter().all(|row| row.depth() == 0));
        assert!(wrapped.iter().all(|row| row.depth() == 1));
        assert!(both.iter().all(|row| row.depth() == 2));
    }

    #[test]
    fn test_reset() {
        let queryset = queryset().wrap(&[proxy::<A>()]).all().reset_wrapping();
        let row = queryset.get_pk(1).unwrap();

        assert!(!row.is_wrapped());
        assert!(row.layer::<A>().is_none());
    }

    #[test]
    fn test_remove_one_occurrence() {
        let queryset = queryset().wrap(&[proxy::<A>(), proxy::<B>(), proxy::<A>()]);

        let removed = queryset.remove_wrappers(&[proxy::<A>()]).unwrap();
        assert_eq!(names(&removed), vec!["B", "A"]);

        let removed = removed.remove_wrappers(&[proxy::<A>(), proxy::<B>()]).unwrap();
        assert!(removed.decorators().is_empty());
        assert_eq!(names(&queryset), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_remove_requires_match() {
        let queryset = queryset().wrap(&[proxy::<A>()]);
        let err = queryset.remove_wrappers(&[proxy::<B>()]).unwrap_err();

        assert!(matches!(err, WrapError::NotFound { count: 1, .. }));
        assert!(err.to_string().contains("in existing 1 wrappers"));
    }

    #[test]
    fn test_remove_more_than_added() {
        let queryset = queryset().wrap(&[proxy::<A>()]);
        let err = queryset.remove_wrappers(&[proxy::<A>(), proxy::<A>()]).unwrap_err();
        assert!(matches!(err, WrapError::NotFound { count: 1, .. }));
    }

    #[test]
    fn test_remove_matches_the_decorator_not_its_type() {
        let audit = BoxDecorator::new(Tagger("audit"));
        let html = BoxDecorator::new(Tagger("html"));
        let queryset = queryset().wrap(&[audit.clone(), html.clone()]);
        assert_eq!(tags(&queryset.get_pk(1).unwrap()), vec!["html", "audit"]);

        let removed = queryset.remove_wrappers(&[html]).unwrap();
        assert_eq!(removed.decorators(), &[audit.clone()]);
        assert_eq!(tags(&removed.get_pk(1).unwrap()), vec!["audit"]);

        let removed = queryset.remove_wrappers(&[audit]).unwrap();
        assert_eq!(tags(&removed.get_pk(1).unwrap()), vec!["html"]);
    }

    #[test]
    fn test_remove_decorator_never_added() {
        let queryset = queryset().wrap(&[BoxDecorator::new(Tagger("audit"))]);

        // same type and state, but not the decorator which was added
        let err = queryset.remove_wrappers(&[BoxDecorator::new(Tagger("audit"))]).unwrap_err();
        assert!(matches!(err, WrapError::NotFound { count: 1, .. }));
    }

    #[test]
    fn test_remove_rejects_empty() {
        let queryset = queryset().wrap(&[proxy::<A>()]);
        let err = queryset.remove_wrappers(&[]).unwrap_err();
        assert!(matches!(err, WrapError::InvalidArgument { .. }));
    }

    #[test]
    fn test_derivations_keep_decorators() {
        let queryset = queryset().wrap(&[proxy::<A>()]);
        let derived = queryset.filter(|row| row.id == 2).order_by(|a, b| b.id.cmp(&a.id)).limit(5).wrap(&[proxy::<B>()]);

        assert_eq!(names(&derived), vec!["A", "B"]);
        let row = derived.get().unwrap();
        assert_eq!(row.id, 2);
        assert!(row.is::<B>());
        assert!(row.layer::<A>().is_some());
    }

    #[test]
    fn test_nothing_is_wrapped_before_iteration() {
        let queryset = queryset().wrap(&[proxy::<A>()]);
        let mut iter = queryset.iter();
        assert!(!iter.is_evaluated());

        let first = iter.next().unwrap();
        assert!(first.is::<A>());
        assert_eq!(iter.size_hint(), (1, Some(1)));
    }
}
