use crate::decorator::BoxDecorator;
use crate::queryset::{Wrapping, WrappingQuerySet, WrappingQuerySetExt};
use micro_orm::{Database, Manager, Model};

/// A manager whose query sets all wrap their records.
pub type WrappingManager<M> = Manager<M, Wrapping<M>>;

pub trait WrappingManagerExt {
    type Model: Model;

    /// Shortcut for `get_queryset().wrap(decorators)`.
    fn wrap(&self, decorators: &[BoxDecorator<Self::Model>]) -> WrappingQuerySet<Self::Model>;
}

impl<M: Model> WrappingManagerExt for WrappingManager<M> {
    type Model = M;

    fn wrap(&self, decorators: &[BoxDecorator<M>]) -> WrappingQuerySet<M> {
        self.get_queryset().wrap(decorators)
    }
}

pub trait WrappingDatabaseExt {
    /// Creates a [`WrappingManager`] for `M`.
    fn wrapping<M: Model>(&self) -> micro_orm::Result<WrappingManager<M>>;
}

impl WrappingDatabaseExt for Database {
    fn wrapping<M: Model>(&self) -> micro_orm::Result<WrappingManager<M>> {
        self.manager::<M, Wrapping<M>>()
    }
}
