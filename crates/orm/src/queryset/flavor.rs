use crate::model::{Model, Record};

/// The state a query set carries on top of its query specification.
///
/// A flavor decides what every produced record turns into, and how it is carried over when the
/// engine derives a new query set from an existing one. A [`Manager`](crate::Manager) picks the
/// flavor once, every query set derived from it keeps that flavor.
pub trait Flavor<M: Model>: Clone + Default + Send + Sync + 'static {
    /// the item type yielded while iterating
    type Item;

    /// Called each time a query set is derived from one carrying this flavor.
    fn chain(&self) -> Self {
        self.clone()
    }

    fn produce(&self, record: Record<M>) -> Self::Item;
}

/// Yields stored records unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl<M: Model> Flavor<M> for Plain {
    type Item = Record<M>;

    #[inline]
    fn produce(&self, record: Record<M>) -> Self::Item {
        record
    }
}
