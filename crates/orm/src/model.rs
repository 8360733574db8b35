use std::cmp::Ordering;
use std::fmt::Debug;

/// A shared reference to a stored record.
///
/// Records are reference typed: two `Record`s are the same record when they point to the
/// same allocation, see [`triomphe::Arc::ptr_eq`].
pub type Record<M> = triomphe::Arc<M>;

/// A record type which can be stored in a [`Database`](crate::Database) table.
pub trait Model: Send + Sync + 'static {
    /// the table name, used in logs and errors
    const NAME: &'static str;

    type Pk: Clone + Eq + Debug + Send + Sync + 'static;

    fn pk(&self) -> Self::Pk;

    /// The ordering applied when a query does not specify one.
    ///
    /// Sorting is stable, so the default keeps insertion order.
    fn ordering(_a: &Self, _b: &Self) -> Ordering {
        Ordering::Equal
    }
}
