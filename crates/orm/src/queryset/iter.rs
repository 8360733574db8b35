use crate::model::{Model, Record};
use crate::queryset::{Flavor, QuerySet};
use std::fmt;

/// A lazy, one-shot iterator over the results of a [`QuerySet`].
///
/// The query is executed on the first call to [`Iterator::next`], every record is then passed
/// through the query set's [`Flavor`] one at a time.
pub struct Iter<M: Model, F: Flavor<M>> {
    queryset: QuerySet<M, F>,
    rows: Option<std::vec::IntoIter<Record<M>>>,
}

impl<M: Model, F: Flavor<M>> Iter<M, F> {
    pub(crate) fn new(queryset: QuerySet<M, F>) -> Self {
        Self { queryset, rows: None }
    }

    /// Returns `true` once the underlying query has been executed.
    pub fn is_evaluated(&self) -> bool {
        self.rows.is_some()
    }
}

impl<M: Model, F: Flavor<M>> Iterator for Iter<M, F> {
    type Item = F::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let Self { queryset, rows } = self;
        let rows = rows.get_or_insert_with(|| queryset.execute().into_iter());

        let record = rows.next()?;
        Some(queryset.flavor().produce(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.rows {
            Some(rows) => rows.size_hint(),
            None => (0, None),
        }
    }
}

impl<M: Model, F: Flavor<M> + fmt::Debug> fmt::Debug for Iter<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("queryset", &self.queryset)
            .field("remaining", &self.rows.as_ref().map(ExactSizeIterator::len))
            .finish()
    }
}
