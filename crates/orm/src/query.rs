use crate::model::{Model, Record};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub type Predicate<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;
pub type Comparator<M> = Arc<dyn Fn(&M, &M) -> Ordering + Send + Sync>;

/// An immutable query specification.
///
/// A `Query` is shared by reference between query sets, deriving a query set never changes the
/// specification it started from.
pub struct Query<M> {
    filters: Vec<Predicate<M>>,
    excludes: Vec<Predicate<M>>,
    ordering: Option<Comparator<M>>,
    reversed: bool,
    offset: usize,
    limit: Option<usize>,
}

impl<M> Default for Query<M> {
    fn default() -> Self {
        Self { filters: vec![], excludes: vec![], ordering: None, reversed: false, offset: 0, limit: None }
    }
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            excludes: self.excludes.clone(),
            ordering: self.ordering.clone(),
            reversed: self.reversed,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl<M> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters.len())
            .field("excludes", &self.excludes.len())
            .field("ordered", &self.ordering.is_some())
            .field("reversed", &self.reversed)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<M: Model> Query<M> {
    pub(crate) fn push_filter(&mut self, predicate: Predicate<M>) {
        self.filters.push(predicate);
    }

    pub(crate) fn push_exclude(&mut self, predicate: Predicate<M>) {
        self.excludes.push(predicate);
    }

    pub(crate) fn set_ordering(&mut self, comparator: Comparator<M>) {
        self.ordering = Some(comparator);
        self.reversed = false;
    }

    pub(crate) fn toggle_reversed(&mut self) {
        self.reversed = !self.reversed;
    }

    pub(crate) fn skip(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
        self.limit = self.limit.map(|limit| limit.saturating_sub(n));
    }

    pub(crate) fn take(&mut self, n: usize) {
        self.limit = Some(self.limit.map_or(n, |limit| limit.min(n)));
    }

    pub fn is_sliced(&self) -> bool {
        self.offset > 0 || self.limit.is_some()
    }

    pub fn matches(&self, record: &M) -> bool {
        self.filters.iter().all(|filter| filter(record)) && !self.excludes.iter().any(|exclude| exclude(record))
    }

    fn compare(&self, a: &M, b: &M) -> Ordering {
        let ordering = match &self.ordering {
            Some(comparator) => comparator(a, b),
            None => M::ordering(a, b),
        };

        if self.reversed { ordering.reverse() } else { ordering }
    }

    /// Evaluates the query against a snapshot of rows.
    pub fn execute(&self, rows: &[Record<M>]) -> Vec<Record<M>> {
        let mut matched = rows.iter().filter(|row| self.matches(row)).map(triomphe::Arc::clone).collect::<Vec<_>>();

        matched.sort_by(|a, b| self.compare(a, b));

        let limit = self.limit.unwrap_or(usize::MAX);
        matched.into_iter().skip(self.offset).take(limit).collect()
    }
}
