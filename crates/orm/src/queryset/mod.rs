//! Lazy result sequences.
//!
//! A [`QuerySet`] describes a query, it never holds results. Every derivation (`filter`,
//! `order_by`, `limit`, ...) returns a new, independent query set built through [`QuerySet::chain`]
//! and leaves the original untouched. Rows are only read once a query set is iterated, see
//! [`Iter`].

mod flavor;
mod iter;

pub use flavor::{Flavor, Plain};
pub use iter::Iter;

use crate::database::{Database, Hints, Table};
use crate::model::{Model, Record};
use crate::query::Query;
use crate::{QueryError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct QuerySet<M: Model, F = Plain> {
    db: Database,
    table: Table<M>,
    hints: Hints,
    query: triomphe::Arc<Query<M>>,
    flavor: F,
}

impl<M: Model, F: Flavor<M>> QuerySet<M, F> {
    pub(crate) fn new(db: Database, table: Table<M>, hints: Hints, query: Query<M>, flavor: F) -> Self {
        Self { db, table, hints, query: triomphe::Arc::new(query), flavor }
    }

    /// Creates a copy sharing the same query specification.
    ///
    /// The flavor is carried over through [`Flavor::chain`]; every other derivation is built on
    /// top of this method.
    pub fn chain(&self) -> Self {
        Self {
            db: self.db.clone(),
            table: self.table.clone(),
            hints: self.hints.clone(),
            query: triomphe::Arc::clone(&self.query),
            flavor: self.flavor.chain(),
        }
    }

    fn derive(&self, f: impl FnOnce(&mut Query<M>)) -> Self {
        let mut next = self.chain();
        f(triomphe::Arc::make_mut(&mut next.query));
        next
    }

    pub fn all(&self) -> Self {
        self.chain()
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.derive(|query| query.push_filter(Arc::new(predicate)))
    }

    pub fn exclude<P>(&self, predicate: P) -> Self
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.derive(|query| query.push_exclude(Arc::new(predicate)))
    }

    /// Replaces the ordering, the model's default ordering applies until this is called.
    pub fn order_by<C>(&self, comparator: C) -> Self
    where
        C: Fn(&M, &M) -> Ordering + Send + Sync + 'static,
    {
        self.derive(|query| query.set_ordering(Arc::new(comparator)))
    }

    pub fn reverse(&self) -> Self {
        self.derive(Query::toggle_reversed)
    }

    pub fn offset(&self, n: usize) -> Self {
        self.derive(|query| query.skip(n))
    }

    pub fn limit(&self, n: usize) -> Self {
        self.derive(|query| query.take(n))
    }

    /// Returns a copy of this query set carrying `flavor` instead of the current one.
    pub fn with_flavor(&self, flavor: F) -> Self {
        Self { flavor, ..self.chain() }
    }

    pub fn flavor(&self) -> &F {
        &self.flavor
    }

    pub fn query(&self) -> &Query<M> {
        &self.query
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    /// Returns a lazy iterator, the query executes on the first call to `next`.
    pub fn iter(&self) -> Iter<M, F> {
        Iter::new(self.chain())
    }

    pub(crate) fn execute(&self) -> Vec<Record<M>> {
        let snapshot = self.table.snapshot();
        let rows = self.query.execute(&snapshot);
        debug!(model = M::NAME, alias = self.db.alias(), scanned = snapshot.len(), matched = rows.len(), "query executed");
        rows
    }

    /// Returns the single item matching this query.
    pub fn get(&self) -> Result<F::Item> {
        let mut rows = self.execute();
        if rows.len() > 1 {
            return Err(QueryError::multiple_objects_returned(M::NAME, rows.len()));
        }

        rows.pop().map(|record| self.flavor.produce(record)).ok_or_else(|| QueryError::does_not_exist(M::NAME))
    }

    pub fn get_pk(&self, pk: M::Pk) -> Result<F::Item> {
        self.filter(move |record| record.pk() == pk).get()
    }

    pub fn first(&self) -> Option<F::Item> {
        self.iter().next()
    }

    /// Counts matching records without producing items.
    pub fn count(&self) -> usize {
        self.execute().len()
    }

    pub fn exists(&self) -> bool {
        self.count() > 0
    }
}

impl<M: Model, F: Flavor<M>> Clone for QuerySet<M, F> {
    fn clone(&self) -> Self {
        self.chain()
    }
}

impl<M: Model, F: Flavor<M>> IntoIterator for QuerySet<M, F> {
    type Item = F::Item;
    type IntoIter = Iter<M, F>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

impl<M: Model, F: Flavor<M>> IntoIterator for &QuerySet<M, F> {
    type Item = F::Item;
    type IntoIter = Iter<M, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<M: Model, F: fmt::Debug> fmt::Debug for QuerySet<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("model", &M::NAME)
            .field("alias", &self.db.alias())
            .field("query", &self.query)
            .field("hints", &self.hints)
            .field("flavor", &self.flavor)
            .finish()
    }
}
