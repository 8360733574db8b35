use crate::database::{Database, Hints, Table};
use crate::model::Model;
use crate::query::{Predicate, Query};
use crate::queryset::{Flavor, Plain, QuerySet};
use crate::Result;
use std::fmt;
use std::marker::PhantomData;

/// The entry point for querying one model.
///
/// A manager builds every [`QuerySet`] with a fresh `F::default()`, so the flavor it was created
/// with decides what all derived query sets produce.
pub struct Manager<M: Model, F = Plain> {
    db: Database,
    table: Table<M>,
    hints: Hints,
    scope: Option<Predicate<M>>,
    _flavor: PhantomData<fn() -> F>,
}

impl<M: Model, F: Flavor<M>> Manager<M, F> {
    pub(crate) fn new(db: Database, table: Table<M>) -> Self {
        let hints = db.hints().clone();
        Self { db, table, hints, scope: None, _flavor: PhantomData }
    }

    /// Restricts every query set built by this manager to records matching `scope`.
    pub(crate) fn scoped(mut self, scope: Predicate<M>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns a copy of this manager with `hints` merged into its hints.
    pub fn with_hints(&self, hints: &Hints) -> Self {
        let mut manager = self.clone();
        manager.hints.extend(hints);
        manager
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    /// Builds the query set of all records in this manager's scope.
    pub fn get_queryset(&self) -> QuerySet<M, F> {
        let mut query = Query::default();
        if let Some(scope) = &self.scope {
            query.push_filter(std::sync::Arc::clone(scope));
        }

        QuerySet::new(self.db.clone(), self.table.clone(), self.hints.clone(), query, F::default())
    }

    pub fn all(&self) -> QuerySet<M, F> {
        self.get_queryset().all()
    }

    pub fn filter<P>(&self, predicate: P) -> QuerySet<M, F>
    where
        P: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.get_queryset().filter(predicate)
    }

    pub fn get(&self) -> Result<F::Item> {
        self.get_queryset().get()
    }

    pub fn get_pk(&self, pk: M::Pk) -> Result<F::Item> {
        self.get_queryset().get_pk(pk)
    }

    pub fn count(&self) -> usize {
        self.get_queryset().count()
    }
}

impl<M: Model, F> Clone for Manager<M, F> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            table: self.table.clone(),
            hints: self.hints.clone(),
            scope: self.scope.clone(),
            _flavor: PhantomData,
        }
    }
}

impl<M: Model, F> fmt::Debug for Manager<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("model", &M::NAME)
            .field("alias", &self.db.alias())
            .field("hints", &self.hints)
            .field("scoped", &self.scope.is_some())
            .finish()
    }
}
