//! In-memory storage of model tables.
//!
//! A [`Database`] is a cheap, cloneable handle to a set of tables, one per registered
//! [`Model`]. Each table keeps its rows as an atomically swapped snapshot: writers publish a
//! new row vector, while a query that already started keeps reading the snapshot it loaded.

use crate::manager::Manager;
use crate::model::{Model, Record};
use crate::queryset::{Flavor, Plain};
use crate::{QueryError, Result};
use arc_swap::ArcSwap;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub const DEFAULT_DB_ALIAS: &str = "default";

/// Opaque execution hints.
///
/// Hints are never interpreted by the engine, they are carried unchanged from a database to its
/// managers and from a manager to every query derived from it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hints {
    inner: BTreeMap<String, String>,
}

impl Hints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// Merges `other` into `self`, `other` wins on key collisions.
    pub fn extend(&mut self, other: &Hints) {
        self.inner.extend(other.inner.iter().map(|(key, value)| (key.clone(), value.clone())));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// The rows of one model.
pub struct Table<M: Model> {
    rows: Arc<ArcSwap<Vec<Record<M>>>>,
}

impl<M: Model> Clone for Table<M> {
    fn clone(&self) -> Self {
        Self { rows: Arc::clone(&self.rows) }
    }
}

impl<M: Model> fmt::Debug for Table<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("model", &M::NAME).field("rows", &self.len()).finish()
    }
}

impl<M: Model> Table<M> {
    fn new() -> Self {
        Self { rows: Arc::new(ArcSwap::from_pointee(Vec::new())) }
    }

    /// Loads the current rows, later writes are not visible through the returned snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Record<M>>> {
        self.rows.load_full()
    }

    pub fn len(&self) -> usize {
        self.rows.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.load().is_empty()
    }

    fn insert(&self, record: Record<M>) -> Result<Record<M>> {
        let pk = record.pk();
        let mut duplicated = false;

        self.rows.rcu(|rows| {
            duplicated = rows.iter().any(|row| row.pk() == pk);
            if duplicated {
                return Arc::clone(rows);
            }

            let mut next = Vec::with_capacity(rows.len() + 1);
            next.extend(rows.iter().map(triomphe::Arc::clone));
            next.push(triomphe::Arc::clone(&record));
            Arc::new(next)
        });

        if duplicated {
            return Err(QueryError::duplicate_pk(M::NAME, &pk));
        }
        Ok(record)
    }

    fn delete(&self, pk: &M::Pk) -> Option<Record<M>> {
        let mut removed = None;

        self.rows.rcu(|rows| {
            removed = rows.iter().find(|row| row.pk() == *pk).map(triomphe::Arc::clone);
            if removed.is_none() {
                return Arc::clone(rows);
            }

            let next = rows.iter().filter(|row| row.pk() != *pk).map(triomphe::Arc::clone).collect::<Vec<_>>();
            Arc::new(next)
        });

        removed
    }
}

struct RegisteredTable {
    model: &'static str,
    table: Box<dyn Any + Send + Sync>,
}

struct DatabaseInner {
    alias: String,
    hints: Hints,
    tables: HashMap<TypeId, RegisteredTable>,
}

/// A named in-memory database.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let models = self.inner.tables.values().map(|registered| registered.model).collect::<Vec<_>>();
        f.debug_struct("Database").field("alias", &self.inner.alias).field("models", &models).finish()
    }
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub fn alias(&self) -> &str {
        &self.inner.alias
    }

    pub fn hints(&self) -> &Hints {
        &self.inner.hints
    }

    pub fn table<M: Model>(&self) -> Result<Table<M>> {
        self.inner
            .tables
            .get(&TypeId::of::<M>())
            .and_then(|registered| (*registered.table).downcast_ref::<Table<M>>())
            .cloned()
            .ok_or_else(|| QueryError::unknown_model(M::NAME, self.alias()))
    }

    pub fn insert<M: Model>(&self, record: M) -> Result<Record<M>> {
        let table = self.table::<M>()?;
        let record = table.insert(Record::new(record))?;
        trace!(model = M::NAME, alias = self.alias(), pk = ?record.pk(), "record inserted");
        Ok(record)
    }

    pub fn delete<M: Model>(&self, pk: &M::Pk) -> Result<Option<Record<M>>> {
        let table = self.table::<M>()?;
        let removed = table.delete(pk);
        trace!(model = M::NAME, alias = self.alias(), ?pk, removed = removed.is_some(), "record deleted");
        Ok(removed)
    }

    /// Creates a manager for `M` whose query sets carry the flavor `F`.
    pub fn manager<M: Model, F: Flavor<M>>(&self) -> Result<Manager<M, F>> {
        let table = self.table::<M>()?;
        Ok(Manager::new(self.clone(), table))
    }

    /// Creates a manager for `M` producing plain records.
    pub fn objects<M: Model>(&self) -> Result<Manager<M>> {
        self.manager::<M, Plain>()
    }
}

pub struct DatabaseBuilder {
    alias: String,
    hints: Hints,
    tables: HashMap<TypeId, RegisteredTable>,
}

impl fmt::Debug for DatabaseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseBuilder").field("alias", &self.alias).field("tables", &self.tables.len()).finish()
    }
}

impl DatabaseBuilder {
    fn new() -> Self {
        Self { alias: DEFAULT_DB_ALIAS.to_owned(), hints: Hints::default(), tables: HashMap::new() }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hints.insert(key, value);
        self
    }

    /// Creates an empty table for `M`, registering a model twice keeps the first table.
    pub fn register<M: Model>(mut self) -> Self {
        self.tables
            .entry(TypeId::of::<M>())
            .or_insert_with(|| RegisteredTable { model: M::NAME, table: Box::new(Table::<M>::new()) });
        self
    }

    pub fn build(self) -> Database {
        debug!(alias = %self.alias, tables = self.tables.len(), "database built");
        Database { inner: Arc::new(DatabaseInner { alias: self.alias, hints: self.hints, tables: self.tables }) }
    }
}

#[cfg(test)]
mod tests {
    use super::{Database, Hints, DEFAULT_DB_ALIAS};
    use crate::{Model, QueryError};

    #[derive(Debug, PartialEq)]
    struct Note {
        id: u32,
    }

    impl Model for Note {
        const NAME: &'static str = "note";
        type Pk = u32;

        fn pk(&self) -> u32 {
            self.id
        }
    }

    #[derive(Debug)]
    struct Missing;

    impl Model for Missing {
        const NAME: &'static str = "missing";
        type Pk = ();

        fn pk(&self) -> Self::Pk {}
    }

    #[test]
    fn test_builder_defaults() {
        let db = Database::builder().register::<Note>().build();
        assert_eq!(db.alias(), DEFAULT_DB_ALIAS);
        assert!(db.hints().is_empty());
    }

    #[test]
    fn test_insert_and_delete() {
        let db = Database::builder().alias("notes").register::<Note>().build();
        let inserted = db.insert(Note { id: 1 }).unwrap();
        assert_eq!(db.table::<Note>().unwrap().len(), 1);

        let removed = db.delete::<Note>(&1).unwrap().unwrap();
        assert!(triomphe::Arc::ptr_eq(&inserted, &removed));
        assert!(db.table::<Note>().unwrap().is_empty());
        assert_eq!(db.delete::<Note>(&1).unwrap(), None);
    }

    #[test]
    fn test_duplicate_pk() {
        let db = Database::builder().register::<Note>().build();
        db.insert(Note { id: 7 }).unwrap();

        let err = db.insert(Note { id: 7 }).unwrap_err();
        assert_eq!(err, QueryError::DuplicatePk { model: "note", pk: "7".into() });
    }

    #[test]
    fn test_unknown_model() {
        let db = Database::builder().alias("other").register::<Note>().build();

        let err = db.table::<Missing>().unwrap_err();
        assert_eq!(err, QueryError::UnknownModel { model: "missing", alias: "other".into() });
        assert!(db.objects::<Missing>().is_err());
    }

    #[test]
    fn test_snapshot_is_stable() {
        let db = Database::builder().register::<Note>().build();
        db.insert(Note { id: 1 }).unwrap();

        let table = db.table::<Note>().unwrap();
        let snapshot = table.snapshot();
        db.insert(Note { id: 2 }).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_hints() {
        let mut hints = Hints::new().with("instance", "a");
        hints.extend(&Hints::new().with("instance", "b").with("shard", "1"));

        assert_eq!(hints.get("instance"), Some("b"));
        assert_eq!(hints.get("shard"), Some("1"));
        assert_eq!(hints.len(), 2);
    }
}
