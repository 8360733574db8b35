//! An in-memory micro query engine
//!
//! This crate provides the small query-execution engine the `micro-wrap` crate is layered on.
//! Records live in per-model tables inside a [`Database`]; a [`Manager`] hands out lazy
//! [`QuerySet`]s which only read their table once iteration begins.
//!
//! # Features
//!
//! - Lazy, one-shot result iteration
//! - Immutable query specifications shared between derived query sets
//! - Filtering, exclusion, ordering and slicing
//! - Many-to-many relations with scoped managers
//! - A [`Flavor`] extension seam which decides what every produced item looks like and
//!   travels with every query derived from a manager
//!
//! # Example
//!
//! ```
//! use micro_orm::{Database, Model};
//!
//! #[derive(Debug)]
//! struct User {
//!     id: u64,
//!     name: &'static str,
//! }
//!
//! impl Model for User {
//!     const NAME: &'static str = "user";
//!     type Pk = u64;
//!
//!     fn pk(&self) -> u64 {
//!         self.id
//!     }
//! }
//!
//! let db = Database::builder().register::<User>().build();
//! db.insert(User { id: 1, name: "alice" }).unwrap();
//! db.insert(User { id: 2, name: "bob" }).unwrap();
//!
//! let users = db.objects::<User>().unwrap();
//! let bob = users.filter(|user| user.name == "bob").get().unwrap();
//! assert_eq!(bob.id, 2);
//! ```

mod database;
mod error;
mod manager;
mod model;
mod query;
mod relation;

pub mod queryset;

pub use database::{Database, DatabaseBuilder, Hints, Table, DEFAULT_DB_ALIAS};
pub use error::{QueryError, Result};
pub use manager::Manager;
pub use model::{Model, Record};
pub use query::{Comparator, Predicate, Query};
pub use queryset::{Flavor, Iter, Plain, QuerySet};
pub use relation::ManyToMany;
