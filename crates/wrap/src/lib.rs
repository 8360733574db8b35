//! Transparent decorator chains over lazily iterated query results
//!
//! This crate lets callers attach behavior to the records a query produces, presentation logic,
//! access control or instrumentation for example, without touching the record type itself.
//!
//! - A [`Proxy`] is a layer around a [`Wrapped`] value. It keeps a reference to the value it
//!   wraps and reaches the record underneath through `Deref`.
//! - [`wrap`] applies a list of decorators in order, [`unwrap`] walks the chain back down to the
//!   original record.
//! - A [`WrappingQuerySet`] remembers a decorator list and wraps each record as it is iterated.
//!   Configuring the list returns a new query set, the original is never changed, and deriving a
//!   query set (`filter`, `order_by`, ...) keeps the list.
//! - A [`WrappingManager`] builds wrapping query sets, so every query set derived from it wraps.
//!
//! # Example
//!
//! ```
//! use micro_orm::{Database, Model};
//! use micro_wrap::{proxy, unwrap, Proxy, WrappingDatabaseExt, WrappingManagerExt, WrappingQuerySetExt, Wrapped};
//!
//! #[derive(Debug)]
//! struct Invoice {
//!     id: u32,
//!     cents: u64,
//! }
//!
//! impl Model for Invoice {
//!     const NAME: &'static str = "invoice";
//!     type Pk = u32;
//!
//!     fn pk(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! struct Money(Wrapped<Invoice>);
//!
//! impl Money {
//!     fn amount(&self) -> String {
//!         format!("{}.{:02}", self.0.cents / 100, self.0.cents % 100)
//!     }
//! }
//!
//! impl Proxy for Money {
//!     type Model = Invoice;
//!
//!     fn new(inner: Wrapped<Invoice>) -> Self {
//!         Self(inner)
//!     }
//!
//!     fn wrapped(&self) -> &Wrapped<Invoice> {
//!         &self.0
//!     }
//! }
//!
//! let db = Database::builder().register::<Invoice>().build();
//! db.insert(Invoice { id: 1, cents: 1250 }).unwrap();
//!
//! let invoices = db.wrapping::<Invoice>().unwrap();
//! let queryset = invoices.wrap(&[proxy::<Money>()]).filter(|invoice| invoice.cents > 1000);
//!
//! for invoice in &queryset {
//!     assert_eq!(invoice.id, 1);
//!     assert_eq!(invoice.layer::<Money>().unwrap().amount(), "12.50");
//!     assert_eq!(unwrap(&invoice).cents, 1250);
//! }
//!
//! let bare = queryset.reset_wrapping().get().unwrap();
//! assert!(!bare.is_wrapped());
//! ```

mod decorator;
mod error;
mod manager;
mod proxy;
mod queryset;
mod wrapped;

pub use decorator::{BoxDecorator, Decorator};
pub use error::WrapError;
pub use manager::{WrappingDatabaseExt, WrappingManager, WrappingManagerExt};
pub use proxy::{proxy, Proxy, ProxyDecorator};
pub use queryset::{Wrapping, WrappingQuerySet, WrappingQuerySetExt};
pub use wrapped::{unwrap, wrap, Layers, Wrapped};
