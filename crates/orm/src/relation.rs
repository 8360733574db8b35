use crate::database::Database;
use crate::manager::Manager;
use crate::model::Model;
use crate::queryset::Flavor;
use crate::Result;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

type Links<Owner, Target> = Vec<(<Owner as Model>::Pk, <Target as Model>::Pk)>;

/// A link table between two registered models.
pub struct ManyToMany<Owner: Model, Target: Model> {
    name: &'static str,
    db: Database,
    links: Arc<ArcSwap<Links<Owner, Target>>>,
}

impl<Owner: Model, Target: Model> ManyToMany<Owner, Target> {
    /// Creates an empty relation, both models must be registered in `db`.
    pub fn new(db: &Database, name: &'static str) -> Result<Self> {
        db.table::<Owner>()?;
        db.table::<Target>()?;
        Ok(Self { name, db: db.clone(), links: Arc::new(ArcSwap::from_pointee(Vec::new())) })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Links `from` to `to`, linking the same pair twice is a no-op.
    pub fn add(&self, from: &Owner, to: &Target) {
        let link = (from.pk(), to.pk());
        self.links.rcu(|links| {
            if links.contains(&link) {
                return Arc::clone(links);
            }

            let mut next = Vec::clone(links);
            next.push(link.clone());
            Arc::new(next)
        });
        trace!(relation = self.name, from = ?link.0, to = ?link.1, "link added");
    }

    /// Unlinks `from` and `to`, returns `true` if they were linked.
    pub fn remove(&self, from: &Owner, to: &Target) -> bool {
        let link = (from.pk(), to.pk());
        let mut removed = false;
        self.links.rcu(|links| {
            removed = links.contains(&link);
            if !removed {
                return Arc::clone(links);
            }

            Arc::new(links.iter().filter(|existing| **existing != link).cloned().collect::<Links<Owner, Target>>())
        });
        removed
    }

    /// Returns a manager over the records linked from `from`.
    ///
    /// The links are read when the manager's query sets execute, not when the manager is built.
    pub fn related<F: Flavor<Target>>(&self, from: &Owner) -> Result<Manager<Target, F>> {
        let from_pk = from.pk();
        let links = Arc::clone(&self.links);
        let manager = self.db.manager::<Target, F>()?;

        Ok(manager.scoped(Arc::new(move |to: &Target| {
            let to_pk = to.pk();
            links.load().iter().any(|(linked_from, linked_to)| *linked_from == from_pk && *linked_to == to_pk)
        })))
    }
}

impl<Owner: Model, Target: Model> Clone for ManyToMany<Owner, Target> {
    fn clone(&self) -> Self {
        Self { name: self.name, db: self.db.clone(), links: Arc::clone(&self.links) }
    }
}

impl<Owner: Model, Target: Model> fmt::Debug for ManyToMany<Owner, Target> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyToMany")
            .field("name", &self.name)
            .field("from", &Owner::NAME)
            .field("to", &Target::NAME)
            .field("links", &self.links.load().len())
            .finish()
    }
}
