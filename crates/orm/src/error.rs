use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("model {model} is not registered in database '{alias}'")]
    UnknownModel { model: &'static str, alias: String },

    #[error("{model} matching query does not exist")]
    DoesNotExist { model: &'static str },

    #[error("get() returned more than one {model}, it returned {count}")]
    MultipleObjectsReturned { model: &'static str, count: usize },

    #[error("{model} with pk {pk} already exists")]
    DuplicatePk { model: &'static str, pk: String },
}

impl QueryError {
    pub fn unknown_model<S: ToString>(model: &'static str, alias: S) -> Self {
        Self::UnknownModel { model, alias: alias.to_string() }
    }

    pub fn does_not_exist(model: &'static str) -> Self {
        Self::DoesNotExist { model }
    }

    pub fn multiple_objects_returned(model: &'static str, count: usize) -> Self {
        Self::MultipleObjectsReturned { model, count }
    }

    pub fn duplicate_pk<P: std::fmt::Debug>(model: &'static str, pk: &P) -> Self {
        Self::DuplicatePk { model, pk: format!("{pk:?}") }
    }
}
