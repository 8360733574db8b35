use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WrapError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("expected to find {decorator} in existing {count} wrappers")]
    NotFound { decorator: &'static str, count: usize },
}

impl WrapError {
    pub fn invalid_argument<S: ToString>(str: S) -> Self {
        Self::InvalidArgument { reason: str.to_string() }
    }

    pub fn not_found(decorator: &'static str, count: usize) -> Self {
        Self::NotFound { decorator, count }
    }
}
