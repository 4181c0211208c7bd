//! Error types for relationship resolution and query composition

use std::sync::Arc;
use thiserror::Error;

/// Result type alias for relationship operations
pub type RelationResult<T> = Result<T, RelationError>;

/// Shared error returned by user-supplied query hooks
pub type HookError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors raised while booting a relationship or composing its queries.
///
/// Cloneable so a failed boot can be reported to every caller that waited on it.
#[derive(Debug, Clone, Error)]
pub enum RelationError {
    /// A resolved key does not exist on the model it is expected on
    #[error("\"{relation}\" expects \"{key}\" to exist on \"{model}\" model, but is missing")]
    MissingKeyDefinition {
        relation: String,
        key: String,
        model: String,
    },

    /// A key-dependent operation ran before the relationship was booted
    #[error("relationship \"{relation}\" has not been booted")]
    UnbootedRelationAccess { relation: String },

    /// The owner row has no value for the local key
    #[error("cannot query \"{relation}\": value of \"{model}.{key}\" is undefined")]
    MissingLocalKeyValue {
        relation: String,
        model: String,
        key: String,
    },

    /// A relationship with the same name is already registered on the model
    #[error("relationship \"{relation}\" is already registered on \"{model}\"")]
    DuplicateRelation { model: String, relation: String },

    /// Error raised by a user-supplied `on_query` hook
    #[error("query hook failed: {0}")]
    QueryHook(#[source] HookError),
}

impl RelationError {
    /// Wrap any error raised inside a query hook
    pub fn hook<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let boxed: Box<dyn std::error::Error + Send + Sync> = err.into();
        RelationError::QueryHook(Arc::from(boxed))
    }
}
