use thiserror::Error;

/// Sync-state failures surfaced by the Sync Manager.
///
/// None of these corrupt internal state; every failure is local to a
/// single sync attempt and safely retryable. Structural gaps encountered
/// during conversion are not errors at all — the converters return
/// partial results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("sync already in progress")]
    SyncInProgress,

    #[error("blueprint changes take precedence")]
    BlueprintPrecedence,

    #[error("code changes take precedence")]
    CodePrecedence,

    #[error("user decision required to resolve conflict")]
    UserDecisionRequired,

    #[error("merge conflict resolution is not implemented")]
    MergeUnsupported,
}

/// Errors that can occur loading or saving a graph JSON document.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("failed to access graph document '{path}': {message}")]
    Io { path: String, message: String },

    #[error("failed to parse graph document: {0}")]
    Json(String),
}

/// Errors that can occur when converting a custom editor format into a
/// henkan `Graph`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("invalid blueprint data: {0}")]
    ValidationError(String),
}
