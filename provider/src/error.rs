//! Error types for the resource adapters.

use netdata_core::ApiError;
use thiserror::Error;

/// Errors surfaced to the host framework as diagnostics.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A call against the remote API failed. `context` names the operation
    /// and the identifiers involved.
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A planned attribute failed client-side validation.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Reachable node {node:?} not found in the space {space_id}")]
    UnreachableNode { node: String, space_id: String },

    #[error("Unexpected import identifier: expected format {expected}, got {got:?}")]
    InvalidImportId { expected: &'static str, got: String },

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// State handed over by the host does not match the resource's shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_not_found())
    }
}

/// Attach operation context to a client result.
pub trait ApiResultExt<T> {
    fn context<F>(self, f: F) -> Result<T, ProviderError>
    where
        F: FnOnce() -> String;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn context<F>(self, f: F) -> Result<T, ProviderError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| ProviderError::Api {
            context: f(),
            source,
        })
    }
}

/// Map `NotFound` to `None` so `read` can ask the host to drop the entity.
pub(crate) fn found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Split a comma-separated import identifier into exactly `N` non-empty parts.
pub(crate) fn split_import_id<const N: usize>(
    id: &str,
    expected: &'static str,
) -> Result<[String; N], ProviderError> {
    let invalid = || ProviderError::InvalidImportId {
        expected,
        got: id.to_string(),
    };
    let parts: Vec<String> = id.split(',').map(str::to_string).collect();
    if parts.iter().any(String::is_empty) {
        return Err(invalid());
    }
    parts.try_into().map_err(|_| invalid())
}
