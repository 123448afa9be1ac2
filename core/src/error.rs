//! Error types for the Netdata Cloud client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers treat "the entity is
//! gone" differently from every other failure: the adapter layer drops the
//! entity from state instead of reporting an error. Validation failures are
//! raised before any request is built, so they never reach the network.

use thiserror::Error;

use crate::http::HttpMethod;

/// A required identifier or field was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id is required")]
    IdRequired,
    #[error("spaceID is required")]
    SpaceIdRequired,
    #[error("roomID is required")]
    RoomIdRequired,
    #[error("memberID is required")]
    MemberIdRequired,
    #[error("nodeID is required")]
    NodeIdRequired,
    #[error("channelID is required")]
    ChannelIdRequired,
    #[error("ruleID is required")]
    RuleIdRequired,
    #[error("email is required")]
    EmailRequired,
    #[error("role is required")]
    RoleRequired,
    #[error("name is required")]
    NameRequired,
}

/// Errors returned by `NetdataClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required parameter was empty; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No response was received (DNS, refused connection, timeout).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-2xx status other than 404.
    #[error("method: {method}, url: {url}, status: {status}, body: {body}")]
    Request {
        method: HttpMethod,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized.
    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The entity does not exist, either per a 404 or after a list scan.
    #[error("not found")]
    NotFound,

    /// The claim-token response carried no string `token` key.
    #[error("token not found")]
    TokenNotFound,
}

impl ApiError {
    pub(crate) fn transport(
        url: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// HTTP status of a `Request` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fail with `err` when `value` is empty.
pub(crate) fn require(value: &str, err: ValidationError) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_carries_diagnostics() {
        let err = ApiError::Request {
            method: HttpMethod::Patch,
            url: "http://localhost/api/v1/spaces/s1".to_string(),
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "method: PATCH, url: http://localhost/api/v1/spaces/s1, status: 403, body: forbidden"
        );
        assert_eq!(err.status(), Some(403));
        assert!(!err.is_not_found());
    }

    #[test]
    fn validation_error_displays_field_name() {
        let err: ApiError = ValidationError::SpaceIdRequired.into();
        assert_eq!(err.to_string(), "spaceID is required");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn require_rejects_only_empty_values() {
        assert!(require("space-1", ValidationError::SpaceIdRequired).is_ok());
        let err = require("", ValidationError::NodeIdRequired).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::NodeIdRequired)
        ));
    }

    #[test]
    fn not_found_is_recognised() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(!ApiError::TokenNotFound.is_not_found());
        assert_eq!(ApiError::TokenNotFound.to_string(), "token not found");
    }
}
