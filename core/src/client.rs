//! Authenticated request execution shared by every entity endpoint.
//!
//! # Design
//! `NetdataClient` holds the base URL, the bearer header and a shared
//! `Transport`; all three are fixed at construction, so a client can be
//! cloned and used from several threads at once. Entity modules under
//! `api/` add `impl NetdataClient` blocks built on `send` and `send_json`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Default Netdata Cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://app.netdata.cloud";

/// Blocking client for the Netdata Cloud REST API.
#[derive(Clone)]
pub struct NetdataClient {
    base_url: String,
    auth_header: String,
    transport: Arc<dyn Transport>,
}

impl NetdataClient {
    /// Client using the default `ureq` transport and timeout.
    pub fn new(base_url: &str, auth_token: &str) -> Self {
        Self::with_transport(base_url, auth_token, Arc::new(UreqTransport::default()))
    }

    pub fn with_transport(base_url: &str, auth_token: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {auth_token}"),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![
            ("Authorization".to_string(), self.auth_header.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    /// Perform one call and return the raw body of a 2xx response. A 404
    /// is a `Request` error like any other status.
    pub(crate) fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        self.dispatch(method, path, body, Target::Collection)
    }

    /// Like `send` for a call addressing one entity by id; a 404 means the
    /// entity is gone and becomes `NotFound`.
    pub(crate) fn send_entity(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        self.dispatch(method, path, body, Target::Entity)
    }

    /// Like `send`, then decode the body as `T`.
    pub(crate) fn send_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let body = self.send(method, path, body)?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    pub(crate) fn send_entity_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let body = self.send_entity(method, path, body)?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        target: Target,
    ) -> Result<String, ApiError> {
        let request = self.build_request(method, path, body);
        debug!(%method, url = %request.url, "sending request");
        let response = self.transport.execute(&request)?;
        debug!(%method, url = %request.url, status = response.status, "received response");
        check_status(&request, response, target)
    }
}

/// What a request path addresses, which decides how a 404 is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collection,
    Entity,
}

impl fmt::Debug for NetdataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetdataClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Serialize a request payload.
pub(crate) fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<Option<String>, ApiError> {
    serde_json::to_string(value)
        .map(Some)
        .map_err(ApiError::Serialization)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(
    request: &HttpRequest,
    response: HttpResponse,
    target: Target,
) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    if response.status == 404 && target == Target::Entity {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Request {
        method: request.method,
        url: request.url.clone(),
        status: response.status,
        body: response.body,
    })
}
