//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use crate::client::NetdataClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays canned responses in order and records every request it sees.
/// Running out of responses is reported as a transport failure.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<(u16, &str)>) -> Arc<Self> {
        let responses = responses
            .into_iter()
            .map(|(status, body)| HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            })
            .collect();
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD url"` for each recorded request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }

    pub fn body(&self, index: usize) -> serde_json::Value {
        let requests = self.requests();
        let body = requests[index].body.as_deref().expect("request has no body");
        serde_json::from_str(body).unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            ApiError::transport(
                &request.url,
                io::Error::new(io::ErrorKind::ConnectionRefused, "no scripted response"),
            )
        })
    }
}

pub(crate) const BASE_URL: &str = "http://cloud.test";

pub(crate) fn client(transport: &Arc<ScriptedTransport>) -> NetdataClient {
    NetdataClient::with_transport(BASE_URL, "test-token", transport.clone())
}
