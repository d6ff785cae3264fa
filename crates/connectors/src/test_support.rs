//! Shared test doubles

use crate::error::ConnectorError;
use crate::transport::{RawResponse, Transport, TransportRequest};
use std::sync::Mutex;

/// Answers every request with the same response and remembers what it saw
pub struct StaticTransport {
    response: RawResponse,
    requests: Mutex<Vec<TransportRequest>>,
}

impl StaticTransport {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            response: RawResponse::new(status, body),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Query value of the last request
    pub fn last_query(&self, name: &str) -> Option<String> {
        self.last_request()?
            .query
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

impl Transport for StaticTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, ConnectorError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}
