use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use sqlrest_http::{HttpRequest, HttpResponse, Result, Transport, TransportError};

use crate::client::{Client, ClientOptions};

pub const BASE: &str = "http://gateway.test";

/// In-memory transport recording every request.
///
/// Queued responses are returned first, then the default response.
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    queued: Mutex<VecDeque<HttpResponse>>,
    default: Option<HttpResponse>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_response(HttpResponse::new(200, "[]"))
    }

    pub fn with_response(response: HttpResponse) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            queued: Mutex::new(VecDeque::new()),
            default: Some(response),
        }
    }

    /// Fails every request with a transport error.
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            queued: Mutex::new(VecDeque::new()),
            default: None,
        }
    }

    pub fn push_response(&self, response: HttpResponse) {
        self.queued.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(response) = self.queued.lock().unwrap().pop_front() {
            return Ok(response);
        }
        self.default
            .clone()
            .ok_or(TransportError::InvalidUrl {
                url,
                source: url::ParseError::EmptyHost,
            })
    }
}

pub fn client_with(transport: Arc<RecordingTransport>) -> Client {
    Client::with_transport(ClientOptions::new(BASE), transport).unwrap()
}
