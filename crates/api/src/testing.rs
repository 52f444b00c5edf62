use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::{JiraClient, JiraConfig};

type Reply = std::result::Result<HttpResponse, TransportError>;

/// In-memory transport that records every request. Queued replies are used
/// first, then the fallback, which defaults to no status and `{}`.
#[derive(Clone)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    requests: Vec<HttpRequest>,
    queued: VecDeque<Reply>,
    fallback: HttpResponse,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                requests: Vec::new(),
                queued: VecDeque::new(),
                fallback: HttpResponse {
                    status: None,
                    body: b"{}".to_vec(),
                },
            })),
        }
    }
}

impl MockTransport {
    pub(crate) fn responding(status: u16, body: Value) -> Self {
        let transport = Self::default();
        transport.state.lock().unwrap().fallback = HttpResponse {
            status: Some(status),
            body: body.to_string().into_bytes(),
        };
        transport
    }

    pub(crate) fn push(&self, status: u16, body: Value) {
        self.push_raw(Some(status), &body.to_string());
    }

    pub(crate) fn push_raw(&self, status: Option<u16>, body: &str) {
        self.state.lock().unwrap().queued.push_back(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub(crate) fn push_error(&self, err: TransportError) {
        self.state.lock().unwrap().queued.push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// `METHOD url` followed by the body on its own line, if any.
    pub(crate) fn last_request_string(&self) -> String {
        let requests = self.requests();
        let request = requests.last().expect("no request was sent");
        match &request.body {
            Some(body) => format!("{}\n{}", request.request_line(), body),
            None => request.request_line(),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Reply {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state
            .queued
            .pop_front()
            .unwrap_or_else(|| Ok(state.fallback.clone()))
    }
}

pub(crate) fn client(transport: &MockTransport) -> JiraClient {
    let config = JiraConfig::new("https://example.com", "foo", "bar");
    JiraClient::with_transport(&config, transport.clone()).unwrap()
}
