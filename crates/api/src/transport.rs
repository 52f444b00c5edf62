use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Method};
use thiserror::Error;
use url::Url;

use crate::error::{ApiError, Result};
use crate::types::RequestMethod;

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A fully assembled request, ready to go over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: RequestMethod,
    /// Absolute URL including the query string. Never carries userinfo.
    pub url: Url,
    pub auth: Option<BasicAuth>,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// `METHOD url`, as it would appear in a log line.
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// `None` when the exchange finished without a status line.
    pub status: Option<u16>,
    pub body: Vec<u8>,
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// Raw error body, when the failure came with one.
    pub body: Option<Vec<u8>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::new(err.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::transport(err.message, err.body.as_deref())
    }
}

/// Performs exactly one HTTP exchange per call. [`HttpTransport`] is the
/// default; tests and embedders can substitute their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest::Client`. Timeouts and connection
/// pooling are whatever the client was built with.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("jira-rest/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::transport(err.to_string(), None))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Post => Method::POST,
        RequestMethod::Put => Method::PUT,
        RequestMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut req = self
            .client
            .request(to_reqwest_method(request.method), request.url);

        for (name, value) in request.headers {
            req = req.header(name, value);
        }
        if let Some(auth) = request.auth {
            req = req.basic_auth(auth.username, Some(auth.password));
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status: Some(status),
            body: body.to_vec(),
        })
    }
}
