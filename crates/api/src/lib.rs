pub mod error;
pub mod issues;
pub mod pagination;
pub mod query;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

pub use error::{ApiError, Result};
pub use pagination::{collect_items, paginate, DEFAULT_PAGE_SIZE};
pub use query::params_to_query;
pub use transport::{BasicAuth, HttpRequest, HttpResponse, HttpTransport, Transport, TransportError};
pub use types::{
    Assignee, EditIssueConfig, Issue, JiraConfig, Page, RequestMethod, Response, SearchIssuesConfig,
    Status,
};

const JSON_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// Client for one Jira instance. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct JiraClient {
    transport: Arc<dyn Transport>,
    api_base: Url,
    auth: Option<BasicAuth>,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }

    pub fn with_transport(config: &JiraConfig, transport: impl Transport + 'static) -> Result<Self> {
        let url = Url::parse(&config.url)?;
        let api_base = url.join(&format!("rest/api/{}/", config.version()))?;

        let auth = if config.username.is_empty() || config.password.is_empty() {
            None
        } else {
            Some(BasicAuth {
                username: config.username.clone(),
                password: config.password.clone(),
            })
        };

        Ok(Self {
            transport: Arc::new(transport),
            api_base,
            auth,
        })
    }

    /// Versioned base every relative path resolves against.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Assemble the request for `method rel` without sending it.
    ///
    /// `params` must serialize to an object of scalars (or `null`). `body`
    /// is only attached for POST/PUT, and only when it serializes to an
    /// object with at least one key.
    pub fn build_request<P, B>(
        &self,
        method: RequestMethod,
        rel: &str,
        params: &P,
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        P: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut url = self.api_base.join(rel.strip_prefix('/').unwrap_or(rel))?;
        let query = params_to_query(params)?;
        url.set_query(query.strip_prefix('?').filter(|q| !q.is_empty()));

        let body = match body.map(serde_json::to_value).transpose()? {
            Some(Value::Object(map)) if method.carries_body() && !map.is_empty() => {
                Some(serde_json::to_string(&map)?)
            }
            Some(Value::Object(_)) | Some(Value::Null) | None => None,
            Some(other) => {
                return Err(ApiError::InvalidParams(format!(
                    "request body must be an object, got {other}"
                )))
            }
        };

        Ok(HttpRequest {
            method,
            url,
            auth: self.auth.clone(),
            headers: JSON_HEADERS.to_vec(),
            body,
        })
    }

    /// Perform exactly one round trip and normalize the outcome.
    ///
    /// Non-success statuses are not errors; they come back in
    /// [`Response::status`]. Errors are reserved for requests that could not
    /// be built or completed, and for bodies that are not JSON.
    pub async fn request<P, B>(
        &self,
        method: RequestMethod,
        rel: &str,
        params: &P,
        body: Option<&B>,
    ) -> Result<Response>
    where
        P: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, rel, params, body)?;
        let url = request.url.clone();

        debug!(method = %method, url = %url, "Sending request");

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(method = %method, url = %url, error = %err, "Transport failure");
            ApiError::from(err)
        })?;

        let status = Status::from(response.status);
        debug!(method = %method, url = %url, status = %status, "Received response");

        let data = parse_body(&response.body).map_err(|err| {
            error!("Failed to parse JSON response: {}", err);
            err
        })?;

        Ok(Response { data, status })
    }
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("api_base", &self.api_base.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// An empty body (e.g. on 204) is `null`; anything else must be JSON.
fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client, MockTransport};
    use serde_json::json;

    #[test]
    fn test_api_base_uses_version() {
        let transport = MockTransport::default();
        let jira = client(&transport);
        assert_eq!(jira.api_base().as_str(), "https://example.com/rest/api/2/");

        let config = JiraConfig::new("https://example.com", "foo", "bar").with_version("3");
        let jira = JiraClient::with_transport(&config, transport).unwrap();
        assert_eq!(jira.api_base().as_str(), "https://example.com/rest/api/3/");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = JiraConfig::new("not a url", "foo", "bar");
        let err = JiraClient::with_transport(&config, MockTransport::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_build_request_sorts_query_and_resolves_path() {
        let jira = client(&MockTransport::default());
        let request = jira
            .build_request(
                RequestMethod::Get,
                "/issue/JIRA-1/comment",
                &json!({"startAt": 0, "maxResults": 100}),
                Option::<&()>::None,
            )
            .unwrap();

        assert_eq!(
            request.request_line(),
            "GET https://example.com/rest/api/2/issue/JIRA-1/comment?maxResults=100&startAt=0"
        );
        assert_eq!(request.headers, JSON_HEADERS.to_vec());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_no_query_without_params() {
        let jira = client(&MockTransport::default());
        let request = jira
            .build_request(RequestMethod::Get, "issue/JIRA-1", &json!({}), Option::<&()>::None)
            .unwrap();
        assert_eq!(request.url.as_str(), "https://example.com/rest/api/2/issue/JIRA-1");
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_body_only_for_post_and_put() {
        let jira = client(&MockTransport::default());
        let body = json!({"fields": {}});

        for method in [RequestMethod::Post, RequestMethod::Put] {
            let request = jira.build_request(method, "issue", &(), Some(&body)).unwrap();
            assert_eq!(request.body.as_deref(), Some(r#"{"fields":{}}"#));
        }
        for method in [RequestMethod::Get, RequestMethod::Delete] {
            let request = jira.build_request(method, "issue", &(), Some(&body)).unwrap();
            assert!(request.body.is_none());
        }
    }

    #[test]
    fn test_empty_body_is_not_sent() {
        let jira = client(&MockTransport::default());
        let request = jira
            .build_request(RequestMethod::Post, "issue", &(), Some(&json!({})))
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let jira = client(&MockTransport::default());
        let err = jira
            .build_request(RequestMethod::Post, "issue", &(), Some(&json!([1])))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
    }

    #[test]
    fn test_auth_requires_both_credentials() {
        let transport = MockTransport::default();
        let request = client(&transport)
            .build_request(RequestMethod::Get, "myself", &(), Option::<&()>::None)
            .unwrap();
        assert_eq!(
            request.auth,
            Some(BasicAuth {
                username: "foo".into(),
                password: "bar".into(),
            })
        );

        let config = JiraConfig::new("https://example.com", "foo", "");
        let jira = JiraClient::with_transport(&config, transport).unwrap();
        let request = jira
            .build_request(RequestMethod::Get, "myself", &(), Option::<&()>::None)
            .unwrap();
        assert!(request.auth.is_none());
        assert!(request.url.password().is_none());
    }

    #[tokio::test]
    async fn test_request_normalizes_response() {
        let transport = MockTransport::responding(200, json!({"key": "JIRA-1"}));
        let response = client(&transport)
            .request(RequestMethod::Get, "issue/JIRA-1", &(), Option::<&()>::None)
            .await
            .unwrap();

        assert_eq!(response.status, Status::Code(200));
        assert_eq!(response.data, json!({"key": "JIRA-1"}));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_status_is_no_response() {
        let transport = MockTransport::default();
        let response = client(&transport)
            .request(RequestMethod::Get, "issue/JIRA-1", &(), Option::<&()>::None)
            .await
            .unwrap();

        assert_eq!(response.status, Status::NoResponse);
        assert_eq!(response.status.code(), 902);
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let transport = MockTransport::default();
        transport.push_raw(Some(204), "");
        let response = client(&transport)
            .request(RequestMethod::Delete, "issue/JIRA-1", &(), Option::<&()>::None)
            .await
            .unwrap();

        assert_eq!(response.status, Status::Code(204));
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let transport = MockTransport::default();
        transport.push_raw(Some(200), "<html>oops</html>");
        let err = client(&transport)
            .request(RequestMethod::Get, "issue/JIRA-1", &(), Option::<&()>::None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_rejects_with_payload() {
        let transport = MockTransport::default();
        transport.push_error(
            TransportError::new("socket hang up").with_body(br#"{"reason":"reset"}"#.to_vec()),
        );
        let err = client(&transport)
            .request(RequestMethod::Get, "issue/JIRA-1", &(), Option::<&()>::None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.payload(), Some(&json!({"reason": "reset"})));
    }
}
