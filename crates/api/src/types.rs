use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Issues and comments are open-ended records; no schema is imposed.
pub type Issue = Value;

/// Connection settings for a Jira instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JiraConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// REST API version, `"2"` when unset.
    #[serde(default)]
    pub version: Option<String>,
}

impl JiraConfig {
    pub const DEFAULT_VERSION: &'static str = "2";

    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn version(&self) -> &str {
        self.version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(Self::DEFAULT_VERSION)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT ever transmit a request body.
    pub fn carries_body(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a round trip as far as the HTTP status is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Code(u16),
    /// The transport finished without reporting a status.
    NoResponse,
}

impl Status {
    /// Numeric stand-in reported for [`Status::NoResponse`].
    pub const NO_RESPONSE_CODE: u16 = 902;

    pub fn code(&self) -> u16 {
        match self {
            Status::Code(code) => *code,
            Status::NoResponse => Self::NO_RESPONSE_CODE,
        }
    }

    pub fn is(&self, expected: u16) -> bool {
        matches!(self, Status::Code(code) if *code == expected)
    }
}

impl From<Option<u16>> for Status {
    fn from(code: Option<u16>) -> Self {
        code.map(Status::Code).unwrap_or(Status::NoResponse)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Code(code) => write!(f, "{code}"),
            Status::NoResponse => f.write_str("no response"),
        }
    }
}

/// Normalized result of a dispatched request.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub data: Value,
    pub status: Status,
}

impl Response {
    /// Hands back the body when the status matches `expected`.
    pub fn data_if(self, expected: u16) -> Option<Value> {
        self.status.is(expected).then_some(self.data)
    }
}

/// Offset/size pair for paginated endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "startAt", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<u64>,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl Page {
    pub fn starting_at(offset: u64) -> Self {
        Self {
            starts_at: Some(offset),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Query options accepted by the issue edit endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditIssueConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_users: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_editable_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_screen_security: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIssuesConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_by_keys: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
}

/// Body of the assignee endpoint. Cloud instances identify users by
/// `accountId`, server instances by `name`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Assignee {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            account_id: None,
        }
    }

    pub fn by_account_id(account_id: impl Into<String>) -> Self {
        Self {
            name: None,
            account_id: Some(account_id.into()),
        }
    }
}
