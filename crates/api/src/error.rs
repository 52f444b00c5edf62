use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be carried out at all. `payload` holds the
    /// error body when the transport produced one that parses as JSON.
    #[error("HTTP request failed: {message}")]
    Transport {
        message: String,
        payload: Option<Value>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid request parameters: {0}")]
    InvalidParams(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>, body: Option<&[u8]>) -> Self {
        ApiError::Transport {
            message: message.into(),
            payload: body.and_then(|b| serde_json::from_slice(b).ok()),
        }
    }

    /// The parsed error payload of a transport failure, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Transport { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Transport { .. } => {
                Some("Check your network connection and the configured base URL")
            }
            ApiError::InvalidUrl(_) => Some("Verify the base_url of the active profile"),
            ApiError::InvalidResponse(_) => {
                Some("The server did not answer with JSON; is the base URL a Jira instance?")
            }
            ApiError::InvalidParams(_) => Some("Review the request parameters"),
            ApiError::JsonError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_payload_is_parsed_when_json() {
        let err = ApiError::transport("connection reset", Some(&br#"{"errorMessages":["boom"]}"#[..]));
        assert_eq!(err.payload(), Some(&json!({"errorMessages": ["boom"]})));
        assert_eq!(err.to_string(), "HTTP request failed: connection reset");
    }

    #[test]
    fn test_transport_payload_dropped_when_not_json() {
        let err = ApiError::transport("connection reset", Some(&b"<html>"[..]));
        assert!(err.payload().is_none());

        let err = ApiError::transport("dns failure", None);
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_suggestions() {
        assert!(ApiError::transport("x", None).suggestion().is_some());
        assert!(ApiError::InvalidResponse("x".into()).suggestion().is_some());
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        assert!(ApiError::JsonError(json_err).suggestion().is_none());
    }
}
