//! Error taxonomy for the adapter.
//!
//! Caller-side defects (`MissingParameter`, `InvalidParameter`, `InvalidSelect`)
//! are raised before anything is sent. Connectivity failures carry the endpoint
//! that was tried. Everything the service itself answers with is kept verbatim
//! in [`ServiceError`].

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid selection '{0}': expected 'primary', '*' or '^ParameterName'")]
    InvalidSelect(String),

    #[error("unable to reach {endpoint} while calling {operation}: {source}")]
    Connectivity {
        endpoint: String,
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("transport failure during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Exit code for the process when this error ends a command.
    ///
    /// - 2: authentication / authorization
    /// - 3: connectivity
    /// - 4: caller-side validation or a 4xx answer
    /// - 5: server side
    /// - 130: interrupted
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter { .. }
            | ApiError::InvalidSelect(_) => 4,
            ApiError::Connectivity { .. } => 3,
            ApiError::Transport { .. } | ApiError::Decode { .. } | ApiError::Config(_) => 1,
            ApiError::Service(err) => {
                if err.is_auth() {
                    2
                } else if err.status >= 500 {
                    5
                } else {
                    4
                }
            }
            ApiError::Cancelled => 130,
        }
    }
}

/// An error answered by the remote service, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} (HTTP {status}){}", detail(.message, .request_id))]
pub struct ServiceError {
    pub status: u16,
    /// Error shape name, e.g. `ValidationException`.
    pub code: String,
    pub message: Option<String>,
    pub request_id: Option<String>,
    /// Raw response body as received.
    pub body: String,
}

impl ServiceError {
    /// Build from a non-success response. The error code comes from the
    /// `x-amzn-ErrorType` header when present, else from `__type` / `code` in the body.
    pub fn from_parts(
        status: u16,
        error_type_header: Option<&str>,
        request_id: Option<String>,
        body: &[u8],
    ) -> Self {
        let body_text = String::from_utf8_lossy(body).into_owned();
        let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();

        let code = error_type_header
            .map(str::to_string)
            .or_else(|| {
                parsed.as_ref().and_then(|v| {
                    v.get("__type")
                        .or_else(|| v.get("code"))
                        .and_then(|c| c.as_str())
                        .map(str::to_string)
                })
            })
            .map(|c| normalize_code(&c))
            .unwrap_or_else(|| format!("HTTP {status}"));

        let message = parsed.as_ref().and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

        ServiceError {
            status,
            code,
            message,
            request_id,
            body: body_text,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.code == "AccessDeniedException"
            || self.code == "UnrecognizedClientException"
    }
}

// `x-amzn-ErrorType` may look like `ValidationException:http://internal.amazon.com/...`
// and `__type` like `com.amazonaws.pcaconnectorad#ValidationException`.
fn normalize_code(raw: &str) -> String {
    let head = raw.split(':').next().unwrap_or(raw);
    head.rsplit('#').next().unwrap_or(head).to_string()
}

/// `: message [request id: …]`, each part only when present.
fn detail(message: &Option<String>, request_id: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(message) = message {
        out.push_str(": ");
        out.push_str(message);
    }
    if let Some(request_id) = request_id {
        out.push_str(&format!(" [request id: {request_id}]"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_code_from_header() {
        let err = ServiceError::from_parts(
            400,
            Some("ValidationException:http://internal.amazon.com/coral/"),
            Some("req-1".into()),
            br#"{"message":"bad directory id","reason":"INVALID_DIRECTORY_TYPE"}"#,
        );
        assert_eq!(err.code, "ValidationException");
        assert_eq!(err.message.as_deref(), Some("bad directory id"));
        assert_eq!(
            err.to_string(),
            "ValidationException (HTTP 400): bad directory id [request id: req-1]"
        );
    }

    #[test]
    fn service_error_code_from_body_type() {
        let err = ServiceError::from_parts(
            404,
            None,
            None,
            br#"{"__type":"com.amazonaws.pcaconnectorad#ResourceNotFoundException","Message":"nope"}"#,
        );
        assert_eq!(err.code, "ResourceNotFoundException");
        assert_eq!(err.message.as_deref(), Some("nope"));
    }

    #[test]
    fn service_error_without_body() {
        let err = ServiceError::from_parts(503, None, None, b"");
        assert_eq!(err.code, "HTTP 503");
        assert!(err.message.is_none());
        assert_eq!(ApiError::from(err).exit_code(), 5);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ApiError::MissingParameter("DirectoryId").exit_code(), 4);
        assert_eq!(ApiError::Cancelled.exit_code(), 130);
        let denied = ServiceError::from_parts(403, Some("AccessDeniedException"), None, b"{}");
        assert_eq!(ApiError::Service(denied).exit_code(), 2);
        let conflict = ServiceError::from_parts(409, Some("ConflictException"), None, b"{}");
        assert_eq!(ApiError::Service(conflict).exit_code(), 4);
    }

    #[test]
    fn service_error_display_without_details() {
        let err = ServiceError::from_parts(500, Some("InternalServerException"), None, b"");
        assert_eq!(err.to_string(), "InternalServerException (HTTP 500)");
        let err = ServiceError::from_parts(409, Some("ConflictException"), Some("r-9".into()), b"{}");
        assert_eq!(err.to_string(), "ConflictException (HTTP 409) [request id: r-9]");
    }
}
