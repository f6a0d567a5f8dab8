/*!
Typed adapter for the Private CA Connector for Active Directory REST API.

Layout:
  error.rs                   ApiError / ServiceError
  model.rs                   resources + wire enums shared by operations
  definition.rs              template definition union (V2 / V3 / V4)
  connector.rs               Create/Get/List/DeleteConnector
  directory_registration.rs  Create/Get/List/DeleteDirectoryRegistration
  service_principal_name.rs  Create/Get/List/DeleteServicePrincipalName
  template.rs                Create/Get/List/Update/DeleteTemplate
  access_control_entry.rs    *TemplateGroupAccessControlEntry
  tags.rs                    ListTagsForResource / TagResource / UntagResource
  transport.rs               Transport trait + reqwest implementation
  sigv4.rs                   request signing
  client.rs                  dispatch boundary

Every operation is a plain struct of optional inputs implementing [`Operation`].
`to_request` is where required inputs are enforced and where nested
structures are collapsed; it never performs I/O.
*/

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Implements [`Collapse`] for a struct whose fields are all `Option`s.
macro_rules! impl_collapse {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::api::Collapse for $ty {
            fn is_unset(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

pub mod access_control_entry;
pub mod client;
pub mod connector;
pub mod definition;
pub mod directory_registration;
pub mod error;
pub mod model;
pub mod service_principal_name;
pub mod sigv4;
pub mod tags;
pub mod template;
pub mod transport;

pub use client::Client;
pub use error::{ApiError, ApiResult};
pub use transport::HttpTransport;

/* ---- Operation Contract ---- */

/// One remote API operation with its inputs.
pub trait Operation {
    type Output: DeserializeOwned + Serialize + Shape;

    /// Remote operation name, e.g. `CreateConnector`.
    const NAME: &'static str;

    /// Input parameter names that can be echoed back with `^Name`.
    const PARAMETERS: &'static [&'static str];

    /// Validate inputs and build the wire request.
    fn to_request(&self) -> ApiResult<HttpRequest>;

    /// Current value of an input parameter (`None` when unset).
    /// `name` is one of [`Operation::PARAMETERS`].
    fn parameter(&self, name: &str) -> Option<serde_json::Value>;
}

/// Projection of a response onto its primary field.
pub trait Shape {
    fn primary(&self) -> Option<serde_json::Value>;

    /// Continuation marker for paged responses.
    fn next_token(&self) -> Option<&str> {
        None
    }
}

/// Response of operations that answer with an empty body.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

impl Shape for Empty {
    fn primary(&self) -> Option<serde_json::Value> {
        None
    }
}

/* ---- Collapsing ---- */

/// A nested request structure that must be omitted when none of its fields is set.
pub trait Collapse {
    fn is_unset(&self) -> bool;
}

/// `Some(value)` if anything inside was supplied, else `None`.
pub fn collapse<T: Collapse>(value: T) -> Option<T> {
    if value.is_unset() { None } else { Some(value) }
}

/// Empty lists count as "not supplied".
pub fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

/* ---- Wire Request / Response ---- */

/// Unreserved characters (RFC 3986) stay as-is, everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value for use as a path segment or query component.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path with labels already encoded.
    pub path: String,
    /// Unencoded query pairs in insertion order.
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query pair only when a value is present.
    pub fn query<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.query.push((key, v.to_string()));
        }
        self
    }

    /// Append one query pair per value (repeated key).
    pub fn query_all(mut self, key: &'static str, values: &[String]) -> Self {
        for v in values {
            self.query.push((key, v.clone()));
        }
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidParameter {
            name: "request body",
            reason: e.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Query string as sent on the wire (no leading `?`).
    pub fn encoded_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn body_bytes(&self) -> Vec<u8> {
        self.body
            .as_ref()
            .map(|b| b.to_string().into_bytes())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// `x-amzn-ErrorType` header, if any.
    pub error_type: Option<String>,
    /// `x-amzn-RequestId` header, if any.
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[cfg(test)]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/* ---- Input Helpers ---- */

/// A required string input; blank counts as missing.
pub(crate) fn required<'a>(value: &'a Option<String>, name: &'static str) -> ApiResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::MissingParameter(name)),
    }
}

pub(crate) fn required_value<'a, T>(value: &'a Option<T>, name: &'static str) -> ApiResult<&'a T> {
    value.as_ref().ok_or(ApiError::MissingParameter(name))
}

/// A required list input. Blank entries are dropped; nothing left counts as missing.
pub(crate) fn required_list(values: &[String], name: &'static str) -> ApiResult<Vec<String>> {
    let kept: Vec<String> = values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect();
    if kept.is_empty() {
        Err(ApiError::MissingParameter(name))
    } else {
        Ok(kept)
    }
}

/// JSON view of an optional input for echoing.
pub(crate) fn echo<T: Serialize>(value: &Option<T>) -> Option<serde_json::Value> {
    value.as_ref().and_then(|v| serde_json::to_value(v).ok())
}

pub(crate) fn echo_list<T: Serialize>(values: &[T]) -> Option<serde_json::Value> {
    if values.is_empty() {
        None
    } else {
        serde_json::to_value(values).ok()
    }
}

/// JSON view of a response member for the primary projection.
pub(crate) fn project<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok().filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_arn_label() {
        assert_eq!(
            encode("arn:aws:pca-connector-ad:us-east-1:111122223333:connector/abc"),
            "arn%3Aaws%3Apca-connector-ad%3Aus-east-1%3A111122223333%3Aconnector%2Fabc"
        );
        assert_eq!(encode("a b~c"), "a%20b~c");
    }

    #[test]
    fn query_skips_unset_values() {
        let req = HttpRequest::new(Method::GET, "/connectors")
            .query("MaxResults", Some(10))
            .query::<String>("NextToken", None);
        assert_eq!(req.query, vec![("MaxResults", "10".to_string())]);
        assert_eq!(req.encoded_query(), "MaxResults=10");
    }

    #[test]
    fn blank_required_is_missing() {
        let err = required(&Some("  ".into()), "DirectoryId").unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter("DirectoryId")));
        assert_eq!(required(&Some("d-1".into()), "DirectoryId").unwrap(), "d-1");
    }

    #[test]
    fn required_list_needs_a_value() {
        assert!(required_list(&[], "TagKeys").is_err());
        assert!(required_list(&["".into(), " ".into()], "TagKeys").is_err());
        assert_eq!(
            required_list(&["env".into(), "".into(), "team".into()], "TagKeys").unwrap(),
            ["env", "team"]
        );
    }

    #[test]
    fn empty_output_has_no_primary() {
        let out: Empty = serde_json::from_str("{}").unwrap();
        assert!(out.primary().is_none());
        assert!(out.next_token().is_none());
    }
}
