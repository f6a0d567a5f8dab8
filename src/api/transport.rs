//! Wire transport.
//!
//! [`Transport`] is the seam between request construction and the network;
//! tests substitute a recording implementation. [`HttpTransport`] is the
//! real one, built on `reqwest`.

use std::future::Future;

use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use super::error::{ApiError, ApiResult, BoxError};
use super::sigv4::Signer;
use super::{HttpRequest, HttpResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint could not be reached at all (DNS, refused, TLS handshake).
    #[error("{0}")]
    Connect(#[source] BoxError),
    #[error("{0}")]
    Other(#[source] BoxError),
}

pub trait Transport {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    /// Base URL requests are sent to.
    fn endpoint(&self) -> &Url;
}

#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    headers: HeaderMap,
    signer: Option<Signer>,
}

impl HttpTransport {
    pub fn new(endpoint: Url, headers: &[(String, String)], signer: Option<Signer>) -> ApiResult<Self> {
        let mut map = HeaderMap::new();
        for (k, v) in headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| ApiError::Config(format!("invalid header name '{k}': {e}")))?;
            let value = HeaderValue::from_str(v)
                .map_err(|e| ApiError::Config(format!("invalid value for header '{k}': {e}")))?;
            map.append(name, value);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("pcaad/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("unable to build HTTP client: {e}")))?;
        if signer.is_none() {
            debug!("no credentials configured; requests will be sent unsigned");
        }
        Ok(Self {
            http,
            endpoint,
            headers: map,
            signer,
        })
    }

    /// Endpoint + encoded path + encoded query.
    fn url_for(&self, request: &HttpRequest) -> Result<Url, TransportError> {
        let mut raw = format!(
            "{}{}",
            self.endpoint.as_str().trim_end_matches('/'),
            request.path
        );
        let query = request.encoded_query();
        if !query.is_empty() {
            raw.push('?');
            raw.push_str(&query);
        }
        Url::parse(&raw).map_err(|e| TransportError::Other(Box::new(e)))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(request)?;
        let body = request.body_bytes();

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(self.headers.clone());
        if request.body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(signer) = &self.signer {
            let signed = signer
                .sign(&request.method, &url, &body, Utc::now())
                .map_err(|e| TransportError::Other(Box::new(e)))?;
            for (name, value) in signed {
                builder = builder.header(name, value);
            }
        }
        trace!(%url, bytes = body.len(), "sending request");

        let response = builder.body(body).send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let error_type = header_value(response.headers(), "x-amzn-ErrorType");
        let request_id = header_value(response.headers(), "x-amzn-RequestId");
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(HttpResponse {
            status,
            error_type,
            request_id,
            body,
        })
    }

    fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::sigv4::{Credentials, SERVICE};
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, signer: Option<Signer>) -> HttpTransport {
        HttpTransport::new(
            Url::parse(&server.uri()).unwrap(),
            &[("x-team".to_string(), "pki".to_string())],
            signer,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_body_query_and_extra_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connectors"))
            .and(header("content-type", "application/json"))
            .and(header("x-team", "pki"))
            .and(body_json(json!({ "DirectoryId": "d-1" })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "ConnectorArn": "arn" })))
            .expect(1)
            .mount(&server)
            .await;

        let req = HttpRequest::new(Method::POST, "/connectors")
            .json(&json!({ "DirectoryId": "d-1" }))
            .unwrap();
        let resp = transport(&server, None).send(&req).await.unwrap();
        assert_eq!(resp.status, 202);
        assert!(resp.is_success());
        assert_eq!(resp.body, br#"{"ConnectorArn":"arn"}"#.to_vec());
    }

    #[tokio::test]
    async fn encoded_labels_reach_the_server_intact() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/templates/arn%3Aaws%3At%2F1"))
            .and(query_param("MaxResults", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let req = HttpRequest::new(Method::GET, "/templates/arn%3Aaws%3At%2F1")
            .query("MaxResults", Some(5));
        let resp = transport(&server, None).send(&req).await.unwrap();
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn error_headers_are_captured() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("x-amzn-ErrorType", "ResourceNotFoundException:http://internal")
                    .insert_header("x-amzn-RequestId", "req-1")
                    .set_body_string(r#"{"message":"not found"}"#),
            )
            .mount(&server)
            .await;

        let req = HttpRequest::new(Method::DELETE, "/connectors/x");
        let resp = transport(&server, None).send(&req).await.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(
            resp.error_type.as_deref(),
            Some("ResourceNotFoundException:http://internal")
        );
        assert_eq!(resp.request_id.as_deref(), Some("req-1"));
    }

    #[tokio::test]
    async fn signed_requests_carry_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(header("x-amz-security-token", "session"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let signer = Signer::new(
            Credentials {
                access_key_id: "AKID".into(),
                secret_access_key: "secret".into(),
                session_token: Some("session".into()),
            },
            "us-east-1",
            SERVICE,
        );
        let req = HttpRequest::new(Method::GET, "/connectors");
        let resp = transport(&server, Some(signer)).send(&req).await.unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.body.is_empty());
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let transport = HttpTransport::new(Url::parse("http://127.0.0.1:1").unwrap(), &[], None).unwrap();
        let err = transport
            .send(&HttpRequest::new(Method::GET, "/connectors"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[test]
    fn bad_header_is_a_config_error() {
        let err = HttpTransport::new(
            Url::parse("http://localhost").unwrap(),
            &[("bad header".to_string(), "v".to_string())],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
