//! Dispatch boundary: validate, send, translate failures, decode.

use std::future::Future;

use tracing::debug;

use super::error::{ApiError, ApiResult, ServiceError};
use super::transport::{Transport, TransportError};
use super::{HttpRequest, Operation};

#[derive(Debug)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one operation. Nothing is sent if the inputs do not validate.
    pub async fn call<O: Operation>(&self, op: &O) -> ApiResult<O::Output> {
        let request = op.to_request()?;
        self.dispatch::<O>(&request).await
    }

    /// Like [`Client::call`], but gives up with [`ApiError::Cancelled`] as
    /// soon as `cancel` resolves. The in-flight request is dropped.
    pub async fn call_until<O, C>(&self, op: &O, cancel: C) -> ApiResult<O::Output>
    where
        O: Operation,
        C: Future<Output = ()>,
    {
        let request = op.to_request()?;
        tokio::select! {
            result = self.dispatch::<O>(&request) => result,
            _ = cancel => {
                debug!(operation = O::NAME, "cancelled");
                Err(ApiError::Cancelled)
            }
        }
    }

    async fn dispatch<O: Operation>(&self, request: &HttpRequest) -> ApiResult<O::Output> {
        debug!(
            operation = O::NAME,
            method = %request.method,
            path = %request.path,
            "dispatching"
        );

        let response = self.transport.send(request).await.map_err(|err| match err {
            TransportError::Connect(source) => ApiError::Connectivity {
                endpoint: self.transport.endpoint().to_string(),
                operation: O::NAME,
                source,
            },
            TransportError::Other(source) => ApiError::Transport {
                operation: O::NAME,
                source,
            },
        })?;
        debug!(operation = O::NAME, status = response.status, "response");

        if !response.is_success() {
            return Err(ServiceError::from_parts(
                response.status,
                response.error_type.as_deref(),
                response.request_id,
                &response.body,
            )
            .into());
        }

        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(|source| ApiError::Decode {
            operation: O::NAME,
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::api::connector::{CreateConnector, ListConnectors};
    use crate::api::directory_registration::DeleteDirectoryRegistration;
    use crate::api::model::ConnectorStatus;
    use crate::api::{HttpResponse, Shape};
    use url::Url;

    /// Records every request and answers from a script.
    pub(crate) struct RecordingTransport {
        endpoint: Url,
        pub(crate) sent: Mutex<Vec<HttpRequest>>,
        replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    }

    impl RecordingTransport {
        pub(crate) fn new(replies: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                endpoint: Url::parse("https://pca-connector-ad.us-east-1.amazonaws.com").unwrap(),
                sent: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }

        pub(crate) fn answering(body: &str) -> Self {
            Self::new(vec![Ok(HttpResponse::ok(body))])
        }

        pub(crate) fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::ok("{}")))
        }

        fn endpoint(&self) -> &Url {
            &self.endpoint
        }
    }

    #[tokio::test]
    async fn missing_parameter_sends_nothing() {
        let client = Client::new(RecordingTransport::answering("{}"));
        let err = client
            .call(&CreateConnector {
                directory_id: Some("d-1".into()),
                security_group_ids: vec!["sg-1".into()],
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter("CertificateAuthorityArn")));
        assert_eq!(err.exit_code(), 4);
        assert!(client.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn pages_follow_the_continuation_marker() {
        let client = Client::new(RecordingTransport::new(vec![
            Ok(HttpResponse::ok(
                r#"{"Connectors":[{"Arn":"a1","Status":"ACTIVE"}],"NextToken":"p2"}"#,
            )),
            Ok(HttpResponse::ok(r#"{"Connectors":[{"Arn":"a2"}]}"#)),
        ]));

        let first = client
            .call(&ListConnectors {
                max_results: Some(1),
                next_token: None,
            })
            .await
            .unwrap();
        assert_eq!(first.next_token(), Some("p2"));
        assert_eq!(first.connectors[0].status, Some(ConnectorStatus::Active));

        let second = client
            .call(&ListConnectors {
                max_results: Some(1),
                next_token: first.next_token().map(str::to_string),
            })
            .await
            .unwrap();
        assert_eq!(second.next_token(), None);
        assert_ne!(first.connectors[0].arn, second.connectors[0].arn);

        let sent = client.transport().sent();
        assert_eq!(sent[0].encoded_query(), "MaxResults=1");
        assert_eq!(sent[1].encoded_query(), "MaxResults=1&NextToken=p2");
    }

    #[tokio::test]
    async fn service_errors_pass_through() {
        let client = Client::new(RecordingTransport::new(vec![Ok(HttpResponse {
            status: 409,
            error_type: Some("ConflictException".into()),
            request_id: Some("rid".into()),
            body: br#"{"message":"registration is in use"}"#.to_vec(),
        })]));
        let err = client
            .call(&DeleteDirectoryRegistration {
                directory_registration_arn: Some("reg".into()),
            })
            .await
            .unwrap_err();
        match err {
            ApiError::Service(e) => {
                assert_eq!(e.status, 409);
                assert_eq!(e.code, "ConflictException");
                assert_eq!(e.message.as_deref(), Some("registration is in use"));
                assert_eq!(e.request_id.as_deref(), Some("rid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_failure_names_endpoint_and_operation() {
        let client = Client::new(RecordingTransport::new(vec![Err(TransportError::Connect(
            "connection refused".into(),
        ))]));
        let err = client
            .call(&ListConnectors::default())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let text = err.to_string();
        assert!(text.contains("pca-connector-ad.us-east-1.amazonaws.com"), "{text}");
        assert!(text.contains("ListConnectors"), "{text}");
    }

    #[tokio::test]
    async fn empty_body_decodes_for_bodiless_operations() {
        let client = Client::new(RecordingTransport::answering(""));
        let out = client
            .call(&DeleteDirectoryRegistration {
                directory_registration_arn: Some("reg".into()),
            })
            .await
            .unwrap();
        assert!(out.primary().is_none());
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let client = Client::new(RecordingTransport::answering("<html>"));
        let err = client.call(&ListConnectors::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { operation: "ListConnectors", .. }));
    }

    #[tokio::test]
    async fn cancellation_wins_over_pending_call() {
        struct Stalled(Url);
        impl Transport for Stalled {
            async fn send(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
                std::future::pending().await
            }
            fn endpoint(&self) -> &Url {
                &self.0
            }
        }

        let client = Client::new(Stalled(Url::parse("http://localhost").unwrap()));
        let err = client
            .call_until(&ListConnectors::default(), async {})
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        assert_eq!(err.exit_code(), 130);
    }

    #[tokio::test]
    async fn real_closed_port_is_a_connectivity_error() {
        let transport =
            crate::api::HttpTransport::new(Url::parse("http://127.0.0.1:1").unwrap(), &[], None)
                .unwrap();
        let err = Client::new(transport)
            .call(&ListConnectors::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Connectivity { operation: "ListConnectors", .. }
        ));
        assert!(err.to_string().contains("127.0.0.1:1"));
    }
}
