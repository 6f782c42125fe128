use gqlhttp_core::{
    build_get_request, build_post_request, parse_http_response, Endpoint, Error, GraphQLRequest,
    GraphQLResponse, HttpRequest, Result,
};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::transport::{Transport, TransportHandle};

/// GraphQL over HTTP client
///
/// Holds no state between calls besides its transport and the POST media
/// type. Whether the transport is owned or borrowed is fixed when the client
/// is built.
#[derive(Debug)]
pub struct Client<'a, T = reqwest::Client> {
    transport: TransportHandle<'a, T>,
    media_type: Option<String>,
}

impl Client<'static> {
    /// Create a client that owns a fresh `reqwest::Client`
    pub fn new() -> Self {
        Self::with_transport(reqwest::Client::new())
    }
}

impl Default for Client<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Transport> Client<'a, T> {
    /// Create a client that owns `transport` and drops it with itself
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: TransportHandle::Owned(transport),
            media_type: None,
        }
    }

    /// Create a client over a transport the caller keeps ownership of
    pub fn borrowed(transport: &'a T) -> Self {
        Self {
            transport: TransportHandle::Borrowed(transport),
            media_type: None,
        }
    }

    /// Override the `content-type` of POST requests
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn is_owned(&self) -> bool {
        self.transport.is_owned()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back an owned transport; `None` when it was borrowed
    pub fn into_transport(self) -> Option<T> {
        match self.transport {
            TransportHandle::Owned(transport) => Some(transport),
            TransportHandle::Borrowed(_) => None,
        }
    }

    /// Send `request` as a POST and decode `data` into `D`
    pub async fn post_query<D: DeserializeOwned>(
        &self,
        endpoint: impl Endpoint,
        request: &GraphQLRequest,
    ) -> Result<GraphQLResponse<D>> {
        self.post_query_cancellable(endpoint, request, &CancellationToken::new())
            .await
    }

    /// Like `post_query`, aborting the exchange once `cancel` fires
    pub async fn post_query_cancellable<D: DeserializeOwned>(
        &self,
        endpoint: impl Endpoint,
        request: &GraphQLRequest,
        cancel: &CancellationToken,
    ) -> Result<GraphQLResponse<D>> {
        let http_request =
            build_post_request(endpoint.into_url()?, request, self.media_type.as_deref())?;
        self.execute(http_request, cancel).await
    }

    /// Send `request` as a GET with the payload in the query string
    pub async fn get_query<D: DeserializeOwned>(
        &self,
        endpoint: impl Endpoint,
        request: &GraphQLRequest,
    ) -> Result<GraphQLResponse<D>> {
        self.get_query_cancellable(endpoint, request, &CancellationToken::new())
            .await
    }

    pub async fn get_query_cancellable<D: DeserializeOwned>(
        &self,
        endpoint: impl Endpoint,
        request: &GraphQLRequest,
        cancel: &CancellationToken,
    ) -> Result<GraphQLResponse<D>> {
        let http_request = build_get_request(endpoint.into_url()?, request)?;
        self.execute(http_request, cancel).await
    }

    async fn execute<D: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<GraphQLResponse<D>> {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            "sending GraphQL request"
        );

        // Dropping the losing branch aborts the in-flight exchange
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("GraphQL request cancelled");
                return Err(Error::Cancelled);
            }
            response = self.transport.send(request) => response?,
        };

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "received GraphQL response"
        );

        parse_http_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlhttp_core::{HttpMethod, HttpResponse, DEFAULT_MEDIA_TYPE};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    /// Replies with a canned response and records what it was asked to send
    struct FakeTransport {
        status: u16,
        body: String,
        sent: Mutex<Vec<HttpRequest>>,
        dropped: Option<Arc<Mutex<bool>>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
                dropped: None,
            }
        }

        fn with_drop_flag(mut self, flag: Arc<Mutex<bool>>) -> Self {
            self.dropped = Some(flag);
            self
        }

        fn last_sent(&self) -> HttpRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Drop for FakeTransport {
        fn drop(&mut self) {
            if let Some(flag) = &self.dropped {
                *flag.lock().unwrap() = true;
            }
        }
    }

    #[async_trait::async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.sent.lock().unwrap().push(request);
            if !(200..300).contains(&self.status) {
                return Err(Error::Status {
                    status: self.status,
                    reason: String::new(),
                });
            }
            Ok(HttpResponse::new(self.status, self.body.as_bytes()))
        }
    }

    /// Never completes
    struct HangingTransport;

    #[async_trait::async_trait]
    impl Transport for HangingTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
            std::future::pending().await
        }
    }

    const ENDPOINT: &str = "http://localhost:4000/graphql";

    #[tokio::test]
    async fn post_query_returns_data() {
        let transport = FakeTransport::replying(200, r#"{"data":{"ping":"pong"}}"#);
        let client = Client::borrowed(&transport);

        let response: GraphQLResponse<Value> = client
            .post_query(ENDPOINT, &GraphQLRequest::new("{ ping }"))
            .await
            .unwrap();

        assert_eq!(response.data.unwrap()["ping"], "pong");

        let sent = transport.last_sent();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.header("content-type"), Some(DEFAULT_MEDIA_TYPE));
        assert_eq!(sent.body.as_deref(), Some(r#"{"query":"{ ping }"}"#));
    }

    #[tokio::test]
    async fn media_type_override_is_sent() {
        let transport = FakeTransport::replying(200, r#"{"data":{}}"#);
        let client = Client::borrowed(&transport).with_media_type("application/json");

        let _: GraphQLResponse<Value> = client
            .post_query(ENDPOINT, &GraphQLRequest::new("{ ping }"))
            .await
            .unwrap();

        assert_eq!(
            transport.last_sent().header("content-type"),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn get_query_uses_query_string() {
        let transport = FakeTransport::replying(200, r#"{"data":{"ping":"pong"}}"#);
        let client = Client::borrowed(&transport);

        let _: GraphQLResponse<Value> = client
            .get_query(ENDPOINT, &GraphQLRequest::new("{ ping }"))
            .await
            .unwrap();

        let sent = transport.last_sent();
        assert_eq!(sent.method, HttpMethod::Get);
        assert!(sent.body.is_none());
        assert_eq!(sent.url.query(), Some("query=%7B+ping+%7D"));
    }

    #[tokio::test]
    async fn graphql_errors_surface_as_error() {
        let transport = FakeTransport::replying(
            200,
            r#"{"errors":[{"message":"field not found","locations":[{"line":1,"column":3}]}]}"#,
        );
        let client = Client::borrowed(&transport);

        let err = client
            .post_query::<Value>(ENDPOINT, &GraphQLRequest::new("{ pong }"))
            .await
            .unwrap_err();

        let errors = err.graphql_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "field not found");
    }

    #[tokio::test]
    async fn status_failure_passes_through() {
        let transport = FakeTransport::replying(502, "");
        let client = Client::borrowed(&transport);

        let err = client
            .post_query::<Value>(ENDPOINT, &GraphQLRequest::new("{ ping }"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn invalid_endpoint_sends_nothing() {
        let transport = FakeTransport::replying(200, "{}");
        let client = Client::borrowed(&transport);

        let err = client
            .post_query::<Value>("::not a url::", &GraphQLRequest::new("{ ping }"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_token_aborts_request() {
        let client = Client::with_transport(HangingTransport);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = client
            .post_query_cancellable::<Value>(ENDPOINT, &GraphQLRequest::new("{ ping }"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_never_sends() {
        let transport = FakeTransport::replying(200, r#"{"data":{}}"#);
        let client = Client::borrowed(&transport);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .get_query_cancellable::<Value>(ENDPOINT, &GraphQLRequest::new("{ ping }"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn owned_transport_is_dropped_with_client() {
        let dropped = Arc::new(Mutex::new(false));
        let transport = FakeTransport::replying(200, "{}").with_drop_flag(dropped.clone());

        let client = Client::with_transport(transport);
        assert!(client.is_owned());
        drop(client);

        assert!(*dropped.lock().unwrap());
    }

    #[test]
    fn borrowed_transport_outlives_client() {
        let dropped = Arc::new(Mutex::new(false));
        let transport = FakeTransport::replying(200, "{}").with_drop_flag(dropped.clone());

        let client = Client::borrowed(&transport);
        assert!(!client.is_owned());
        assert!(client.into_transport().is_none());

        assert!(!*dropped.lock().unwrap());
        assert_eq!(transport.status, 200);
    }

    #[test]
    fn owned_transport_can_be_taken_back() {
        let client = Client::with_transport(FakeTransport::replying(201, "{}"));
        let transport = client.into_transport().unwrap();
        assert_eq!(transport.status, 201);
    }

    #[test]
    fn default_client_owns_reqwest() {
        let client: Client = Client::default();
        assert!(client.is_owned());
    }
}
