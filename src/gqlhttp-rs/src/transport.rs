use std::ops::Deref;

use gqlhttp_core::{Error, HttpMethod, HttpRequest, HttpResponse, Result};

/// Executes one HTTP exchange.
///
/// Implementations must fail with `Error::Status` on a non-2xx status
/// without reading the body, and with `Error::Transport` on connection
/// failures.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait::async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(Box::new(e)))?;

        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                reason: reason.unwrap_or_default(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(Box::new(e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body: body.to_vec(),
        })
    }
}

/// A transport the client either owns or borrows from its caller.
///
/// An owned transport is dropped together with the client; a borrowed one
/// is left to the caller.
#[derive(Debug)]
pub enum TransportHandle<'a, T> {
    Owned(T),
    Borrowed(&'a T),
}

impl<T> TransportHandle<'_, T> {
    pub fn is_owned(&self) -> bool {
        matches!(self, TransportHandle::Owned(_))
    }
}

impl<T> Deref for TransportHandle<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            TransportHandle::Owned(transport) => transport,
            TransportHandle::Borrowed(transport) => transport,
        }
    }
}
