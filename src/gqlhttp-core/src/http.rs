//! HTTP exchange described as plain data.
//!
//! # Design
//! The core builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A transport in `gqlhttp-rs` performs the
//! actual round-trip, so everything in this crate stays deterministic.

use url::Url;

/// Header value used when the caller does not pick a media type
pub const DEFAULT_MEDIA_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A single HTTP request ready to be executed by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The parts of an HTTP response the parser needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase, if the transport knows one
    pub reason: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can name a GraphQL endpoint.
pub trait Endpoint {
    fn into_url(self) -> crate::Result<Url>;
}

impl Endpoint for Url {
    fn into_url(self) -> crate::Result<Url> {
        Ok(self)
    }
}

impl Endpoint for &Url {
    fn into_url(self) -> crate::Result<Url> {
        Ok(self.clone())
    }
}

impl Endpoint for &str {
    fn into_url(self) -> crate::Result<Url> {
        Url::parse(self.trim())
            .map_err(|e| crate::Error::InvalidArgument(format!("endpoint {self:?}: {e}")))
    }
}

impl Endpoint for String {
    fn into_url(self) -> crate::Result<Url> {
        self.as_str().into_url()
    }
}

impl Endpoint for &String {
    fn into_url(self) -> crate::Result<Url> {
        self.as_str().into_url()
    }
}
