//! gqlhttp Core Library
//!
//! I/O-free building blocks of a GraphQL-over-HTTP client:
//! - Request and response data model
//! - Request builder (POST body or GET query string)
//! - Response parser separating `data` from `errors`
//! - Error taxonomy shared by the client and the CLI

pub mod error;
pub mod http;
pub mod models;
pub mod payload;
pub mod response;

// Re-export commonly used types
pub use error::{BoxError, Error, GraphQLException, Result};
pub use http::{Endpoint, HttpMethod, HttpRequest, HttpResponse, DEFAULT_MEDIA_TYPE};
pub use models::*;
pub use payload::{build_get_request, build_post_request, to_payload};
pub use response::{parse_http_response, parse_response};
