//! gqlhttp Client Library
//!
//! Async GraphQL-over-HTTP client built on reqwest.
//!
//! ```rust,no_run
//! use gqlhttp_rs::{Client, GraphQLRequest, GraphQLResponse};
//!
//! #[tokio::main]
//! async fn main() -> gqlhttp_rs::Result<()> {
//!     let client = Client::new();
//!     let response: GraphQLResponse<serde_json::Value> = client
//!         .post_query("http://localhost:4000/graphql", &GraphQLRequest::new("{ ping }"))
//!         .await?;
//!     println!("{:?}", response.data);
//!     Ok(())
//! }
//! ```

mod client;
mod transport;

pub use client::Client;
pub use transport::{Transport, TransportHandle};

pub use gqlhttp_core::{
    Endpoint, Error, GraphQLError, GraphQLException, GraphQLLocation, GraphQLRequest,
    GraphQLResponse, HttpMethod, HttpRequest, HttpResponse, Result,
};
pub use tokio_util::sync::CancellationToken;
pub use url::Url;
