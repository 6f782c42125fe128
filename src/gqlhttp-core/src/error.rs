use serde_json::{Map, Value};

use crate::models::{GraphQLError, DATA_FIELD};

/// Boxed error produced by an HTTP transport
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("Server error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    GraphQL(#[from] GraphQLException),

    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// True for failures raised below the GraphQL layer (status or connection)
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Status { .. })
    }

    pub fn graphql_errors(&self) -> Option<&[GraphQLError]> {
        match self {
            Error::GraphQL(e) => Some(e.errors()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the server in a GraphQL response.
///
/// Displays as the error messages joined by newlines. The full response
/// object is kept so fields the typed model drops are still reachable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.errors))]
pub struct GraphQLException {
    errors: Vec<GraphQLError>,
    response: Map<String, Value>,
}

impl GraphQLException {
    pub(crate) fn new(errors: Vec<GraphQLError>, response: Map<String, Value>) -> Self {
        Self { errors, response }
    }

    pub fn errors(&self) -> &[GraphQLError] {
        &self.errors
    }

    /// The raw response object, unmodified
    pub fn response(&self) -> &Map<String, Value> {
        &self.response
    }

    /// Partial data the server sent alongside its errors
    pub fn data(&self) -> Option<&Value> {
        self.response.get(DATA_FIELD).filter(|v| !v.is_null())
    }

    pub fn into_parts(self) -> (Vec<GraphQLError>, Map<String, Value>) {
        (self.errors, self.response)
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
