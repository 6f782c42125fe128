use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// JSON property holding the operation name of a request.
pub const OPERATION_NAME_FIELD: &str = "operationName";
/// JSON property holding the query document of a request.
pub const QUERY_FIELD: &str = "query";
/// JSON property holding the variables of a request.
pub const VARIABLES_FIELD: &str = "variables";
/// JSON property holding the data of a response.
pub const DATA_FIELD: &str = "data";
/// JSON property holding the errors of a response.
pub const ERRORS_FIELD: &str = "errors";

/// A GraphQL operation to be sent to a server.
///
/// Blank strings are normalized to `None` when assigned, so a request never
/// serializes an empty or whitespace-only `operationName` or `query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphQLRequest {
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    operation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    variables: Map<String, Value>,
}

impl GraphQLRequest {
    /// Create a request carrying the given query document
    pub fn new(query: impl Into<String>) -> Self {
        let mut request = Self::default();
        request.set_query(Some(query.into()));
        request
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.set_operation_name(Some(name.into()));
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn set_operation_name(&mut self, name: Option<String>) {
        self.operation_name = non_blank(name);
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.query = non_blank(query);
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.variables
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Position in the query document an error refers to (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphQLLocation {
    pub line: u32,
    pub column: u32,
}

impl GraphQLLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A single error reported by a GraphQL server.
///
/// Fields other than `message` and `locations` (usually `path` and
/// `extensions`) are kept in `additional_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub locations: Vec<GraphQLLocation>,
    #[serde(flatten)]
    pub additional_data: Map<String, Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            additional_data: Map::new(),
        }
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.locations.push(GraphQLLocation::new(line, column));
        self
    }

    /// Response path of the field that failed, if the server reported one
    pub fn path(&self) -> Option<&[Value]> {
        self.additional_data
            .get("path")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.additional_data
            .get("extensions")
            .and_then(Value::as_object)
    }
}

// Some servers send `"locations": null` for errors with no query position
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A successful GraphQL response.
///
/// `data` is decoded into the caller-chosen type; every other top-level field
/// except `errors` is preserved in `additional_properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQLResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl<T> GraphQLResponse<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.additional_properties
            .get("extensions")
            .and_then(Value::as_object)
    }
}

impl<T> Default for GraphQLResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            additional_properties: Map::new(),
        }
    }
}
