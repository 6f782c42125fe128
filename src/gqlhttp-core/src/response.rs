//! Response parser: decides between the data and errors shapes of a
//! GraphQL response body.
//!
//! # Design
//! GraphQL servers answer application errors with HTTP 200, so the status
//! code only gates whether the body is read at all. After that the shape of
//! the JSON object is the only signal: a top-level `errors` field wins over
//! `data`, even when both are present.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GraphQLException;
use crate::http::HttpResponse;
use crate::models::{GraphQLError, GraphQLResponse, DATA_FIELD, ERRORS_FIELD};
use crate::{Error, Result};

/// Check the status, then parse the body.
pub fn parse_http_response<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<GraphQLResponse<T>> {
    check_status(response)?;
    parse_response(&response.body)
}

/// Parse a response body that arrived with a success status.
pub fn parse_response<T: DeserializeOwned>(body: &[u8]) -> Result<GraphQLResponse<T>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::MalformedResponse(format!("body is not valid JSON: {e}")))?;

    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )))
        }
    };

    if let Some(errors) = decode_errors(object.get(ERRORS_FIELD))? {
        tracing::debug!(count = errors.len(), "GraphQL response carries errors");
        return Err(GraphQLException::new(errors, object).into());
    }

    object.remove(ERRORS_FIELD);
    let data = match object.remove(DATA_FIELD) {
        None | Some(Value::Null) => {
            tracing::debug!("GraphQL response carries no data");
            None
        }
        Some(data) => Some(serde_json::from_value(data).map_err(|e| {
            Error::MalformedResponse(format!("data does not match the requested shape: {e}"))
        })?),
    };

    Ok(GraphQLResponse {
        data,
        additional_properties: object,
    })
}

fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(Error::Status {
        status: response.status,
        reason: response.reason.clone().unwrap_or_default(),
    })
}

/// `Ok(None)` means "no errors": the field is missing, null, or an empty array.
fn decode_errors(field: Option<&Value>) -> Result<Option<Vec<GraphQLError>>> {
    let errors = match field {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) if items.is_empty() => return Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(decode_error)
            .collect::<Result<Vec<_>>>()?,
        Some(single @ Value::Object(_)) => vec![decode_error(single)?],
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "errors must be an array or object, got {}",
                kind_of(other)
            )))
        }
    };
    Ok(Some(errors))
}

fn decode_error(value: &Value) -> Result<GraphQLError> {
    GraphQLError::deserialize(value)
        .map_err(|e| Error::MalformedResponse(format!("invalid error entry: {e}")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
