//! Request builder: turns a `GraphQLRequest` into an `HttpRequest`.

use serde_json::Value;
use url::Url;

use crate::http::{HttpMethod, HttpRequest, DEFAULT_MEDIA_TYPE};
use crate::models::{GraphQLRequest, OPERATION_NAME_FIELD, QUERY_FIELD, VARIABLES_FIELD};
use crate::{Error, Result};

/// Serialize a request into its JSON wire payload.
///
/// Absent fields and an empty variable map are left out of the object.
pub fn to_payload(request: &GraphQLRequest) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}

/// Build a POST carrying the payload as its body.
///
/// `media_type` sets the `content-type` header; `None` or a blank value
/// falls back to UTF-8 JSON.
pub fn build_post_request(
    endpoint: Url,
    request: &GraphQLRequest,
    media_type: Option<&str>,
) -> Result<HttpRequest> {
    let content_type = resolve_media_type(media_type)?;
    let body = to_payload(request)?;

    tracing::trace!(url = %endpoint, bytes = body.len(), "built GraphQL POST");

    Ok(HttpRequest {
        method: HttpMethod::Post,
        url: endpoint,
        headers: vec![
            ("content-type".to_string(), content_type),
            ("accept".to_string(), "application/json".to_string()),
        ],
        body: Some(body),
    })
}

/// Build a GET carrying the payload fields as query parameters.
///
/// Parameters already on `endpoint` are kept. `variables` is encoded as
/// compact JSON text.
pub fn build_get_request(mut endpoint: Url, request: &GraphQLRequest) -> Result<HttpRequest> {
    let variables = if request.variables().is_empty() {
        None
    } else {
        Some(serde_json::to_string(&Value::Object(request.variables().clone()))?)
    };

    {
        let mut pairs = endpoint.query_pairs_mut();
        if let Some(query) = request.query() {
            pairs.append_pair(QUERY_FIELD, query);
        }
        if let Some(name) = request.operation_name() {
            pairs.append_pair(OPERATION_NAME_FIELD, name);
        }
        if let Some(variables) = &variables {
            pairs.append_pair(VARIABLES_FIELD, variables);
        }
    }
    // query_pairs_mut leaves a dangling '?' when nothing was appended
    if endpoint.query() == Some("") {
        endpoint.set_query(None);
    }

    tracing::trace!(url = %endpoint, "built GraphQL GET");

    Ok(HttpRequest {
        method: HttpMethod::Get,
        url: endpoint,
        headers: vec![("accept".to_string(), "application/json".to_string())],
        body: None,
    })
}

fn resolve_media_type(media_type: Option<&str>) -> Result<String> {
    match media_type.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MEDIA_TYPE.to_string()),
        Some(value) if value.chars().any(|c| c.is_control()) => Err(Error::InvalidArgument(
            format!("media type {value:?} contains control characters"),
        )),
        Some(value) => Ok(value.to_string()),
    }
}
