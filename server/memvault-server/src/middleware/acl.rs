//! Resource-id extraction for generic ACL-gated requests
//!
//! A permission check needs to know which resource it is about. The id
//! is located in priority order: path parameter `resource_id`, path
//! parameter `id`, query parameter `resource_id`, and, for mutating
//! methods only, a `resource_id` field in the JSON body. When none
//! yields a value the check fails with a client error, not a denial.

use crate::error::ApiError;
use axum::http::Method;
use std::collections::HashMap;
use uuid::Uuid;

fn parse_resource_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation(format!("Invalid resource ID: {}", raw)))
}

/// Locate the resource id a permission check applies to.
pub fn resolve_resource_id(
    path_params: &[(String, String)],
    query_params: &HashMap<String, String>,
    method: &Method,
    body: Option<&serde_json::Value>,
) -> Result<Uuid, ApiError> {
    for name in ["resource_id", "id"] {
        if let Some((_, value)) = path_params.iter().find(|(key, _)| key == name) {
            return parse_resource_id(value);
        }
    }

    if let Some(value) = query_params.get("resource_id") {
        return parse_resource_id(value);
    }

    if *method == Method::POST || *method == Method::PUT {
        if let Some(raw) = body
            .and_then(|body| body.get("resource_id"))
            .and_then(|value| value.as_str())
        {
            return parse_resource_id(raw);
        }
    }

    Err(ApiError::MissingResourceId)
}
