//! Request extraction shared by the API handlers.

use serde::de::DeserializeOwned;

use habitual_service::error::ServiceError;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` ("Invalid request body") when the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut salvo::Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}

/// ## Summary
/// Parses the query string.
///
/// ## Errors
/// Returns `BadRequest` when a parameter has the wrong shape.
pub fn query_params<T: DeserializeOwned>(req: &mut salvo::Request) -> AppResult<T> {
    req.parse_queries::<T>().map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse query string");
        AppError::BadRequest("Invalid query parameters".to_string())
    })
}

/// ## Summary
/// Reads a UUID path parameter.
///
/// ## Errors
/// Returns `NotFound` ("`<what>` not found") when the parameter is missing or not a UUID,
/// since no such record can exist.
pub fn path_id(req: &salvo::Request, name: &str, what: &str) -> AppResult<uuid::Uuid> {
    req.param::<String>(name)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ServiceError::not_found(format!("{what} not found")).into())
}
