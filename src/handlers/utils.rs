use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id; an id that cannot exist is simply not found
pub fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} {} not found", kind, raw)))
}

/// Unwrap a JSON body, turning extractor rejections into API errors
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Unwrap query parameters, turning extractor rejections into API errors
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
