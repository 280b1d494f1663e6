mod error_mapper;
pub(crate) mod health_handler;
pub(crate) mod highlight_handler;
pub(crate) mod language_handler;
pub(crate) mod snippet_handler;
pub(crate) mod tag_handler;

use crate::response::ApiResponse;
use crate::service::error::ServiceError;
use axum::{
    Json, Router,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

pub(crate) fn api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(snippet_handler::router(db.clone()))
        .merge(tag_handler::router(db))
        .merge(highlight_handler::router())
        .merge(language_handler::router())
}

pub(super) fn success_response<T: Serialize>(status: StatusCode, data: T) -> Response {
    ApiResponse::success_with_status(data, status).into_response()
}

/// Unwraps a JSON body, turning malformed input into a 400.
pub(super) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::bad_request(rejection.body_text()))
}

pub(super) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ServiceError::bad_request(rejection.body_text()))
}

pub(super) fn snippet_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ServiceError> {
    id.map(|Path(id)| id)
        .map_err(|_| ServiceError::bad_request("Invalid snippet ID"))
}
