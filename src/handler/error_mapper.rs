use crate::response::ApiResponse;
use crate::service::error::{ServiceError, ServiceErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

fn status_code_for(kind: ServiceErrorKind) -> StatusCode {
    match kind {
        ServiceErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ServiceErrorKind::NotFound => StatusCode::NOT_FOUND,
        ServiceErrorKind::Conflict => StatusCode::CONFLICT,
        ServiceErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_code_for(self.kind());
        if self.kind() == ServiceErrorKind::Internal {
            // Driver messages stay in the log.
            error!(error = %self.message(), "request failed");
            return ApiResponse::<Value>::error_with_status(INTERNAL_ERROR_MESSAGE, status)
                .into_response();
        }

        ApiResponse::<Value>::error_with_status(self.message(), status)
            .with_details(self.details())
            .into_response()
    }
}
