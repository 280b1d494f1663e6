use crate::response::HealthResponse;
use axum::{Json, Router, response::IntoResponse, routing::get};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Serialize)]
pub(crate) struct PingResponse {
    success: bool,
    message: &'static str,
}

pub(crate) fn router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(move || health(db.clone())))
}

pub(crate) async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        success: true,
        message: "pong",
    })
}

/// Reports 503 when the database does not answer.
async fn health(db: Arc<DatabaseConnection>) -> impl IntoResponse {
    match db.ping().await {
        Ok(()) => HealthResponse::healthy(),
        Err(error) => {
            warn!(error = %error, "database ping failed");
            HealthResponse::unhealthy("Database unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::open_test_db;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let (status, body) = get_json(router(open_test_db().await), "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "pong");
    }

    #[tokio::test]
    async fn health_checks_the_database() {
        let db = open_test_db().await;
        let (status, body) = get_json(router(db.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        db.as_ref().clone().close().await.unwrap();
        let (status, body) = get_json(router(db), "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "error");
    }
}
