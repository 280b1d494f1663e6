use crate::handler::{query_params, success_response};
use crate::service::error::ServiceError;
use crate::service::tag_service::{DEFAULT_PREFIX_LIMIT, TagService};
use axum::{
    Router,
    extract::{Query, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AutocompleteQuery {
    q: Option<String>,
}

pub(crate) fn router(db: Arc<DatabaseConnection>) -> Router {
    let service = TagService::new(db);

    Router::new().route(
        "/tags",
        get(move |query: Result<Query<AutocompleteQuery>, QueryRejection>| {
            autocomplete_tags(service.clone(), query)
        }),
    )
}

async fn autocomplete_tags(
    service: TagService,
    query: Result<Query<AutocompleteQuery>, QueryRejection>,
) -> Result<Response, ServiceError> {
    let prefix = query_params(query)?
        .q
        .ok_or_else(|| ServiceError::bad_request("Query parameter 'q' is required"))?;

    let data = service.tags_by_prefix(&prefix, DEFAULT_PREFIX_LIMIT).await?;
    Ok(success_response(StatusCode::OK, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::open_test_db;
    use axum::body::Body;
    use axum::http::Request;
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
    async fn missing_query_is_rejected() {
        let app = router(open_test_db().await);
        let (status, body) = get_json(app, "/tags").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query parameter 'q' is required");
    }

    #[tokio::test]
    async fn returns_at_most_eight_matches_in_name_order() {
        let db = open_test_db().await;
        let tags = TagService::new(db.clone());
        for index in (0..10).rev() {
            tags.create_or_find_tag(&format!("tag{index}")).await.unwrap();
        }
        tags.create_or_find_tag("other").await.unwrap();

        let (status, body) = get_json(router(db), "/tags?q=TAG").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|tag| tag["name"].as_str())
            .collect();
        assert_eq!(
            names,
            vec!["tag0", "tag1", "tag2", "tag3", "tag4", "tag5", "tag6", "tag7"]
        );
    }

    #[tokio::test]
    async fn empty_query_returns_empty_list() {
        let app = router(open_test_db().await);
        let (status, body) = get_json(app, "/tags?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Array(Vec::new()));
    }
}
