use crate::handler::{json_body, query_params, snippet_id, success_response};
use crate::service::error::ServiceError;
use crate::service::snippet_service::{SnippetChanges, SnippetOrder, SnippetService};
use crate::validation::{SnippetDraft, ValidationError};
use axum::{
    Json, Router,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

/// `tags` is a comma separated search; it wins over `language`, which wins
/// over a plain ordered listing.
#[derive(Debug, Deserialize)]
struct ListQuery {
    order: Option<SnippetOrder>,
    language: Option<String>,
    tags: Option<String>,
}

pub(crate) fn router(db: Arc<DatabaseConnection>) -> Router {
    let service = SnippetService::new(db);
    let list_service = service.clone();
    let create_service = service.clone();
    let get_service = service.clone();
    let update_service = service.clone();
    let delete_service = service;

    Router::new()
        .route(
            "/snippets",
            get(move |query: Result<Query<ListQuery>, QueryRejection>| {
                list_snippets(list_service.clone(), query)
            })
            .post(move |payload: Result<Json<SnippetDraft>, JsonRejection>| {
                create_snippet(create_service.clone(), payload)
            }),
        )
        .route(
            "/snippets/{id}",
            get(move |id: Result<Path<i32>, PathRejection>| get_snippet(get_service.clone(), id))
                .put(
                    move |id: Result<Path<i32>, PathRejection>,
                          payload: Result<Json<SnippetChanges>, JsonRejection>| {
                        update_snippet(update_service.clone(), id, payload)
                    },
                )
                .delete(move |id: Result<Path<i32>, PathRejection>| {
                    delete_snippet(delete_service.clone(), id)
                }),
        )
}

fn not_found() -> ServiceError {
    ServiceError::not_found("Snippet not found")
}

async fn list_snippets(
    service: SnippetService,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ServiceError> {
    let query = query_params(query)?;

    if let Some(tags) = query.tags {
        let terms: Vec<String> = tags.split(',').map(str::to_string).collect();
        let data = service.search_by_tags(&terms).await?;
        return Ok(success_response(StatusCode::OK, data));
    }
    if let Some(language) = query.language {
        let data = service.filter_by_language(&language).await?;
        return Ok(success_response(StatusCode::OK, data));
    }

    let data = service.list(query.order.unwrap_or_default()).await?;
    Ok(success_response(StatusCode::OK, data))
}

async fn create_snippet(
    service: SnippetService,
    payload: Result<Json<SnippetDraft>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let draft = json_body(payload)?;
    let data = service.create(draft).await?;
    Ok(success_response(StatusCode::CREATED, data))
}

async fn get_snippet(
    service: SnippetService,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = snippet_id(id)?;
    let data = service.get(id).await?.ok_or_else(not_found)?;
    Ok(success_response(StatusCode::OK, data))
}

async fn update_snippet(
    service: SnippetService,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SnippetChanges>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = snippet_id(id)?;
    let changes = json_body(payload)?;
    // The service treats `tags: []` as "clear"; over HTTP a snippet keeps at least one.
    let mut errors = changes.validation_errors();
    if changes.tags.as_deref().is_some_and(<[String]>::is_empty) {
        errors.push(ValidationError::TooFewTags);
    }
    if !errors.is_empty() {
        return Err(ServiceError::validation(errors));
    }

    let data = service.update(id, changes).await?.ok_or_else(not_found)?;
    Ok(success_response(StatusCode::OK, data))
}

async fn delete_snippet(
    service: SnippetService,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let id = snippet_id(id)?;
    if !service.delete(id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
