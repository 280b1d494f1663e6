use crate::handler::{json_body, success_response};
use crate::highlight::{Theme, highlight};
use crate::service::error::ServiceError;
use axum::{
    Json, Router, extract::rejection::JsonRejection, http::StatusCode, response::Response,
    routing::post,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct HighlightRequest {
    content: Option<String>,
    language: Option<String>,
    theme: Option<String>,
}

#[derive(Debug, Serialize)]
struct HighlightResponse {
    html: String,
}

pub(crate) fn router() -> Router {
    Router::new().route(
        "/codeblock/highlight",
        post(|payload: Result<Json<HighlightRequest>, JsonRejection>| highlight_code(payload)),
    )
}

fn parse_theme(raw: Option<&str>) -> Result<Theme, ServiceError> {
    match raw {
        Some("dark") => Ok(Theme::Dark),
        Some("light") => Ok(Theme::Light),
        _ => Err(ServiceError::bad_request(
            "Invalid input: theme must be \"dark\" or \"light\"",
        )),
    }
}

async fn highlight_code(
    payload: Result<Json<HighlightRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let request = json_body(payload)?;
    let content = request.content.filter(|content| !content.is_empty()).ok_or_else(|| {
        ServiceError::bad_request("Invalid input: content is required and must be a string")
    })?;
    let language = request.language.filter(|language| !language.is_empty()).ok_or_else(|| {
        ServiceError::bad_request("Invalid input: language is required and must be a string")
    })?;
    let theme = parse_theme(request.theme.as_deref())?;

    let html = highlight(&content, &language, theme);
    Ok(success_response(StatusCode::OK, HighlightResponse { html }))
}
