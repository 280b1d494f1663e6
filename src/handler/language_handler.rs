use crate::handler::success_response;
use crate::language::Language;
use axum::{Router, http::StatusCode, response::Response, routing::get};
use serde::Serialize;

/// One entry of the language picker.
#[derive(Debug, Serialize)]
struct LanguageOption {
    id: &'static str,
    label: &'static str,
}

pub(crate) fn router() -> Router {
    Router::new().route("/languages", get(list_languages))
}

async fn list_languages() -> Response {
    let data: Vec<LanguageOption> = Language::ALL
        .iter()
        .map(|language| LanguageOption {
            id: language.id(),
            label: language.label(),
        })
        .collect();
    success_response(StatusCode::OK, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn lists_every_language_with_its_label() {
        let response = router()
            .oneshot(Request::builder().uri("/languages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), Language::ALL.len());
        assert_eq!(entries[0]["id"], "c-sharp");
        assert_eq!(entries[0]["label"], "C#");
        assert!(
            entries
                .iter()
                .any(|entry| entry["id"] == "shell-bash" && entry["label"] == "Shell/Bash")
        );
    }
}
