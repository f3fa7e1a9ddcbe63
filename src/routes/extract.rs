/**
 * Request Extractors
 * `Json` and `Path` wrappers whose rejections use the shared error body
 */
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use super::{ErrorResponse, HandlerError};

fn rejection(status: axum::http::StatusCode, error: &str, detail: String) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: Some(detail),
        }),
    )
}

/// JSON request body. A missing, malformed or mistyped body is answered
/// with `{error, message}` instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(e) => Err(rejection(e.status(), "Invalid request body", e.body_text())),
        }
    }
}

/// Path parameters, rejected the same way as [`ApiJson`].
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(e) => Err(rejection(e.status(), "Invalid path parameter", e.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{seeded_app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (app, token) = seeded_app().await;
        let (status, body) = send(
            app,
            "POST",
            "/admin/blog-posts",
            Some(&token),
            Some(json!({"title": "No slug"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["message"].as_str().unwrap().contains("slug"));
    }

    #[tokio::test]
    async fn test_bad_id_is_json_error() {
        let (app, token) = seeded_app().await;
        let (status, body) = send(
            app,
            "DELETE",
            "/admin/portfolio-projects/not-a-uuid",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid path parameter");
    }
}
