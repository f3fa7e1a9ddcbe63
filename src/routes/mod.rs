/**
 * Routes Module
 * API route handlers, shared state and response envelopes
 */

pub mod auth;
pub mod blog;
pub mod extract;
pub mod health;
pub mod portfolio;
pub mod profiles;
pub mod site_settings;

use axum::{
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::{patch::PatchError, SharedStore, StoreError};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub jwt_secret: Arc<str>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: SharedStore, jwt_secret: &str, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt_secret: Arc::from(jwt_secret),
            bcrypt_cost,
        }
    }
}

/// Success envelope: `{ "data": ..., "error": null }`
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { data, error: None })
    }
}

/// Error body shared by every route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn error_reply(status: StatusCode, error: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            message: None,
        }),
    )
}

/// Log a storage failure and turn it into a response.
pub fn store_failure(err: StoreError, context: &str) -> HandlerError {
    match err {
        StoreError::Conflict(message) => error_reply(StatusCode::CONFLICT, message),
        StoreError::Database(e) => {
            tracing::error!(error = %e, "{}", context);
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub fn patch_failure(err: PatchError) -> HandlerError {
    error_reply(StatusCode::BAD_REQUEST, err.to_string())
}

/// All `/api` routes, without middleware.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/update-password", post(auth::update_password))
        .route("/profiles", get(profiles::list_profiles))
        .route("/profiles/{user_id}", patch(profiles::update_profile))
        .route("/site-settings", get(site_settings::list_site_settings))
        .route("/site-settings/{id}", patch(site_settings::update_site_settings))
        .route("/portfolio-projects", get(portfolio::list_published))
        .route(
            "/admin/portfolio-projects",
            get(portfolio::list_all).post(portfolio::create_project),
        )
        .route(
            "/admin/portfolio-projects/{id}",
            patch(portfolio::update_project).delete(portfolio::delete_project),
        )
        .route("/blog-posts", get(blog::list_published))
        .route(
            "/admin/blog-posts",
            get(blog::list_all).post(blog::create_post),
        )
        .route(
            "/admin/blog-posts/{id}",
            patch(blog::update_post).delete(blog::delete_post),
        )
        .route("/health", get(health::health_ping))
        .route("/health/ready", get(health::health_ready))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::{seed, MemoryStore};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    pub const SECRET: &str = "test-secret";

    /// Router over a seeded memory store, plus a valid admin token.
    pub async fn seeded_app() -> (Router, String) {
        let store = MemoryStore::new();
        let admin = seed::seed_demo(&store, "admin@example.com", "admin", 4)
            .await
            .unwrap();
        let state = AppState::new(Arc::new(store), SECRET, 4);
        let token =
            auth::create_access_token(SECRET, &admin.user_id.to_string(), &admin.email).unwrap();
        (api_router().with_state(state), token)
    }

    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
            None => Body::empty(),
        };
        let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}
