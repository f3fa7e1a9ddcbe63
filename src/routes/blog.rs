/**
 * Blog Routes
 * Public listing of published posts and admin CRUD
 */
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::auth::AuthUser;
use super::extract::{ApiJson, ApiPath};
use super::{error_reply, patch_failure, store_failure, AppState, DataResponse, HandlerError};
use crate::db::models::{BlogPost, NewBlogPost, PostStatus};
use crate::db::patch::{apply_patch, POST_FIELDS};

// ============================================================================
// Validation
// ============================================================================

lazy_static::lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Sanitize HTML content using ammonia
fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

fn validate_post(title: &str, slug: &str) -> Result<(), HandlerError> {
    if title.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Title is required"));
    }
    if slug.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Slug is required"));
    }
    if !is_valid_slug(slug) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(super::ErrorResponse {
                error: "Invalid slug".to_string(),
                message: Some(
                    "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
                ),
            }),
        ));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blog-posts - Published posts, newest first
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<BlogPost>>>, HandlerError> {
    let posts = state
        .store
        .list_posts(true)
        .await
        .map_err(|e| store_failure(e, "Get blog posts error"))?;
    Ok(DataResponse::ok(posts))
}

/// GET /api/admin/blog-posts - Posts of every status (auth required)
pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<DataResponse<Vec<BlogPost>>>, HandlerError> {
    let posts = state
        .store
        .list_posts(false)
        .await
        .map_err(|e| store_failure(e, "Get blog posts admin error"))?;
    Ok(DataResponse::ok(posts))
}

/// POST /api/admin/blog-posts - Create post (auth required)
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(mut payload): ApiJson<NewBlogPost>,
) -> Result<Json<DataResponse<BlogPost>>, HandlerError> {
    validate_post(&payload.title, &payload.slug)?;

    payload.content = sanitize_html(&payload.content);
    let post = BlogPost::from_new(payload, Some(user_id));

    let created = state
        .store
        .insert_post(&post)
        .await
        .map_err(|e| store_failure(e, "Create blog post error"))?;

    tracing::info!(post_id = %created.id, slug = %created.slug, "blog post created");
    Ok(DataResponse::ok(created))
}

/// PATCH /api/admin/blog-posts/:id - Partial update (auth required)
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<DataResponse<BlogPost>>, HandlerError> {
    let existing = state
        .store
        .post(id)
        .await
        .map_err(|e| store_failure(e, "Update blog post error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Blog post not found"))?;

    let mut updated = apply_patch(&existing, &patch, POST_FIELDS).map_err(patch_failure)?;
    validate_post(&updated.title, &updated.slug)?;

    if patch.contains_key("content") {
        updated.content = sanitize_html(&updated.content);
    }
    // First transition to published stamps the publication time.
    if updated.status == PostStatus::Published && updated.published_at.is_none() {
        updated.published_at = Some(Utc::now());
    }

    let saved = state
        .store
        .save_post(&updated)
        .await
        .map_err(|e| store_failure(e, "Update blog post error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Blog post not found"))?;

    Ok(DataResponse::ok(saved))
}

/// DELETE /api/admin/blog-posts/:id - Delete post (auth required)
///
/// Deleting an id that does not exist still succeeds.
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<Option<BlogPost>>>, HandlerError> {
    let removed = state
        .store
        .delete_post(id)
        .await
        .map_err(|e| store_failure(e, "Delete blog post error"))?;
    if removed {
        tracing::info!(post_id = %id, "blog post deleted");
    }
    Ok(DataResponse::ok(None))
}
