/**
 * Portfolio Routes
 * Public project listing and admin CRUD for portfolio projects
 */
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::auth::AuthUser;
use super::extract::{ApiJson, ApiPath};
use super::{error_reply, patch_failure, store_failure, AppState, DataResponse, HandlerError};
use crate::db::models::{NewPortfolioProject, PortfolioProject};
use crate::db::patch::{apply_patch, PROJECT_FIELDS};

// ============================================================================
// Validation
// ============================================================================

fn validate_project(title: &str, description: &str) -> Result<(), HandlerError> {
    if title.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Title is required"));
    }
    if description.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Description is required"));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/portfolio-projects - Published projects by sort_order
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<PortfolioProject>>>, HandlerError> {
    let projects = state
        .store
        .list_projects(true)
        .await
        .map_err(|e| store_failure(e, "Get portfolio projects error"))?;
    Ok(DataResponse::ok(projects))
}

/// GET /api/admin/portfolio-projects - Every project (auth required)
pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<DataResponse<Vec<PortfolioProject>>>, HandlerError> {
    let projects = state
        .store
        .list_projects(false)
        .await
        .map_err(|e| store_failure(e, "Get portfolio projects admin error"))?;
    Ok(DataResponse::ok(projects))
}

/// POST /api/admin/portfolio-projects - Create project (auth required)
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<NewPortfolioProject>,
) -> Result<Json<DataResponse<PortfolioProject>>, HandlerError> {
    validate_project(&payload.title, &payload.description)?;

    let project = PortfolioProject::from_new(payload, Some(user_id));
    let created = state
        .store
        .insert_project(&project)
        .await
        .map_err(|e| store_failure(e, "Create portfolio project error"))?;

    tracing::info!(project_id = %created.id, "portfolio project created");
    Ok(DataResponse::ok(created))
}

/// PATCH /api/admin/portfolio-projects/:id - Partial update (auth required)
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<DataResponse<PortfolioProject>>, HandlerError> {
    let existing = state
        .store
        .project(id)
        .await
        .map_err(|e| store_failure(e, "Update portfolio project error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Project not found"))?;

    let updated = apply_patch(&existing, &patch, PROJECT_FIELDS).map_err(patch_failure)?;
    validate_project(&updated.title, &updated.description)?;

    let saved = state
        .store
        .save_project(&updated)
        .await
        .map_err(|e| store_failure(e, "Update portfolio project error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Project not found"))?;

    Ok(DataResponse::ok(saved))
}

/// DELETE /api/admin/portfolio-projects/:id - Delete project (auth required)
///
/// Deleting an id that does not exist still succeeds.
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<Option<PortfolioProject>>>, HandlerError> {
    let removed = state
        .store
        .delete_project(id)
        .await
        .map_err(|e| store_failure(e, "Delete portfolio project error"))?;
    if removed {
        tracing::info!(project_id = %id, "portfolio project deleted");
    }
    Ok(DataResponse::ok(None))
}
