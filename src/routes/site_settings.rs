/**
 * Site Settings Routes
 * The singleton hero/about/contact configuration row
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
use crate::db::models::SiteSettings;
use crate::db::patch::{apply_patch, SITE_SETTINGS_FIELDS};

/// GET /api/site-settings - At most one row, public
pub async fn list_site_settings(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<SiteSettings>>>, HandlerError> {
    let settings = state
        .store
        .site_settings()
        .await
        .map_err(|e| store_failure(e, "Get site settings error"))?;

    Ok(DataResponse::ok(settings.into_iter().collect()))
}

/// PATCH /api/site-settings/:id - Update settings, stamping `updated_by`
pub async fn update_site_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<DataResponse<SiteSettings>>, HandlerError> {
    let existing = state
        .store
        .site_settings()
        .await
        .map_err(|e| store_failure(e, "Update site settings error"))?
        .filter(|s| s.id == id)
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Site settings not found"))?;

    let mut updated =
        apply_patch(&existing, &patch, SITE_SETTINGS_FIELDS).map_err(patch_failure)?;
    updated.updated_by = Some(user_id);

    let saved = state
        .store
        .save_site_settings(&updated)
        .await
        .map_err(|e| store_failure(e, "Update site settings error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Site settings not found"))?;

    tracing::info!(user_id = %user_id, fields = patch.len(), "site settings updated");

    Ok(DataResponse::ok(saved))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{seeded_app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_site_settings_are_public_singleton() {
        let (app, _) = seeded_app().await;
        let (status, body) = send(app, "GET", "/site-settings", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_update_site_settings_stamps_editor() {
        let (app, token) = seeded_app().await;
        let (_, body) = send(app.clone(), "GET", "/site-settings", None, None).await;
        let id = body["data"][0]["id"].as_str().unwrap().to_string();
        let hero_subtitle = body["data"][0]["hero_subtitle"].clone();

        let (status, body) = send(
            app,
            "PATCH",
            &format!("/site-settings/{id}"),
            Some(&token),
            Some(json!({"hero_title": "New title", "years_experience": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["hero_title"], "New title");
        assert_eq!(body["data"]["years_experience"], 10);
        assert_eq!(body["data"]["hero_subtitle"], hero_subtitle);
        assert!(body["data"]["updated_by"].is_string());
    }

    #[tokio::test]
    async fn test_update_site_settings_empty_patch_is_bad_request() {
        let (app, token) = seeded_app().await;
        let (_, body) = send(app.clone(), "GET", "/site-settings", None, None).await;
        let id = body["data"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            app,
            "PATCH",
            &format!("/site-settings/{id}"),
            Some(&token),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");
    }

    #[tokio::test]
    async fn test_update_unknown_settings_row_is_not_found() {
        let (app, token) = seeded_app().await;
        let (status, _) = send(
            app,
            "PATCH",
            &format!("/site-settings/{}", uuid::Uuid::new_v4()),
            Some(&token),
            Some(json!({"hero_title": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
