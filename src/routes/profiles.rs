/**
 * Profile Routes
 * The authenticated principal's own profile
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
use crate::db::models::Profile;
use crate::db::patch::{apply_patch, PROFILE_FIELDS};

/// GET /api/profiles - The caller's profile, as a one-element list
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DataResponse<Vec<Profile>>>, HandlerError> {
    let profile = state
        .store
        .profile_by_user_id(user_id)
        .await
        .map_err(|e| store_failure(e, "Get profiles error"))?;

    Ok(DataResponse::ok(profile.into_iter().collect()))
}

/// PATCH /api/profiles/:user_id - Update email, name, role or avatar
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<Map<String, Value>>,
) -> Result<Json<DataResponse<Profile>>, HandlerError> {
    if caller != user_id {
        return Err(error_reply(
            StatusCode::FORBIDDEN,
            "Cannot modify another user's profile",
        ));
    }

    let existing = state
        .store
        .profile_by_user_id(user_id)
        .await
        .map_err(|e| store_failure(e, "Update profile error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Profile not found"))?;

    let mut updated = apply_patch(&existing, &patch, PROFILE_FIELDS).map_err(patch_failure)?;
    // The hash is not part of the wire form, so the merge drops it.
    updated.password_hash = existing.password_hash;

    if !updated.email.contains('@') {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Invalid email format"));
    }

    let saved = state
        .store
        .save_profile(&updated)
        .await
        .map_err(|e| store_failure(e, "Update profile error"))?
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Profile not found"))?;

    Ok(DataResponse::ok(saved))
}

#[cfg(test)]
mod tests {
    use crate::routes::auth::verify_access_token;
    use crate::routes::test_support::{seeded_app, send, SECRET};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_profiles_require_token() {
        let (app, _) = seeded_app().await;
        let (status, body) = send(app, "GET", "/profiles", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_profiles_return_own_profile_without_hash() {
        let (app, token) = seeded_app().await;
        let (status, body) = send(app, "GET", "/profiles", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["email"], "admin@example.com");
        assert!(rows[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_given_fields() {
        let (app, token) = seeded_app().await;
        let user_id = verify_access_token(SECRET, &token).unwrap().id;

        let (status, body) = send(
            app,
            "PATCH",
            &format!("/profiles/{user_id}"),
            Some(&token),
            Some(json!({"full_name": "Jane Admin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["full_name"], "Jane Admin");
        assert_eq!(body["data"]["email"], "admin@example.com");
        assert_eq!(body["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn test_update_other_profile_is_forbidden() {
        let (app, token) = seeded_app().await;
        let (status, _) = send(
            app,
            "PATCH",
            &format!("/profiles/{}", uuid::Uuid::new_v4()),
            Some(&token),
            Some(json!({"full_name": "Mallory"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_read_only_field() {
        let (app, token) = seeded_app().await;
        let user_id = verify_access_token(SECRET, &token).unwrap().id;
        let (status, body) = send(
            app,
            "PATCH",
            &format!("/profiles/{user_id}"),
            Some(&token),
            Some(json!({"password_hash": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Field 'password_hash' cannot be updated");
    }
}
