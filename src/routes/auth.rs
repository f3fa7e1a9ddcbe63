/**
 * Authentication Routes
 * JWT-based login and password change for site administrators
 */
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::ApiJson;
use super::{error_reply, store_failure, AppState, HandlerError};

/// Access token lifetime in hours
const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

// ============================================================================
// Types
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,    // Profile user_id
    pub email: String, // User email
    pub exp: i64,      // Expiry timestamp
    pub iat: i64,      // Issued at timestamp
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.id).ok()
    }
}

/// User info returned to the client and carried in the token payload
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create access token
pub fn create_access_token(
    secret: &str,
    user_id: &str,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        id: user_id.to_string(),
        email: email.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode access token
pub fn verify_access_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Guard for bearer-only routes: 401 without a token, 403 with a bad one.
pub fn verify_auth(state: &AppState, headers: &HeaderMap) -> Result<Claims, HandlerError> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| error_reply(StatusCode::UNAUTHORIZED, "Authorization required"))?;

    verify_access_token(&state.jwt_secret, token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        error_reply(StatusCode::FORBIDDEN, "Invalid or expired token")
    })
}

/// Like [`verify_auth`], but also resolves the caller's user id.
pub fn authenticated_user(state: &AppState, headers: &HeaderMap) -> Result<Uuid, HandlerError> {
    verify_auth(state, headers)?
        .user_id()
        .ok_or_else(|| error_reply(StatusCode::FORBIDDEN, "Invalid or expired token"))
}

/// The caller of a bearer-only route. List it before `Path` and `Json`
/// arguments so the token is checked before the request is parsed.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = HandlerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticated_user(state, &parts.headers).map(AuthUser)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
/// Authenticate with email and password and receive an access token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(error_reply(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    }
    if !payload.email.contains('@') {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Invalid email format"));
    }

    let profile = state
        .store
        .find_profile_by_email(&payload.email)
        .await
        .map_err(|e| store_failure(e, "Login error"))?;

    let Some(profile) = profile else {
        tracing::warn!(email = %payload.email, "login attempt for unknown email");
        return Err(error_reply(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };

    // bcrypt is CPU-bound; keep it off the async executor.
    let password_hash = profile.password_hash.clone();
    let password = payload.password;
    let valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })?
        .unwrap_or(false);

    if !valid {
        tracing::warn!(email = %profile.email, "login attempt with wrong password");
        return Err(error_reply(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    let user_id = profile.user_id.to_string();
    let token = create_access_token(&state.jwt_secret, &user_id, &profile.email).map_err(|e| {
        tracing::error!(error = %e, "failed to sign access token");
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    tracing::info!(user_id = %user_id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            id: user_id,
            email: profile.email,
        },
    }))
}

/// POST /api/auth/update-password
/// Replace the caller's password hash
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if payload.password.is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Password is required"));
    }

    let cost = state.bcrypt_cost;
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .ok()
        .and_then(|r| r.ok())
        .ok_or_else(|| {
            tracing::error!("failed to hash new password");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })?;

    let updated = state
        .store
        .set_password_hash(user_id, &password_hash)
        .await
        .map_err(|e| store_failure(e, "Update password error"))?;

    if !updated {
        return Err(error_reply(StatusCode::NOT_FOUND, "Profile not found"));
    }

    tracing::info!(user_id = %user_id, "password updated");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
