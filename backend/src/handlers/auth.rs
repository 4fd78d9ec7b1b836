//! Registration, login and session endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use bloggle_shared::models::{PublicProfile, RegisterInput};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::auth::{AuthUser, AUTH_HEADER};
use crate::error::ApiError;
use crate::state::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful register/login body: the owner's projection plus a session
/// token for the `x-auth-token` header.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Owner view of the account.
    pub user: PublicProfile,
    /// Opaque session token.
    pub token: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state.users.register(&input)?;
    let token = state.sessions.create(&user.id)?;
    let profile = user.public_profile(Some(&user.id))?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: profile,
            token,
        }),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.users.authenticate(&input.email, &input.password)?;
    let token = state.sessions.create(&user.id)?;
    let profile = user.public_profile(Some(&user.id))?;
    Ok(Json(AuthResponse {
        user: profile,
        token,
    }))
}

/// `GET /api/auth/me`
pub async fn me(AuthUser(user): AuthUser) -> Result<Json<PublicProfile>, ApiError> {
    let profile = user.public_profile(Some(&user.id))?;
    Ok(Json(profile))
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(token) = headers.get(AUTH_HEADER).and_then(|value| value.to_str().ok()) {
        state.sessions.revoke(token.trim())?;
    }
    Ok(Json(MessageResponse::new("Logged out")))
}
