//! Token-based authentication extractors.
//!
//! Callers present an opaque session token in the `x-auth-token` header.
//! [`AuthUser`] resolves it to a full user document; [`AdminUser`] adds the
//! administrator capability check (`role == admin OR isAdmin`).

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bloggle_shared::models::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// The authenticated caller.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;
        let user_id = state
            .sessions
            .lookup(token)
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("Token is not valid"))?;
        // A session may outlive its user only if the row delete raced us;
        // treat that the same as a bad token.
        let user = state
            .users
            .get(&user_id)
            .map_err(|_| ApiError::unauthorized("Token is not valid"))?;
        Ok(AuthUser(user))
    }
}

/// The authenticated caller, verified to be an administrator.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_administrator() {
            return Err(ApiError::forbidden());
        }
        Ok(AdminUser(user))
    }
}
