//! Profile, social-graph and account endpoints.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use bloggle_shared::models::{
    BlogFilter, BlogListItem, BlogStatus, FollowOutcome, ProfilePatch, PublicProfile,
};
use serde::{Deserialize, Serialize};

use super::{MessageResponse, PageQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Avatar update payload.
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// New avatar URL.
    pub avatar: String,
}

/// Avatar update confirmation.
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    /// Stored avatar URL.
    pub avatar: String,
}

/// Password change payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    /// Current plaintext password, verified first.
    pub current_password: String,
    /// Replacement password, at least 6 chars.
    pub new_password: String,
}

/// Paginated blog list for a single author.
#[derive(Debug, Serialize)]
pub struct UserBlogsResponse {
    /// Matching blogs, newest first, without bodies.
    pub blogs: Vec<BlogListItem>,
    /// Envelope counts.
    pub pagination: UserBlogsPagination,
}

/// Pagination block of [`UserBlogsResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBlogsPagination {
    /// Requested page.
    pub current_page: usize,
    /// Page count.
    pub total_pages: usize,
    /// Total matching blogs.
    pub total_blogs: usize,
}

/// `GET /api/users/profile`
pub async fn get_profile(AuthUser(user): AuthUser) -> Result<Json<PublicProfile>, ApiError> {
    Ok(Json(user.public_profile(Some(&user.id))?))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<PublicProfile>, ApiError> {
    let updated = state.users.update_profile(&user.id, &patch)?;
    Ok(Json(updated.public_profile(Some(&user.id))?))
}

/// `PUT /api/users/avatar`
pub async fn update_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let updated = state.users.update_avatar(&user.id, &input.avatar)?;
    Ok(Json(AvatarResponse {
        avatar: updated.avatar,
    }))
}

/// `PUT /api/users/password`
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<PasswordChangeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .users
        .change_password(&user.id, &input.current_password, &input.new_password)?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// `GET /api/users/:id`: public profile by username. Private profiles are
/// visible to their owner only.
pub async fn get_public_profile(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    let user = state.users.find_by_username(&username)?;
    let requester_id = requester.as_ref().map(|AuthUser(u)| u.id.as_str());
    Ok(Json(user.public_profile(requester_id)?))
}

/// `GET /api/users/:id/blogs`: a user's published blogs, by username.
pub async fn blogs_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserBlogsResponse>, ApiError> {
    let user = state.users.find_by_username(&username)?;
    let filter = BlogFilter {
        author: Some(user.id),
        status: Some(BlogStatus::Published),
        ..BlogFilter::default()
    };
    let page = state.blogs.list(&filter, query.page(), query.limit())?;
    Ok(Json(UserBlogsResponse {
        blogs: page.items,
        pagination: UserBlogsPagination {
            current_page: page.page,
            total_pages: page.total_pages,
            total_blogs: page.total,
        },
    }))
}

/// `POST /api/users/:id/follow`: symmetric follow toggle, by user id.
pub async fn toggle_follow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(target_id): Path<String>,
) -> Result<Json<FollowOutcome>, ApiError> {
    Ok(Json(state.users.toggle_follow(&user.id, &target_id)?))
}

/// `DELETE /api/users`: self-service account deletion, cascading to all
/// authored blogs.
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete_account(&user.id)?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
