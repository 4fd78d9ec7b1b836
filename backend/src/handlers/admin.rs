//! Administrative overlay: dashboards, moderation and force operations.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use bloggle_shared::blogs_store::BlogStats;
use bloggle_shared::models::{BlogFilter, BlogListItem, BlogStatus, ModerationStatus};
use bloggle_shared::users_store::{AdminUserItem, RecentUser};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the admin listings.
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    /// 1-based page, default 1.
    pub page: Option<usize>,
    /// Page size, default 10.
    pub limit: Option<usize>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// Lifecycle filter; `all` and empty mean no filter.
    pub status: Option<String>,
}

/// User dashboard counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    /// Total registered users.
    pub total_users: usize,
    /// The five most recent registrations.
    pub recent_users: Vec<RecentUser>,
}

/// Admin blog-listing envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBlogsResponse {
    /// Matching blogs, any status.
    pub blogs: Vec<BlogListItem>,
    /// Page count.
    pub total_pages: usize,
    /// Requested page.
    pub current_page: usize,
    /// Total matching blogs.
    pub total: usize,
}

/// Admin user-listing envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUsersResponse {
    /// Matching users with their blog counts.
    pub users: Vec<AdminUserItem>,
    /// Page count.
    pub total_pages: usize,
    /// Requested page.
    pub current_page: usize,
    /// Total matching users.
    pub total: usize,
}

/// Status update payload.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Requested status value.
    pub status: String,
}

/// Status update confirmation.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Confirmation text.
    pub message: String,
    /// Stored status value.
    pub status: String,
}

/// Site settings served to the admin dashboard. Static defaults; the PUT
/// endpoint echoes what it received and persists nothing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    /// Site name.
    pub site_name: String,
    /// Site description.
    pub site_description: String,
    /// Whether registration is open.
    pub allow_registration: bool,
    /// Whether email verification is required.
    pub require_email_verification: bool,
    /// Per-user blog cap.
    pub max_blogs_per_user: usize,
    /// Whether comments are enabled.
    pub enable_comments: bool,
    /// Whether likes are enabled.
    pub enable_likes: bool,
    /// Maintenance-mode flag.
    pub maintenance_mode: bool,
    /// Maintenance banner text.
    pub maintenance_message: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Bloggle".to_string(),
            site_description: "A modern blogging platform".to_string(),
            allow_registration: true,
            require_email_verification: false,
            max_blogs_per_user: 50,
            enable_comments: true,
            enable_likes: true,
            maintenance_mode: false,
            maintenance_message: "Site is under maintenance. Please check back later.".to_string(),
        }
    }
}

/// `GET /api/admin/blogs/stats`
pub async fn blog_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<BlogStats>, ApiError> {
    Ok(Json(state.blogs.stats()?))
}

/// `GET /api/admin/users/stats`
pub async fn user_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<UserStatsResponse>, ApiError> {
    Ok(Json(UserStatsResponse {
        total_users: state.users.count()?,
        recent_users: state.users.recent(5)?,
    }))
}

/// `GET /api/admin/blogs`: all blogs irrespective of status, with search
/// over title and excerpt.
pub async fn list_blogs(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<AdminBlogsResponse>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(raw) => Some(
            BlogStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?,
        ),
        None => None,
    };
    let filter = BlogFilter {
        status,
        search: query.search,
        search_content: false,
        ..BlogFilter::default()
    };
    let (page, limit) = (query.page.unwrap_or(1).max(1), query.limit.unwrap_or(10).max(1));
    let result = state.blogs.list(&filter, page, limit)?;
    Ok(Json(AdminBlogsResponse {
        blogs: result.items,
        total_pages: result.total_pages,
        current_page: result.page,
        total: result.total,
    }))
}

/// `PATCH /api/admin/blogs/:id/status`: draft and published only.
pub async fn set_blog_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(blog_id): Path<String>,
    Json(input): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = BlogStatus::parse(&input.status)
        .filter(|s| *s != BlogStatus::Archived)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;
    let stored = state.blogs.admin_set_status(&blog_id, status)?;
    Ok(Json(StatusResponse {
        message: "Blog status updated".to_string(),
        status: stored.as_str().to_string(),
    }))
}

/// `DELETE /api/admin/blogs/:id`: force delete, no author check.
pub async fn delete_blog(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(blog_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blogs.admin_delete(&blog_id)?;
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

/// `GET /api/admin/users`: every user, each carrying its blog count.
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<AdminUsersResponse>, ApiError> {
    let (page, limit) = (query.page.unwrap_or(1).max(1), query.limit.unwrap_or(10).max(1));
    let result = state.users.list(query.search.as_deref(), page, limit)?;
    Ok(Json(AdminUsersResponse {
        users: result.items,
        total_pages: result.total_pages,
        current_page: result.page,
        total: result.total,
    }))
}

/// `PATCH /api/admin/users/:id/status`: set the moderation flag. Stored
/// and reported; no serving path consults it.
pub async fn set_user_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
    Json(input): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = ModerationStatus::parse(&input.status)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;
    state.users.set_status(&user_id, status)?;
    Ok(Json(StatusResponse {
        message: "User status updated".to_string(),
        status: input.status,
    }))
}

/// `DELETE /api/admin/users/:id`: force delete with blog cascade; an
/// administrator cannot delete their own account on this path.
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.admin_delete(&admin.id, &user_id)?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// `GET /api/admin/settings`
pub async fn get_settings(
    AdminUser(_admin): AdminUser,
) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(SiteSettings::default()))
}

/// `PUT /api/admin/settings`: acknowledged but not persisted.
pub async fn update_settings(
    AdminUser(_admin): AdminUser,
    Json(settings): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!(?settings, "settings update acknowledged");
    Ok(Json(serde_json::json!({
        "message": "Settings updated successfully",
        "settings": settings,
    })))
}
