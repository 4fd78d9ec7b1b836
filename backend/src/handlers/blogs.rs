//! Blog content, engagement and listing endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use bloggle_shared::models::{
    BlogFilter, BlogListItem, BlogPatch, BlogStatus, BlogView, CommentView, LikeOutcome,
    NewBlogInput,
};
use serde::{Deserialize, Serialize};

use super::users::{UserBlogsPagination, UserBlogsResponse};
use super::MessageResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the public listing.
#[derive(Debug, Deserialize)]
pub struct PublicListQuery {
    /// 1-based page, default 1.
    pub page: Option<usize>,
    /// Page size, default 10.
    pub limit: Option<usize>,
    /// Case-insensitive substring search over title, excerpt and body.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact tag match.
    pub tag: Option<String>,
}

/// Query parameters of the authenticated "mine" listing.
#[derive(Debug, Deserialize)]
pub struct MyBlogsQuery {
    /// 1-based page, default 1.
    pub page: Option<usize>,
    /// Page size, default 10.
    pub limit: Option<usize>,
    /// Optional lifecycle filter.
    pub status: Option<String>,
}

/// Public listing envelope.
#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    /// Matching blogs, newest first, without bodies.
    pub blogs: Vec<BlogListItem>,
    /// Envelope counts.
    pub pagination: BlogListPagination,
}

/// Pagination block of [`BlogListResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListPagination {
    /// Requested page.
    pub current_page: usize,
    /// Page count.
    pub total_pages: usize,
    /// Total matching blogs.
    pub total_blogs: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// Comment payload.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// Comment body, 1-1000 chars.
    pub content: String,
}

fn envelope(page: bloggle_shared::models::Page<BlogListItem>, limit: usize) -> BlogListResponse {
    BlogListResponse {
        pagination: BlogListPagination {
            current_page: page.page,
            total_pages: page.total_pages,
            total_blogs: page.total,
            has_next: page.page.saturating_mul(limit) < page.total,
            has_prev: page.page > 1,
        },
        blogs: page.items,
    }
}

fn user_envelope(page: bloggle_shared::models::Page<BlogListItem>) -> UserBlogsResponse {
    UserBlogsResponse {
        pagination: UserBlogsPagination {
            current_page: page.page,
            total_pages: page.total_pages,
            total_blogs: page.total,
        },
        blogs: page.items,
    }
}

/// `GET /api/blogs`: published blogs only, with search and filters.
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let filter = BlogFilter {
        status: Some(BlogStatus::Published),
        search: query.search,
        search_content: true,
        category: query.category,
        tag: query.tag,
        author: None,
    };
    let (page, limit) = (query.page.unwrap_or(1).max(1), query.limit.unwrap_or(10).max(1));
    let result = state.blogs.list(&filter, page, limit)?;
    Ok(Json(envelope(result, limit)))
}

/// `GET /api/blogs/user/:id`: a user's published blogs, by user id.
pub async fn blogs_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<super::PageQuery>,
) -> Result<Json<UserBlogsResponse>, ApiError> {
    let filter = BlogFilter {
        author: Some(user_id),
        status: Some(BlogStatus::Published),
        ..BlogFilter::default()
    };
    let result = state.blogs.list(&filter, query.page(), query.limit())?;
    Ok(Json(user_envelope(result)))
}

/// `GET /api/blogs/me`: the caller's own blogs, any status.
pub async fn my_blogs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<MyBlogsQuery>,
) -> Result<Json<UserBlogsResponse>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            BlogStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?,
        ),
        None => None,
    };
    let filter = BlogFilter {
        author: Some(user.id),
        status,
        ..BlogFilter::default()
    };
    let (page, limit) = (query.page.unwrap_or(1).max(1), query.limit.unwrap_or(10).max(1));
    let result = state.blogs.list(&filter, page, limit)?;
    Ok(Json(user_envelope(result)))
}

/// `GET /api/blogs/:id`: public read; 404 for missing and unpublished
/// alike, and the view counter moves by one.
pub async fn get_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> Result<Json<BlogView>, ApiError> {
    Ok(Json(state.blogs.get_public(&blog_id)?))
}

/// `GET /api/blogs/:id/edit`: author-only full read, any status.
pub async fn get_blog_for_edit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(blog_id): Path<String>,
) -> Result<Json<BlogView>, ApiError> {
    Ok(Json(state.blogs.get_for_edit(&blog_id, &user.id)?))
}

/// `POST /api/blogs`
pub async fn create_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<NewBlogInput>,
) -> Result<(StatusCode, Json<BlogView>), ApiError> {
    let view = state.blogs.create(&user.id, &input)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `PUT /api/blogs/:id`: author-only partial update.
pub async fn update_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(blog_id): Path<String>,
    Json(patch): Json<BlogPatch>,
) -> Result<Json<BlogView>, ApiError> {
    Ok(Json(state.blogs.update(&blog_id, &user.id, &patch)?))
}

/// `DELETE /api/blogs/:id`: author-only.
pub async fn delete_blog(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(blog_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blogs.delete(&blog_id, &user.id)?;
    Ok(Json(MessageResponse::new("Blog removed")))
}

/// `POST /api/blogs/:id/like`: toggle the caller's like.
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(blog_id): Path<String>,
) -> Result<Json<LikeOutcome>, ApiError> {
    Ok(Json(state.blogs.toggle_like(&blog_id, &user.id)?))
}

/// `POST /api/blogs/:id/comment`: append a comment, newest first.
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(blog_id): Path<String>,
    Json(input): Json<CommentRequest>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    Ok(Json(state.blogs.add_comment(&blog_id, &user.id, &input.content)?))
}
