//! Route table.

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, patch, post, put};
use axum::{middleware, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ErrorResponse;
use crate::handlers;
use crate::request_context::request_context_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Blogs
        .route(
            "/api/blogs",
            get(handlers::blogs::list_blogs).post(handlers::blogs::create_blog),
        )
        .route("/api/blogs/me", get(handlers::blogs::my_blogs))
        .route("/api/blogs/user/:id", get(handlers::blogs::blogs_by_user))
        .route(
            "/api/blogs/:id",
            get(handlers::blogs::get_blog)
                .put(handlers::blogs::update_blog)
                .delete(handlers::blogs::delete_blog),
        )
        .route("/api/blogs/:id/edit", get(handlers::blogs::get_blog_for_edit))
        .route("/api/blogs/:id/like", post(handlers::blogs::toggle_like))
        .route("/api/blogs/:id/comment", post(handlers::blogs::add_comment))
        // Users
        .route(
            "/api/users",
            delete(handlers::users::delete_account),
        )
        .route(
            "/api/users/profile",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
        .route("/api/users/avatar", put(handlers::users::update_avatar))
        .route("/api/users/password", put(handlers::users::change_password))
        .route("/api/users/:id", get(handlers::users::get_public_profile))
        .route("/api/users/:id/blogs", get(handlers::users::blogs_by_username))
        .route("/api/users/:id/follow", post(handlers::users::toggle_follow))
        // Admin
        .route("/api/admin/blogs/stats", get(handlers::admin::blog_stats))
        .route("/api/admin/users/stats", get(handlers::admin::user_stats))
        .route("/api/admin/blogs", get(handlers::admin::list_blogs))
        .route(
            "/api/admin/blogs/:id/status",
            patch(handlers::admin::set_blog_status),
        )
        .route("/api/admin/blogs/:id", delete(handlers::admin::delete_blog))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/:id/status",
            patch(handlers::admin::set_user_status),
        )
        .route("/api/admin/users/:id", delete(handlers::admin::delete_user))
        .route(
            "/api/admin/settings",
            get(handlers::admin::get_settings).put(handlers::admin::update_settings),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(request_context_middleware))
        .layer(cors)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bloggle API is running!" }))
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".to_string(),
            code: 404,
        }),
    )
}
