//! Bloggle REST API: axum routing and handlers over the `bloggle-shared`
//! record managers.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod request_context;
pub mod routes;
pub mod state;
