//! Bloggle behavioral core.
//!
//! Two document collections (users and blogs) related by an author-id
//! reference, plus the validation, derivation and authorization rules that
//! govern them. The HTTP layer in `bloggle-backend` is a thin adapter over
//! the stores exposed here.

pub mod blogs_store;
pub mod database;
pub mod error;
pub mod models;
pub mod password;
pub mod sessions_store;
pub mod users_store;

pub use blogs_store::BlogStore;
pub use database::Database;
pub use error::{CoreError, Result};
pub use sessions_store::SessionStore;
pub use users_store::UserStore;
