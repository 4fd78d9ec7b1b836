//! Application state shared across handlers.

use bloggle_shared::{BlogStore, Database, SessionStore, UserStore};

/// Store handles cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// User record manager.
    pub users: UserStore,
    /// Blog record manager.
    pub blogs: BlogStore,
    /// Session tokens.
    pub sessions: SessionStore,
}

impl AppState {
    /// Build the state over an open database.
    pub fn new(db: Database) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            blogs: BlogStore::new(db.clone()),
            sessions: SessionStore::new(db),
        }
    }
}
