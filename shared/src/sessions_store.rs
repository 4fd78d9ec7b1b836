//! Opaque session tokens.
//!
//! Tokens are random 32-byte hex strings handed out at registration and
//! login and presented back in the `x-auth-token` header. They carry no
//! claims; a row in the sessions table is the whole session.

use chrono::Utc;
use rand::RngCore;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

/// Handle to the sessions collection.
#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Create a store over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Issue a fresh token for a user.
    pub fn create(&self, user_id: &str) -> Result<String> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.db.conn().execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, Utc::now().timestamp_millis()],
        )?;
        Ok(token)
    }

    /// Resolve a token to its user id, if the session exists.
    pub fn lookup(&self, token: &str) -> Result<Option<String>> {
        let user_id: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1",
                params![token],
                |row| row.get(0),
            )
            .optional()?;
        Ok(user_id)
    }

    /// Drop a session. Unknown tokens are a no-op.
    pub fn revoke(&self, token: &str) -> Result<()> {
        self.db
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }
}
