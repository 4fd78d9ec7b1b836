//! Idempotent admin-account bootstrap.

use std::path::Path;

use anyhow::Result;
use bloggle_shared::{models::RegisterInput, Database, UserStore};

/// Create the admin account, or report the one that already exists.
pub fn run(db_path: &Path, email: &str, username: &str, password: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    let users = UserStore::new(db);

    let existing = users.list(None, 1, usize::MAX)?;
    if let Some(admin) = existing
        .items
        .iter()
        .find(|item| item.user.is_administrator() || item.user.email == email.to_lowercase())
    {
        tracing::info!(
            username = %admin.user.username,
            email = %admin.user.email,
            role = ?admin.user.role,
            "Admin user already exists"
        );
        return Ok(());
    }

    let created = users.register(&RegisterInput {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })?;
    let admin = users.promote_to_admin(&created.id)?;

    tracing::info!(
        username = %admin.username,
        email = %admin.email,
        "Admin user created successfully"
    );
    Ok(())
}
