//! The user record manager: credential issuance and verification, profile
//! mutation, the social graph, and account deletion with its blog cascade.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{CoreError, Result};
use crate::models::{
    validate_email, validate_password, validate_username, FollowOutcome, ModerationStatus, Page,
    ProfilePatch, RegisterInput, Role, User,
};
use crate::password;

/// Maximum bio length.
const BIO_MAX: usize = 200;
/// Maximum location length.
const LOCATION_MAX: usize = 100;
/// Maximum website URL length.
const WEBSITE_MAX: usize = 200;

/// An admin-listing row: the full user document plus the number of blogs
/// the user has authored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    /// The user document.
    #[serde(flatten)]
    pub user: User,
    /// Number of authored blogs, any status.
    pub blog_count: usize,
}

/// Slim row for the admin dashboard's recent-users panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    /// Handle.
    pub username: String,
    /// Address.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Handle to the users collection.
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    /// Create a store over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Registration and credentials
    // ------------------------------------------------------------------

    /// Register a new user with a hashed password and default settings.
    pub fn register(&self, input: &RegisterInput) -> Result<User> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        let email = input.email.to_lowercase();
        if self.username_taken(&input.username, None)? {
            return Err(CoreError::validation("Username is already taken"));
        }
        if self.email_taken(&email)? {
            return Err(CoreError::validation("Email is already registered"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: input.username.clone(),
            email,
            bio: String::new(),
            location: String::new(),
            website: String::new(),
            avatar: String::new(),
            role: Role::User,
            is_admin: false,
            status: ModerationStatus::Active,
            notifications: true,
            newsletter: false,
            privacy: crate::models::Privacy::Public,
            show_email: false,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let hash = password::hash_password(&input.password)?;
        self.db.conn().execute(
            "INSERT INTO users (id, username, email, password_hash, created_at, doc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.username,
                user.email,
                hash,
                now.timestamp_millis(),
                serde_json::to_string(&user)?,
            ],
        )?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verify credentials for login. Any failure (unknown email or wrong
    /// password) yields the same generic [`CoreError::Auth`].
    pub fn authenticate(&self, email: &str, candidate_password: &str) -> Result<User> {
        let email = email.to_lowercase();
        let row: Option<(String, String)> = self
            .db
            .conn()
            .query_row(
                "SELECT password_hash, doc FROM users WHERE email = ?1",
                params![email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((hash, doc)) = row else {
            return Err(CoreError::auth("Invalid credentials"));
        };
        if !password::verify_password(candidate_password, &hash) {
            return Err(CoreError::auth("Invalid credentials"));
        }
        Ok(serde_json::from_str(&doc)?)
    }

    /// Change the password after verifying the current one.
    pub fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let hash: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT password_hash FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(hash) = hash else {
            return Err(CoreError::not_found("User not found"));
        };
        if !password::verify_password(current_password, &hash) {
            return Err(CoreError::auth("Current password is incorrect"));
        }
        validate_password(new_password)?;
        let new_hash = password::hash_password(new_password)?;
        self.db.conn().execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![new_hash, user_id],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Fetch a user by id.
    pub fn get(&self, user_id: &str) -> Result<User> {
        self.find_doc("SELECT doc FROM users WHERE id = ?1", user_id)
    }

    /// Fetch a user by username.
    pub fn find_by_username(&self, username: &str) -> Result<User> {
        self.find_doc("SELECT doc FROM users WHERE username = ?1", username)
    }

    fn find_doc(&self, sql: &str, key: &str) -> Result<User> {
        let doc: Option<String> = self
            .db
            .conn()
            .query_row(sql, params![key], |row| row.get(0))
            .optional()?;
        match doc {
            Some(doc) => Ok(serde_json::from_str(&doc)?),
            None => Err(CoreError::not_found("User not found")),
        }
    }

    // ------------------------------------------------------------------
    // Profile mutation
    // ------------------------------------------------------------------

    /// Apply a partial profile update. Only supplied fields change; a
    /// changed username is re-checked for uniqueness first.
    pub fn update_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<User> {
        let mut user = self.get(user_id)?;

        if let Some(username) = patch.username.as_deref() {
            // Empty string behaves like an absent field.
            if !username.is_empty() && username != user.username {
                validate_username(username)?;
                if self.username_taken(username, Some(user_id))? {
                    return Err(CoreError::validation("Username is already taken"));
                }
                user.username = username.to_string();
            }
        }
        if let Some(bio) = patch.bio.as_deref() {
            if bio.chars().count() > BIO_MAX {
                return Err(CoreError::validation("Bio cannot exceed 200 characters"));
            }
            user.bio = bio.to_string();
        }
        if let Some(location) = patch.location.as_deref() {
            if location.chars().count() > LOCATION_MAX {
                return Err(CoreError::validation(
                    "Location cannot exceed 100 characters",
                ));
            }
            user.location = location.to_string();
        }
        if let Some(website) = patch.website.as_deref() {
            if website.chars().count() > WEBSITE_MAX {
                return Err(CoreError::validation(
                    "Website URL cannot exceed 200 characters",
                ));
            }
            user.website = website.to_string();
        }
        if let Some(notifications) = patch.notifications {
            user.notifications = notifications;
        }
        if let Some(newsletter) = patch.newsletter {
            user.newsletter = newsletter;
        }
        if let Some(privacy) = patch.privacy {
            user.privacy = privacy;
        }
        if let Some(show_email) = patch.show_email {
            user.show_email = show_email;
        }

        user.updated_at = Utc::now();
        self.save(&user)?;
        Ok(user)
    }

    /// Replace the avatar URL.
    pub fn update_avatar(&self, user_id: &str, avatar: &str) -> Result<User> {
        if !avatar.starts_with("http://") && !avatar.starts_with("https://") {
            return Err(CoreError::validation("Please provide a valid avatar URL"));
        }
        let mut user = self.get(user_id)?;
        user.avatar = avatar.to_string();
        user.updated_at = Utc::now();
        self.save(&user)?;
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Social graph
    // ------------------------------------------------------------------

    /// Symmetric follow toggle: both user documents are updated together
    /// inside one transaction.
    pub fn toggle_follow(&self, follower_id: &str, target_id: &str) -> Result<FollowOutcome> {
        if follower_id == target_id {
            return Err(CoreError::validation("You cannot follow yourself"));
        }
        let mut target = self.get(target_id)?;
        let mut follower = self.get(follower_id)?;

        let was_following = follower.following.iter().any(|id| id == target_id);
        if was_following {
            follower.following.retain(|id| id != target_id);
            target.followers.retain(|id| id != follower_id);
        } else {
            follower.following.push(target_id.to_string());
            target.followers.push(follower_id.to_string());
        }
        let now = Utc::now();
        follower.updated_at = now;
        target.updated_at = now;

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE users SET doc = ?1 WHERE id = ?2",
            params![serde_json::to_string(&follower)?, follower.id],
        )?;
        tx.execute(
            "UPDATE users SET doc = ?1 WHERE id = ?2",
            params![serde_json::to_string(&target)?, target.id],
        )?;
        tx.commit()?;

        Ok(FollowOutcome {
            is_following: !was_following,
            following_count: follower.following.len(),
            followers_count: target.followers.len(),
        })
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Self-service account deletion: all authored blogs go first, then the
    /// user and their sessions, in one transaction.
    pub fn delete_account(&self, user_id: &str) -> Result<()> {
        self.cascade_delete(user_id)
    }

    /// Administrative account deletion. Blocked for the administrator's own
    /// account; the self-service path above carries no such restriction.
    pub fn admin_delete(&self, admin_id: &str, target_id: &str) -> Result<()> {
        // Missing target reports not-found before the self check.
        let target = self.get(target_id)?;
        if target.id == admin_id {
            return Err(CoreError::validation("Cannot delete your own account"));
        }
        self.cascade_delete(target_id)
    }

    fn cascade_delete(&self, user_id: &str) -> Result<()> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        let blogs = tx.execute("DELETE FROM blogs WHERE author = ?1", params![user_id])?;
        tx.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
        let users = tx.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        tx.commit()?;
        if users == 0 {
            return Err(CoreError::not_found("User not found"));
        }
        tracing::info!(user_id, cascaded_blogs = blogs, "account deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Set the moderation status flag. The flag is stored and reported but
    /// not consulted by any serving path.
    pub fn set_status(&self, user_id: &str, status: ModerationStatus) -> Result<ModerationStatus> {
        let mut user = self.get(user_id)?;
        user.status = status;
        user.updated_at = Utc::now();
        self.save(&user)?;
        Ok(status)
    }

    /// Grant administrator capability (both the role and the redundant
    /// stored flag). Used by the operator CLI.
    pub fn promote_to_admin(&self, user_id: &str) -> Result<User> {
        let mut user = self.get(user_id)?;
        user.role = Role::Admin;
        user.is_admin = true;
        user.updated_at = Utc::now();
        self.save(&user)?;
        Ok(user)
    }

    /// Admin listing: newest first, optional case-insensitive substring
    /// search over username and email, each row carrying its blog count.
    pub fn list(&self, search: Option<&str>, page: usize, limit: usize) -> Result<Page<AdminUserItem>> {
        let users = self.all_newest_first()?;
        let needle = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);
        let matching: Vec<User> = users
            .into_iter()
            .filter(|user| match &needle {
                Some(needle) => {
                    user.username.to_lowercase().contains(needle)
                        || user.email.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();

        let page = page.max(1);
        let limit = limit.max(1);
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .map(|user| {
                let blog_count = self.blog_count(&user.id)?;
                Ok(AdminUserItem { user, blog_count })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total,
            page,
            total_pages: total.div_ceil(limit),
        })
    }

    /// Total number of users.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The most recently registered users, for the admin dashboard.
    pub fn recent(&self, limit: usize) -> Result<Vec<RecentUser>> {
        let users = self.all_newest_first()?;
        Ok(users
            .into_iter()
            .take(limit)
            .map(|user| RecentUser {
                username: user.username,
                email: user.email,
                created_at: user.created_at,
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn all_newest_first(&self) -> Result<Vec<User>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare("SELECT doc FROM users ORDER BY created_at DESC, id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut users = Vec::new();
        for doc in rows {
            users.push(serde_json::from_str(&doc?)?);
        }
        Ok(users)
    }

    fn blog_count(&self, user_id: &str) -> Result<usize> {
        let count: i64 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM blogs WHERE author = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn username_taken(&self, username: &str, exclude_id: Option<&str>) -> Result<bool> {
        let existing: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(match existing {
            Some(id) => exclude_id != Some(id.as_str()),
            None => false,
        })
    }

    fn email_taken(&self, email: &str) -> Result<bool> {
        let existing: Option<i64> = self
            .db
            .conn()
            .query_row("SELECT 1 FROM users WHERE email = ?1", params![email], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(existing.is_some())
    }

    fn save(&self, user: &User) -> Result<()> {
        self.db.conn().execute(
            "UPDATE users SET username = ?1, email = ?2, doc = ?3 WHERE id = ?4",
            params![user.username, user.email, serde_json::to_string(user)?, user.id],
        )?;
        Ok(())
    }
}
