//! Document types for the two collections, their projections, and the
//! field-level validation / derivation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Reading speed used for the derived `readTime` field.
pub const WORDS_PER_MINUTE: usize = 200;
/// Number of leading content characters used for a derived excerpt.
pub const EXCERPT_CHARS: usize = 160;

/// Account role. Authorization treats a user as administrator when the role
/// is `Admin` *or* the redundant [`User::is_admin`] flag is set; the
/// redundancy comes from the stored shape and is preserved on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// Administrator account.
    Admin,
}

/// Profile visibility setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Anyone may view the profile.
    #[default]
    Public,
    /// Only the owner may view the profile.
    Private,
    /// Reserved tier between public and private.
    Followers,
}

/// Moderation status set by administrators. Stored and reported, but no
/// read or auth path consults it; banned users can still authenticate and
/// post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    /// Normal account.
    #[default]
    Active,
    /// Temporarily restricted.
    Suspended,
    /// Permanently restricted.
    Banned,
}

impl ModerationStatus {
    /// Parse the wire string used by the admin endpoint.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// Publication lifecycle of a blog. Only `Published` blogs are visible on
/// the public read paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    /// Not yet published; visible to the author only.
    #[default]
    Draft,
    /// Publicly visible.
    Published,
    /// Withdrawn from public view.
    Archived,
}

impl BlogStatus {
    /// Wire and column representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Parse the wire string used by list filters and the admin endpoint.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Fixed blog category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Category {
    /// Technology.
    Technology,
    /// Lifestyle.
    Lifestyle,
    /// Travel.
    Travel,
    /// Education.
    Education,
    /// Health.
    Health,
    /// Politics.
    Politics,
    /// Science.
    Science,
    /// Arts.
    Arts,
    /// Business.
    Business,
    /// Default bucket.
    #[default]
    Other,
}

impl Category {
    /// Wire representation, identical to the variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Lifestyle => "Lifestyle",
            Self::Travel => "Travel",
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Politics => "Politics",
            Self::Science => "Science",
            Self::Arts => "Arts",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }
}

/// A user document. The password hash lives in its own store column, never
/// on this struct, so no serialization path can leak it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier, assigned at creation, immutable.
    pub id: String,
    /// Unique handle, 3-30 chars of letters, digits and underscores.
    pub username: String,
    /// Unique address, lowercased on write.
    pub email: String,
    /// Optional blurb, at most 200 chars.
    #[serde(default)]
    pub bio: String,
    /// Optional location, at most 100 chars.
    #[serde(default)]
    pub location: String,
    /// Optional website URL, at most 200 chars.
    #[serde(default)]
    pub website: String,
    /// Optional avatar URL.
    #[serde(default)]
    pub avatar: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
    /// Redundant admin flag carried by the stored shape.
    #[serde(default)]
    pub is_admin: bool,
    /// Moderation status, settable by administrators.
    #[serde(default)]
    pub status: ModerationStatus,
    /// Notification preference.
    #[serde(default = "default_true")]
    pub notifications: bool,
    /// Newsletter preference.
    #[serde(default)]
    pub newsletter: bool,
    /// Profile visibility.
    #[serde(default)]
    pub privacy: Privacy,
    /// Whether the public projection may carry the email address.
    #[serde(default)]
    pub show_email: bool,
    /// Ids of users following this user.
    #[serde(default)]
    pub followers: Vec<String>,
    /// Ids of users this user follows.
    #[serde(default)]
    pub following: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Administrator capability check: `role == admin OR isAdmin`.
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Admin || self.is_admin
    }

    /// Project this user for external consumption.
    ///
    /// The email is included only for the owner, or when `showEmail` is set
    /// on a non-private profile. A private profile is visible to its owner
    /// only.
    pub fn public_profile(&self, requester: Option<&str>) -> Result<PublicProfile> {
        let is_owner = requester == Some(self.id.as_str());
        if self.privacy == Privacy::Private && !is_owner {
            return Err(CoreError::privacy("Profile is private"));
        }
        let email = if is_owner || self.show_email {
            Some(self.email.clone())
        } else {
            None
        };
        Ok(PublicProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email,
            bio: self.bio.clone(),
            location: self.location.clone(),
            website: self.website.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
            status: self.status,
            privacy: self.privacy,
            followers_count: self.followers.len(),
            following_count: self.following.len(),
            created_at: self.created_at,
        })
    }
}

/// External projection of a [`User`]: no credentials, email only when
/// permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    /// User id.
    pub id: String,
    /// Handle.
    pub username: String,
    /// Present only for the owner or `showEmail` profiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Blurb.
    pub bio: String,
    /// Location.
    pub location: String,
    /// Website URL.
    pub website: String,
    /// Avatar URL.
    pub avatar: String,
    /// Account role.
    pub role: Role,
    /// Moderation status.
    pub status: ModerationStatus,
    /// Profile visibility.
    pub privacy: Privacy,
    /// Number of followers.
    pub followers_count: usize,
    /// Number of followed users.
    pub following_count: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    /// Requested handle.
    pub username: String,
    /// Address, lowercased before storage.
    pub email: String,
    /// Plaintext password, at least 6 chars; hashed before storage.
    pub password: String,
}

/// Partial profile update. `None` means "leave unchanged". For `username`
/// an empty string is also ignored, so a handle cannot be cleared, only
/// replaced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    /// New handle, re-checked for uniqueness.
    pub username: Option<String>,
    /// New blurb.
    pub bio: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New website URL.
    pub website: Option<String>,
    /// Notification preference.
    pub notifications: Option<bool>,
    /// Newsletter preference.
    pub newsletter: Option<bool>,
    /// Profile visibility.
    pub privacy: Option<Privacy>,
    /// Email exposure preference.
    pub show_email: Option<bool>,
}

/// A stored comment. Comments are append-only: no edit or delete operation
/// exists in this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Commenting user id.
    pub user: String,
    /// Body, 1-1000 chars.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A blog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Opaque identifier, immutable.
    pub id: String,
    /// Optional publication name, at most 100 chars.
    #[serde(default)]
    pub publication: String,
    /// Title, 1-200 chars.
    pub title: String,
    /// Summary, at most 300 chars; derived from content when absent.
    pub excerpt: String,
    /// Body, non-empty, arbitrary length.
    pub content: String,
    /// Authoring user id; never reassigned after creation.
    pub author: String,
    /// Ordered tag list, each at most 30 chars.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication lifecycle state.
    #[serde(default)]
    pub status: BlogStatus,
    /// Derived "N min read" string.
    pub read_time: String,
    /// Ids of users who liked this blog; toggled, never double-added.
    #[serde(default)]
    pub likes: Vec<String>,
    /// Comments, newest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Public-read counter.
    #[serde(default)]
    pub views: u64,
    /// Category.
    #[serde(default)]
    pub category: Category,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// Author fields embedded in blog responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    /// Author user id.
    pub id: String,
    /// Author handle.
    pub username: String,
    /// Author avatar URL.
    pub avatar: String,
}

/// A comment with its author populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment author.
    pub user: AuthorSummary,
    /// Body.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A full blog response with populated author and comments and the derived
/// counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    /// Blog id.
    pub id: String,
    /// Publication name.
    pub publication: String,
    /// Title.
    pub title: String,
    /// Summary.
    pub excerpt: String,
    /// Body.
    pub content: String,
    /// Populated author.
    pub author: AuthorSummary,
    /// Tags.
    pub tags: Vec<String>,
    /// Lifecycle state.
    pub status: BlogStatus,
    /// Derived reading time.
    pub read_time: String,
    /// Liking user ids.
    pub likes: Vec<String>,
    /// Derived `likes.len()`.
    pub like_count: usize,
    /// Populated comments, newest first.
    pub comments: Vec<CommentView>,
    /// Derived `comments.len()`.
    pub comment_count: usize,
    /// View counter.
    pub views: u64,
    /// Category.
    pub category: Category,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// A blog list entry: everything except the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListItem {
    /// Blog id.
    pub id: String,
    /// Publication name.
    pub publication: String,
    /// Title.
    pub title: String,
    /// Summary.
    pub excerpt: String,
    /// Populated author.
    pub author: AuthorSummary,
    /// Tags.
    pub tags: Vec<String>,
    /// Lifecycle state.
    pub status: BlogStatus,
    /// Derived reading time.
    pub read_time: String,
    /// Derived like count.
    pub like_count: usize,
    /// Derived comment count.
    pub comment_count: usize,
    /// View counter.
    pub views: u64,
    /// Category.
    pub category: Category,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Blog creation input. The caller identity becomes the immutable author.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBlogInput {
    /// Title, required.
    pub title: String,
    /// Body, required.
    pub content: String,
    /// Optional summary; derived from content when absent or empty.
    pub excerpt: Option<String>,
    /// Optional publication name.
    pub publication: Option<String>,
    /// Optional tag list.
    pub tags: Option<Vec<String>>,
    /// Optional lifecycle state, defaults to draft.
    pub status: Option<BlogStatus>,
    /// Optional category, defaults to `Other`.
    pub category: Option<Category>,
}

/// Partial blog update. Absent or empty string fields fall back to the
/// existing value; a supplied tags array replaces the existing tags even
/// when empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPatch {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New summary.
    pub excerpt: Option<String>,
    /// New publication name.
    pub publication: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// New lifecycle state.
    pub status: Option<BlogStatus>,
    /// New category.
    pub category: Option<Category>,
}

/// Blog list filter. All constraints are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    /// Restrict to one lifecycle state.
    pub status: Option<BlogStatus>,
    /// Case-insensitive substring match on title and excerpt.
    pub search: Option<String>,
    /// Extend the search to the body (public listing behavior).
    pub search_content: bool,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact tag match.
    pub tag: Option<String>,
    /// Restrict to one author.
    pub author: Option<String>,
}

/// One page of results plus the counts the pagination envelope needs.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: usize,
    /// Requested page number (1-based).
    pub page: usize,
    /// `ceil(total / limit)`.
    pub total_pages: usize,
}

/// Outcome of a follow toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowOutcome {
    /// Whether the follower now follows the target.
    pub is_following: bool,
    /// Follower's new following count.
    pub following_count: usize,
    /// Target's new followers count.
    pub followers_count: usize,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    /// The new like set.
    pub likes: Vec<String>,
    /// Derived `likes.len()`.
    pub like_count: usize,
}

// ---------------------------------------------------------------------------
// Validation and derivation rules
// ---------------------------------------------------------------------------

/// Validate a username: 3-30 chars of letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 30 {
        return Err(CoreError::validation(
            "Username must be between 3 and 30 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(CoreError::validation(
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// Validate email syntax. Accepts
/// `word([.-]word)* @ word([.-]word)* (.tld){1+}` with 2-3 char tld groups.
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(CoreError::validation("Please enter a valid email"))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if !is_word_run(local) {
        return false;
    }
    let Some((head, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    (2..=3).contains(&tld.len()) && tld.chars().all(is_word_char) && is_word_run(head)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// One or more word chars separated by single `.` or `-` characters, with
/// no leading or trailing separator.
fn is_word_run(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut at_separator = true;
    for c in s.chars() {
        if is_word_char(c) {
            at_separator = false;
        } else if (c == '.' || c == '-') && !at_separator {
            at_separator = true;
        } else {
            return false;
        }
    }
    !at_separator
}

/// Validate a plaintext password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(CoreError::validation(
            "Password must be at least 6 characters long",
        ));
    }
    Ok(())
}

/// Derive an excerpt from content: the first 160 chars plus an ellipsis
/// when the content is longer than that, otherwise the content itself.
pub fn derive_excerpt(content: &str) -> String {
    if content.chars().count() > EXCERPT_CHARS {
        let head: String = content.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Derive the reading-time string: `ceil(word_count / 200)` minutes, with
/// words delimited by whitespace.
pub fn derive_read_time(content: &str) -> String {
    let words = content.split_whitespace().count().max(1);
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_short_content_is_verbatim() {
        assert_eq!(derive_excerpt("short body"), "short body");
    }

    #[test]
    fn excerpt_long_content_is_truncated_with_ellipsis() {
        let content = "x".repeat(500);
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn read_time_rounds_up() {
        let content = vec!["word"; 400].join(" ");
        assert_eq!(derive_read_time(&content), "2 min read");
        let content = vec!["word"; 201].join(" ");
        assert_eq!(derive_read_time(&content), "2 min read");
        assert_eq!(derive_read_time("one two three"), "1 min read");
    }

    #[test]
    fn email_validation_accepts_common_shapes() {
        for email in [
            "ada@example.com",
            "ada.lovelace@mail.example.org",
            "a_b-c@sub-domain.example.io",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        for email in [
            "",
            "ada",
            "ada@",
            "@example.com",
            "ada@example",
            "ada@example.information",
            "ada..lovelace@example.com",
            "ada@example..com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn username_charset_is_enforced() {
        assert!(validate_username("ethan_siegel").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn private_profile_is_owner_only() {
        let mut user = sample_user();
        user.privacy = Privacy::Private;
        assert!(matches!(
            user.public_profile(None),
            Err(CoreError::Privacy(_))
        ));
        assert!(matches!(
            user.public_profile(Some("someone-else")),
            Err(CoreError::Privacy(_))
        ));
        let profile = user.public_profile(Some("u1")).expect("owner view");
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn email_is_masked_unless_shown_or_owner() {
        let mut user = sample_user();
        let profile = user.public_profile(Some("other")).expect("public view");
        assert!(profile.email.is_none());

        user.show_email = true;
        let profile = user.public_profile(Some("other")).expect("public view");
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    }

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            bio: String::new(),
            location: String::new(),
            website: String::new(),
            avatar: String::new(),
            role: Role::User,
            is_admin: false,
            status: ModerationStatus::Active,
            notifications: true,
            newsletter: false,
            privacy: Privacy::Public,
            show_email: false,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
