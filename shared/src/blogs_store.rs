//! The blog record manager: content lifecycle, authorization-gated
//! mutation, engagement tracking, and the filtered, paginated listings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension};
use serde::Serialize;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{CoreError, Result};
use crate::models::{
    derive_excerpt, derive_read_time, AuthorSummary, Blog, BlogFilter, BlogListItem, BlogPatch,
    BlogStatus, BlogView, Comment, CommentView, LikeOutcome, NewBlogInput, Page, User,
};

/// Maximum title length.
const TITLE_MAX: usize = 200;
/// Maximum excerpt length.
const EXCERPT_MAX: usize = 300;
/// Maximum publication-name length.
const PUBLICATION_MAX: usize = 100;
/// Maximum length of a single tag.
const TAG_MAX: usize = 30;
/// Maximum comment length.
const COMMENT_MAX: usize = 1000;

/// Slim row for the admin dashboard's recent-blogs panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBlog {
    /// Blog id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Populated author.
    pub author: AuthorSummary,
    /// Lifecycle state.
    pub status: BlogStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Blog counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    /// All blogs, any status.
    pub total_blogs: usize,
    /// Published blogs.
    pub published_blogs: usize,
    /// Draft blogs.
    pub draft_blogs: usize,
    /// The five most recent blogs.
    pub recent_blogs: Vec<RecentBlog>,
}

/// Handle to the blogs collection.
#[derive(Clone)]
pub struct BlogStore {
    db: Database,
}

impl BlogStore {
    /// Create a store over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a blog. The authenticated caller becomes the immutable
    /// author; excerpt and read time are derived when not supplied.
    pub fn create(&self, author_id: &str, input: &NewBlogInput) -> Result<BlogView> {
        let title = input.title.trim();
        if title.is_empty() || title.chars().count() > TITLE_MAX {
            return Err(CoreError::validation(
                "Title is required and cannot exceed 200 characters",
            ));
        }
        let content = input.content.trim();
        if content.is_empty() {
            return Err(CoreError::validation("Content is required"));
        }
        let excerpt = match input.excerpt.as_deref().map(str::trim) {
            Some(excerpt) if !excerpt.is_empty() => {
                if excerpt.chars().count() > EXCERPT_MAX {
                    return Err(CoreError::validation("Excerpt cannot exceed 300 characters"));
                }
                excerpt.to_string()
            }
            _ => derive_excerpt(content),
        };
        let publication = input.publication.as_deref().map(str::trim).unwrap_or_default();
        if publication.chars().count() > PUBLICATION_MAX {
            return Err(CoreError::validation(
                "Publication name cannot exceed 100 characters",
            ));
        }
        let tags = validate_tags(input.tags.clone().unwrap_or_default())?;

        let now = Utc::now();
        let blog = Blog {
            id: Uuid::new_v4().to_string(),
            publication: publication.to_string(),
            title: title.to_string(),
            excerpt,
            content: content.to_string(),
            author: author_id.to_string(),
            tags,
            status: input.status.unwrap_or_default(),
            read_time: derive_read_time(content),
            likes: Vec::new(),
            comments: Vec::new(),
            views: 0,
            category: input.category.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.db.conn().execute(
            "INSERT INTO blogs (id, author, status, category, created_at, doc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                blog.id,
                blog.author,
                blog.status.as_str(),
                blog.category.as_str(),
                now.timestamp_millis(),
                serde_json::to_string(&blog)?,
            ],
        )?;
        tracing::info!(blog_id = %blog.id, author_id, "blog created");
        self.to_view(blog)
    }

    /// Public single-blog read. Missing and unpublished blogs are
    /// indistinguishable (both report not-found), and a successful read
    /// increments the view counter exactly once before returning.
    pub fn get_public(&self, blog_id: &str) -> Result<BlogView> {
        let mut blog = self.load(blog_id)?.ok_or_else(not_found)?;
        if blog.status != BlogStatus::Published {
            return Err(not_found());
        }
        blog.views += 1;
        self.save(&blog)?;
        self.to_view(blog)
    }

    /// Author-only read of the full document, any status. Does not touch
    /// the view counter.
    pub fn get_for_edit(&self, blog_id: &str, requester_id: &str) -> Result<BlogView> {
        let blog = self.load(blog_id)?.ok_or_else(not_found)?;
        if blog.author != requester_id {
            return Err(CoreError::auth("Not authorized"));
        }
        self.to_view(blog)
    }

    /// Author-only partial update. Absent or empty text fields keep their
    /// existing values; the author reference is never reassignable.
    pub fn update(&self, blog_id: &str, requester_id: &str, patch: &BlogPatch) -> Result<BlogView> {
        let mut blog = self.load(blog_id)?.ok_or_else(not_found)?;
        if blog.author != requester_id {
            return Err(CoreError::auth("Not authorized"));
        }

        if let Some(title) = patch.title.as_deref().map(str::trim) {
            if !title.is_empty() {
                if title.chars().count() > TITLE_MAX {
                    return Err(CoreError::validation(
                        "Title is required and cannot exceed 200 characters",
                    ));
                }
                blog.title = title.to_string();
            }
        }
        if let Some(content) = patch.content.as_deref().map(str::trim) {
            if !content.is_empty() {
                blog.content = content.to_string();
            }
        }
        if let Some(excerpt) = patch.excerpt.as_deref().map(str::trim) {
            if !excerpt.is_empty() {
                if excerpt.chars().count() > EXCERPT_MAX {
                    return Err(CoreError::validation("Excerpt cannot exceed 300 characters"));
                }
                blog.excerpt = excerpt.to_string();
            }
        }
        if let Some(publication) = patch.publication.as_deref().map(str::trim) {
            if !publication.is_empty() {
                if publication.chars().count() > PUBLICATION_MAX {
                    return Err(CoreError::validation(
                        "Publication name cannot exceed 100 characters",
                    ));
                }
                blog.publication = publication.to_string();
            }
        }
        if let Some(tags) = patch.tags.clone() {
            // A supplied array replaces the tags even when empty.
            blog.tags = validate_tags(tags)?;
        }
        if let Some(status) = patch.status {
            blog.status = status;
        }
        if let Some(category) = patch.category {
            blog.category = category;
        }

        blog.updated_at = Utc::now();
        self.save(&blog)?;
        self.to_view(blog)
    }

    /// Author-only deletion.
    pub fn delete(&self, blog_id: &str, requester_id: &str) -> Result<()> {
        let blog = self.load(blog_id)?.ok_or_else(not_found)?;
        if blog.author != requester_id {
            return Err(CoreError::auth("Not authorized"));
        }
        self.db
            .conn()
            .execute("DELETE FROM blogs WHERE id = ?1", params![blog_id])?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Engagement
    // ------------------------------------------------------------------

    /// Toggle the caller's membership in the like set. Each call flips
    /// state; no duplicate entries are ever added.
    pub fn toggle_like(&self, blog_id: &str, user_id: &str) -> Result<LikeOutcome> {
        let mut blog = self.load(blog_id)?.ok_or_else(not_found)?;
        if blog.likes.iter().any(|id| id == user_id) {
            blog.likes.retain(|id| id != user_id);
        } else {
            blog.likes.push(user_id.to_string());
        }
        self.save(&blog)?;
        Ok(LikeOutcome {
            like_count: blog.likes.len(),
            likes: blog.likes,
        })
    }

    /// Prepend a comment (newest-first order) and return the populated
    /// comment list. Blog status is not checked; drafts accept comments.
    pub fn add_comment(&self, blog_id: &str, user_id: &str, content: &str) -> Result<Vec<CommentView>> {
        let content = content.trim();
        if content.is_empty() || content.chars().count() > COMMENT_MAX {
            return Err(CoreError::validation(
                "Comment content is required and cannot exceed 1000 characters",
            ));
        }
        let mut blog = self.load(blog_id)?.ok_or_else(not_found)?;
        blog.comments.insert(
            0,
            Comment {
                user: user_id.to_string(),
                content: content.to_string(),
                created_at: Utc::now(),
            },
        );
        self.save(&blog)?;
        let mut authors = HashMap::new();
        self.populate_comments(&blog.comments, &mut authors)
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// Filtered, paginated listing, newest first. List entries carry no
    /// body. Search is a case-insensitive substring match over title and
    /// excerpt, extended to the body when the filter asks for it.
    pub fn list(&self, filter: &BlogFilter, page: usize, limit: usize) -> Result<Page<BlogListItem>> {
        let mut sql = String::from("SELECT doc FROM blogs WHERE 1=1");
        let mut args: Vec<String> = Vec::new();
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            args.push(status.as_str().to_string());
        }
        if let Some(author) = filter.author.as_deref() {
            sql.push_str(" AND author = ?");
            args.push(author.to_string());
        }
        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            sql.push_str(" AND category = ?");
            args.push(category.to_string());
        }
        sql.push_str(" ORDER BY created_at DESC, id");

        let blogs = {
            let conn = self.db.conn();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(args.iter()), |row| {
                row.get::<_, String>(0)
            })?;
            let mut blogs: Vec<Blog> = Vec::new();
            for doc in rows {
                blogs.push(serde_json::from_str(&doc?)?);
            }
            blogs
        };

        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let tag = filter.tag.as_deref().filter(|t| !t.is_empty());

        let matching: Vec<Blog> = blogs
            .into_iter()
            .filter(|blog| {
                if let Some(needle) = &needle {
                    let hit = blog.title.to_lowercase().contains(needle)
                        || blog.excerpt.to_lowercase().contains(needle)
                        || (filter.search_content
                            && blog.content.to_lowercase().contains(needle));
                    if !hit {
                        return false;
                    }
                }
                if let Some(tag) = tag {
                    if !blog.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                true
            })
            .collect();

        let page = page.max(1);
        let limit = limit.max(1);
        let total = matching.len();
        let mut authors = HashMap::new();
        let items = matching
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .map(|blog| self.to_list_item(blog, &mut authors))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total,
            page,
            total_pages: total.div_ceil(limit),
        })
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Force a blog's status. Only draft and published are accepted on
    /// this path.
    pub fn admin_set_status(&self, blog_id: &str, status: BlogStatus) -> Result<BlogStatus> {
        if status == BlogStatus::Archived {
            return Err(CoreError::validation("Invalid status"));
        }
        let mut blog = self.load(blog_id)?.ok_or_else(not_found)?;
        blog.status = status;
        blog.updated_at = Utc::now();
        self.save(&blog)?;
        Ok(status)
    }

    /// Force-delete any blog, no author check.
    pub fn admin_delete(&self, blog_id: &str) -> Result<()> {
        let deleted = self
            .db
            .conn()
            .execute("DELETE FROM blogs WHERE id = ?1", params![blog_id])?;
        if deleted == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    /// Dashboard counts plus the five most recent blogs.
    pub fn stats(&self) -> Result<BlogStats> {
        let conn = self.db.conn();
        let total_blogs: i64 = conn.query_row("SELECT COUNT(*) FROM blogs", [], |row| row.get(0))?;
        let published_blogs: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blogs WHERE status = 'published'",
            [],
            |row| row.get(0),
        )?;
        let draft_blogs: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blogs WHERE status = 'draft'",
            [],
            |row| row.get(0),
        )?;
        let mut stmt =
            conn.prepare("SELECT doc FROM blogs ORDER BY created_at DESC, id LIMIT 5")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut recent: Vec<Blog> = Vec::new();
        for doc in rows {
            recent.push(serde_json::from_str(&doc?)?);
        }
        drop(stmt);
        drop(conn);

        let mut authors = HashMap::new();
        let recent_blogs = recent
            .into_iter()
            .map(|blog| {
                let author = self.author_summary(&blog.author, &mut authors)?;
                Ok(RecentBlog {
                    id: blog.id,
                    title: blog.title,
                    author,
                    status: blog.status,
                    created_at: blog.created_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BlogStats {
            total_blogs: total_blogs as usize,
            published_blogs: published_blogs as usize,
            draft_blogs: draft_blogs as usize,
            recent_blogs,
        })
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn load(&self, blog_id: &str) -> Result<Option<Blog>> {
        let doc: Option<String> = self
            .db
            .conn()
            .query_row("SELECT doc FROM blogs WHERE id = ?1", params![blog_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(match doc {
            Some(doc) => Some(serde_json::from_str(&doc)?),
            None => None,
        })
    }

    fn save(&self, blog: &Blog) -> Result<()> {
        self.db.conn().execute(
            "UPDATE blogs SET status = ?1, category = ?2, doc = ?3 WHERE id = ?4",
            params![
                blog.status.as_str(),
                blog.category.as_str(),
                serde_json::to_string(blog)?,
                blog.id
            ],
        )?;
        Ok(())
    }

    fn to_view(&self, blog: Blog) -> Result<BlogView> {
        let mut authors = HashMap::new();
        let author = self.author_summary(&blog.author, &mut authors)?;
        let comments = self.populate_comments(&blog.comments, &mut authors)?;
        Ok(BlogView {
            id: blog.id,
            publication: blog.publication,
            title: blog.title,
            excerpt: blog.excerpt,
            content: blog.content,
            author,
            tags: blog.tags,
            status: blog.status,
            read_time: blog.read_time,
            like_count: blog.likes.len(),
            likes: blog.likes,
            comment_count: comments.len(),
            comments,
            views: blog.views,
            category: blog.category,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        })
    }

    fn to_list_item(
        &self,
        blog: Blog,
        authors: &mut HashMap<String, AuthorSummary>,
    ) -> Result<BlogListItem> {
        let author = self.author_summary(&blog.author, authors)?;
        Ok(BlogListItem {
            id: blog.id,
            publication: blog.publication,
            title: blog.title,
            excerpt: blog.excerpt,
            author,
            tags: blog.tags,
            status: blog.status,
            read_time: blog.read_time,
            like_count: blog.likes.len(),
            comment_count: blog.comments.len(),
            views: blog.views,
            category: blog.category,
            created_at: blog.created_at,
        })
    }

    fn populate_comments(
        &self,
        comments: &[Comment],
        authors: &mut HashMap<String, AuthorSummary>,
    ) -> Result<Vec<CommentView>> {
        comments
            .iter()
            .map(|comment| {
                let user = self.author_summary(&comment.user, authors)?;
                Ok(CommentView {
                    user,
                    content: comment.content.clone(),
                    created_at: comment.created_at,
                })
            })
            .collect()
    }

    /// Look up the summary fields for a user id, caching per call site.
    /// A commenter whose account has since been deleted shows up with an
    /// empty username.
    fn author_summary(
        &self,
        user_id: &str,
        cache: &mut HashMap<String, AuthorSummary>,
    ) -> Result<AuthorSummary> {
        if let Some(summary) = cache.get(user_id) {
            return Ok(summary.clone());
        }
        let doc: Option<String> = self
            .db
            .conn()
            .query_row("SELECT doc FROM users WHERE id = ?1", params![user_id], |row| {
                row.get(0)
            })
            .optional()?;
        let summary = match doc {
            Some(doc) => {
                let user: User = serde_json::from_str(&doc)?;
                AuthorSummary {
                    id: user.id,
                    username: user.username,
                    avatar: user.avatar,
                }
            }
            None => AuthorSummary {
                id: user_id.to_string(),
                username: String::new(),
                avatar: String::new(),
            },
        };
        cache.insert(user_id.to_string(), summary.clone());
        Ok(summary)
    }
}

fn not_found() -> CoreError {
    CoreError::not_found("Blog not found")
}

fn validate_tags(tags: Vec<String>) -> Result<Vec<String>> {
    let tags: Vec<String> = tags.into_iter().map(|t| t.trim().to_string()).collect();
    if tags.iter().any(|t| t.chars().count() > TAG_MAX) {
        return Err(CoreError::validation("Tag cannot exceed 30 characters"));
    }
    Ok(tags)
}
