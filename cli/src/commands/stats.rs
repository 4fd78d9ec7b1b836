//! Quick database counts.

use std::path::Path;

use anyhow::Result;
use bloggle_shared::{BlogStore, Database, UserStore};

/// Print user and blog counts for a database.
pub fn run(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let users = UserStore::new(db.clone());
    let blogs = BlogStore::new(db);

    let user_count = users.count()?;
    let stats = blogs.stats()?;

    println!("Users:     {user_count}");
    println!("Blogs:     {}", stats.total_blogs);
    println!("Published: {}", stats.published_blogs);
    println!("Drafts:    {}", stats.draft_blogs);

    for recent in &stats.recent_blogs {
        println!(
            "  {}: {} ({})",
            recent.created_at.format("%Y-%m-%d"),
            recent.title,
            recent.author.username
        );
    }
    Ok(())
}
