//! Integration tests for the CLI commands.

#[cfg(test)]
mod tests {
    use bloggle_cli::commands::{create_admin, seed, stats};
    use bloggle_shared::{BlogStore, Database, UserStore};
    use tempfile::TempDir;

    #[test]
    fn seed_populates_users_and_published_blogs() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("bloggle.db");

        seed::run(&db_path, false).expect("seed");

        let db = Database::open(&db_path).expect("open");
        let users = UserStore::new(db.clone());
        let blogs = BlogStore::new(db);

        assert_eq!(users.count().expect("count"), 4);
        let admin = users.find_by_username("admin").expect("admin");
        assert!(admin.is_administrator());
        assert_eq!(admin.bio, "Bloggle Administrator");

        let stats = blogs.stats().expect("stats");
        assert_eq!(stats.total_blogs, 3);
        assert_eq!(stats.published_blogs, 3);
    }

    #[test]
    fn seed_is_idempotent_without_fresh() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("bloggle.db");

        seed::run(&db_path, false).expect("first run");
        seed::run(&db_path, false).expect("second run");

        let db = Database::open(&db_path).expect("open");
        assert_eq!(UserStore::new(db.clone()).count().expect("count"), 4);
        assert_eq!(BlogStore::new(db).stats().expect("stats").total_blogs, 3);
    }

    #[test]
    fn fresh_seed_starts_from_an_empty_database() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("bloggle.db");

        seed::run(&db_path, false).expect("first run");
        seed::run(&db_path, true).expect("fresh run");

        let db = Database::open(&db_path).expect("open");
        assert_eq!(BlogStore::new(db).stats().expect("stats").total_blogs, 3);
    }

    #[test]
    fn create_admin_bootstraps_once() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("bloggle.db");

        create_admin::run(&db_path, "admin@bloggle.com", "admin", "admin123")
            .expect("create admin");
        // A second run finds the existing admin and leaves it alone.
        create_admin::run(&db_path, "admin@bloggle.com", "admin", "admin123")
            .expect("repeat run");

        let db = Database::open(&db_path).expect("open");
        let users = UserStore::new(db);
        assert_eq!(users.count().expect("count"), 1);
        assert!(users
            .find_by_username("admin")
            .expect("admin")
            .is_administrator());
    }

    #[test]
    fn stats_runs_over_a_seeded_database() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("bloggle.db");

        seed::run(&db_path, false).expect("seed");
        stats::run(&db_path).expect("stats");
    }
}
