//! Integration tests for the blog store.

#[cfg(test)]
mod tests {
    use bloggle_shared::models::{
        BlogFilter, BlogPatch, BlogStatus, Category, NewBlogInput, RegisterInput,
    };
    use bloggle_shared::{BlogStore, CoreError, Database, UserStore};

    fn setup() -> (UserStore, BlogStore) {
        let db = Database::open_in_memory().expect("open db");
        (UserStore::new(db.clone()), BlogStore::new(db))
    }

    fn register(users: &UserStore, username: &str) -> String {
        users
            .register(&RegisterInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "password123".to_string(),
            })
            .expect("register")
            .id
    }

    fn new_blog(title: &str, content: &str) -> NewBlogInput {
        NewBlogInput {
            title: title.to_string(),
            content: content.to_string(),
            excerpt: None,
            publication: None,
            tags: None,
            status: None,
            category: None,
        }
    }

    #[test]
    fn create_derives_excerpt_and_read_time() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");

        let content = vec!["word"; 400].join(" ");
        let mut input = new_blog("Long read", &content);
        input.status = Some(BlogStatus::Published);
        let view = blogs.create(&author, &input).expect("create");

        assert_eq!(view.read_time, "2 min read");
        assert!(view.excerpt.ends_with("..."));
        assert_eq!(view.excerpt.chars().count(), 163);
        assert_eq!(view.status, BlogStatus::Published);
        assert_eq!(view.author.username, "ada");
        assert_eq!(view.views, 0);
        assert_eq!(view.category, Category::Other);
    }

    #[test]
    fn short_content_excerpt_is_the_content() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let view = blogs
            .create(&author, &new_blog("Short", "A short body."))
            .expect("create");
        assert_eq!(view.excerpt, "A short body.");
        assert_eq!(view.read_time, "1 min read");
    }

    #[test]
    fn explicit_excerpt_is_kept() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut input = new_blog("Titled", "Body text here.");
        input.excerpt = Some("Hand-written summary".to_string());
        let view = blogs.create(&author, &input).expect("create");
        assert_eq!(view.excerpt, "Hand-written summary");
    }

    #[test]
    fn create_rejects_missing_fields() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        assert!(matches!(
            blogs.create(&author, &new_blog("", "Body.")),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            blogs.create(&author, &new_blog("Title", "   ")),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            blogs.create(&author, &new_blog(&"t".repeat(201), "Body.")),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn public_read_masks_unpublished_even_for_author() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let draft = blogs
            .create(&author, &new_blog("Draft post", "Body."))
            .expect("create");

        // Draft: not found on the public path, for any requester.
        assert!(matches!(
            blogs.get_public(&draft.id),
            Err(CoreError::NotFound(_))
        ));
        // Missing: same failure shape.
        assert!(matches!(
            blogs.get_public("missing-id"),
            Err(CoreError::NotFound(_))
        ));
        // The author-only edit path still sees it.
        let edit = blogs.get_for_edit(&draft.id, &author).expect("edit view");
        assert_eq!(edit.status, BlogStatus::Draft);
        assert_eq!(edit.views, 0);
    }

    #[test]
    fn public_read_increments_views_exactly_once_per_read() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut input = new_blog("Published", "Body.");
        input.status = Some(BlogStatus::Published);
        let blog = blogs.create(&author, &input).expect("create");

        assert_eq!(blogs.get_public(&blog.id).expect("read 1").views, 1);
        assert_eq!(blogs.get_public(&blog.id).expect("read 2").views, 2);

        // Edit reads and list reads leave the counter alone.
        assert_eq!(blogs.get_for_edit(&blog.id, &author).expect("edit").views, 2);
        let filter = BlogFilter {
            status: Some(BlogStatus::Published),
            ..BlogFilter::default()
        };
        blogs.list(&filter, 1, 10).expect("list");
        assert_eq!(blogs.get_public(&blog.id).expect("read 3").views, 3);
    }

    #[test]
    fn edit_path_is_author_only() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let other = register(&users, "grace");
        let blog = blogs.create(&author, &new_blog("Mine", "Body.")).expect("create");

        assert!(matches!(
            blogs.get_for_edit(&blog.id, &other),
            Err(CoreError::Auth(_))
        ));
    }

    #[test]
    fn update_by_non_author_fails_and_changes_nothing() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let other = register(&users, "grace");
        let blog = blogs.create(&author, &new_blog("Original", "Body.")).expect("create");

        let patch = BlogPatch {
            title: Some("Hijacked".to_string()),
            ..BlogPatch::default()
        };
        assert!(matches!(
            blogs.update(&blog.id, &other, &patch),
            Err(CoreError::Auth(_))
        ));
        let unchanged = blogs.get_for_edit(&blog.id, &author).expect("reload");
        assert_eq!(unchanged.title, "Original");
    }

    #[test]
    fn update_empty_string_falls_back_to_existing_value() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut input = new_blog("Original", "Body.");
        input.tags = Some(vec!["rust".to_string()]);
        let blog = blogs.create(&author, &input).expect("create");

        let patch = BlogPatch {
            title: Some(String::new()),
            content: Some(String::new()),
            status: Some(BlogStatus::Published),
            tags: Some(Vec::new()),
            ..BlogPatch::default()
        };
        let updated = blogs.update(&blog.id, &author, &patch).expect("update");

        // Empty strings are indistinguishable from absent fields; a
        // supplied tags array replaces the tags even when empty.
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.content, "Body.");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.status, BlogStatus::Published);
    }

    #[test]
    fn like_toggle_alternates_membership() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let reader = register(&users, "grace");
        let blog = blogs.create(&author, &new_blog("Post", "Body.")).expect("create");

        let liked = blogs.toggle_like(&blog.id, &reader).expect("like");
        assert_eq!(liked.like_count, 1);
        assert!(liked.likes.contains(&reader));

        let unliked = blogs.toggle_like(&blog.id, &reader).expect("unlike");
        assert_eq!(unliked.like_count, 0);
        assert!(unliked.likes.is_empty());

        assert!(matches!(
            blogs.toggle_like("missing-id", &reader),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn comments_prepend_newest_first() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let reader = register(&users, "grace");
        let blog = blogs.create(&author, &new_blog("Post", "Body.")).expect("create");

        blogs.add_comment(&blog.id, &reader, "first").expect("comment 1");
        let comments = blogs.add_comment(&blog.id, &author, "second").expect("comment 2");

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "second");
        assert_eq!(comments[0].user.username, "ada");
        assert_eq!(comments[1].content, "first");

        assert!(matches!(
            blogs.add_comment(&blog.id, &reader, &"x".repeat(1001)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            blogs.add_comment(&blog.id, &reader, "   "),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn comments_are_accepted_on_drafts() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let reader = register(&users, "grace");
        let draft = blogs.create(&author, &new_blog("Draft", "Body.")).expect("create");
        let comments = blogs.add_comment(&draft.id, &reader, "sneaky").expect("comment");
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn list_filters_search_and_paginates() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");

        let mut nuclear = new_blog(
            "What a nuclear reactor on the Moon really means",
            "Reactor body text.",
        );
        nuclear.status = Some(BlogStatus::Published);
        nuclear.tags = Some(vec!["Space".to_string()]);
        nuclear.category = Some(Category::Science);
        blogs.create(&author, &nuclear).expect("create");

        let mut other = new_blog("Media epidemiology", "Completely different body.");
        other.status = Some(BlogStatus::Published);
        blogs.create(&author, &other).expect("create");

        blogs.create(&author, &new_blog("Hidden draft", "nuclear draft body.")).expect("create");

        let filter = BlogFilter {
            status: Some(BlogStatus::Published),
            search: Some("nuclear".to_string()),
            search_content: true,
            ..BlogFilter::default()
        };
        let page = blogs.list(&filter, 1, 10).expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items[0].title.contains("nuclear"));

        let by_tag = BlogFilter {
            status: Some(BlogStatus::Published),
            tag: Some("Space".to_string()),
            ..BlogFilter::default()
        };
        assert_eq!(blogs.list(&by_tag, 1, 10).expect("tag list").total, 1);

        let by_category = BlogFilter {
            status: Some(BlogStatus::Published),
            category: Some("Science".to_string()),
            ..BlogFilter::default()
        };
        assert_eq!(blogs.list(&by_category, 1, 10).expect("category list").total, 1);

        // The "mine" listing sees every status.
        let mine = BlogFilter {
            author: Some(author.clone()),
            ..BlogFilter::default()
        };
        let mine_page = blogs.list(&mine, 1, 2).expect("mine list");
        assert_eq!(mine_page.total, 3);
        assert_eq!(mine_page.total_pages, 2);
        assert_eq!(mine_page.items.len(), 2);
    }

    #[test]
    fn list_tolerates_out_of_range_pages() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut input = new_blog("Only post", "Body.");
        input.status = Some(BlogStatus::Published);
        blogs.create(&author, &input).expect("create");

        let filter = BlogFilter {
            status: Some(BlogStatus::Published),
            ..BlogFilter::default()
        };
        let past_the_end = blogs.list(&filter, usize::MAX, 10).expect("huge page");
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.total, 1);

        // Page zero is clamped to the first page.
        assert_eq!(blogs.list(&filter, 0, 10).expect("page zero").items.len(), 1);
    }

    #[test]
    fn length_limits_count_chars_not_bytes() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");

        // 150 chars, 450 bytes: inside the 200-char title limit.
        let wide_title = "漢".repeat(150);
        let blog = blogs
            .create(&author, &new_blog(&wide_title, "Body."))
            .expect("create");
        assert_eq!(blog.title, wide_title);

        assert!(matches!(
            blogs.create(&author, &new_blog(&"漢".repeat(201), "Body.")),
            Err(CoreError::Validation(_))
        ));

        // Comments get the same treatment.
        blogs
            .add_comment(&blog.id, &author, &"界".repeat(1000))
            .expect("wide comment");
        assert!(matches!(
            blogs.add_comment(&blog.id, &author, &"界".repeat(1001)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn search_matches_body_only_on_the_public_listing() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut input = new_blog("Plain title", "Body mentions wolfram once.");
        input.status = Some(BlogStatus::Published);
        blogs.create(&author, &input).expect("create");

        let public = BlogFilter {
            status: Some(BlogStatus::Published),
            search: Some("wolfram".to_string()),
            search_content: true,
            ..BlogFilter::default()
        };
        assert_eq!(blogs.list(&public, 1, 10).expect("public").total, 1);

        let admin = BlogFilter {
            search: Some("wolfram".to_string()),
            ..BlogFilter::default()
        };
        assert_eq!(blogs.list(&admin, 1, 10).expect("admin").total, 0);
    }

    #[test]
    fn admin_status_accepts_draft_and_published_only() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let blog = blogs.create(&author, &new_blog("Post", "Body.")).expect("create");

        let status = blogs
            .admin_set_status(&blog.id, BlogStatus::Published)
            .expect("publish");
        assert_eq!(status, BlogStatus::Published);
        assert!(blogs.get_public(&blog.id).is_ok());

        assert!(matches!(
            blogs.admin_set_status(&blog.id, BlogStatus::Archived),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            blogs.admin_set_status("missing-id", BlogStatus::Draft),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_paths_enforce_their_own_rules() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let other = register(&users, "grace");
        let blog = blogs.create(&author, &new_blog("Post", "Body.")).expect("create");

        // The plain path is author-only, administrators included.
        assert!(matches!(
            blogs.delete(&blog.id, &other),
            Err(CoreError::Auth(_))
        ));
        // The administrative path has no author check.
        blogs.admin_delete(&blog.id).expect("admin delete");
        assert!(matches!(
            blogs.admin_delete(&blog.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn stats_count_by_status() {
        let (users, blogs) = setup();
        let author = register(&users, "ada");
        let mut published = new_blog("Published", "Body.");
        published.status = Some(BlogStatus::Published);
        blogs.create(&author, &published).expect("create");
        blogs.create(&author, &new_blog("Draft", "Body.")).expect("create");

        let stats = blogs.stats().expect("stats");
        assert_eq!(stats.total_blogs, 2);
        assert_eq!(stats.published_blogs, 1);
        assert_eq!(stats.draft_blogs, 1);
        assert_eq!(stats.recent_blogs.len(), 2);
        assert_eq!(stats.recent_blogs[0].author.username, "ada");
    }
}
