//! Integration tests for the user store.

#[cfg(test)]
mod tests {
    use bloggle_shared::models::{ModerationStatus, ProfilePatch, RegisterInput};
    use bloggle_shared::{BlogStore, CoreError, Database, UserStore};

    fn setup() -> (UserStore, BlogStore) {
        let db = Database::open_in_memory().expect("open db");
        (UserStore::new(db.clone()), BlogStore::new(db))
    }

    fn register(users: &UserStore, username: &str) -> bloggle_shared::models::User {
        users
            .register(&RegisterInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "password123".to_string(),
            })
            .expect("register")
    }

    #[test]
    fn register_then_authenticate_round_trip() {
        let (users, _) = setup();
        let user = register(&users, "ada");

        let authed = users
            .authenticate("ada@example.com", "password123")
            .expect("authenticate");
        assert_eq!(authed.id, user.id);

        assert!(matches!(
            users.authenticate("ada@example.com", "password124"),
            Err(CoreError::Auth(_))
        ));
        assert!(matches!(
            users.authenticate("nobody@example.com", "password123"),
            Err(CoreError::Auth(_))
        ));
    }

    #[test]
    fn email_is_lowercased_on_write() {
        let (users, _) = setup();
        let user = users
            .register(&RegisterInput {
                username: "grace".to_string(),
                email: "Grace@Example.COM".to_string(),
                password: "password123".to_string(),
            })
            .expect("register");
        assert_eq!(user.email, "grace@example.com");
        users
            .authenticate("GRACE@example.com", "password123")
            .expect("case-insensitive login");
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let (users, _) = setup();
        register(&users, "ada");

        let taken_username = users.register(&RegisterInput {
            username: "ada".to_string(),
            email: "other@example.com".to_string(),
            password: "password123".to_string(),
        });
        assert!(matches!(taken_username, Err(CoreError::Validation(_))));

        let taken_email = users.register(&RegisterInput {
            username: "ada2".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        });
        assert!(matches!(taken_email, Err(CoreError::Validation(_))));
    }

    #[test]
    fn register_enforces_field_constraints() {
        let (users, _) = setup();
        let short_password = users.register(&RegisterInput {
            username: "valid".to_string(),
            email: "valid@example.com".to_string(),
            password: "12345".to_string(),
        });
        assert!(matches!(short_password, Err(CoreError::Validation(_))));

        let bad_email = users.register(&RegisterInput {
            username: "valid".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        });
        assert!(matches!(bad_email, Err(CoreError::Validation(_))));
    }

    #[test]
    fn change_password_requires_current_password() {
        let (users, _) = setup();
        let user = register(&users, "ada");

        assert!(matches!(
            users.change_password(&user.id, "wrong-password", "newpassword"),
            Err(CoreError::Auth(_))
        ));
        users
            .change_password(&user.id, "password123", "newpassword")
            .expect("change password");
        users
            .authenticate("ada@example.com", "newpassword")
            .expect("new password works");
        assert!(users.authenticate("ada@example.com", "password123").is_err());
    }

    #[test]
    fn update_profile_touches_only_supplied_fields() {
        let (users, _) = setup();
        let user = register(&users, "ada");

        let updated = users
            .update_profile(
                &user.id,
                &ProfilePatch {
                    bio: Some("Science writer".to_string()),
                    newsletter: Some(true),
                    ..ProfilePatch::default()
                },
            )
            .expect("update");
        assert_eq!(updated.bio, "Science writer");
        assert!(updated.newsletter);
        assert_eq!(updated.username, "ada");
        assert_eq!(updated.location, "");
        assert!(updated.notifications);
    }

    #[test]
    fn username_change_rechecks_uniqueness_excluding_self() {
        let (users, _) = setup();
        let ada = register(&users, "ada");
        register(&users, "grace");

        let collision = users.update_profile(
            &ada.id,
            &ProfilePatch {
                username: Some("grace".to_string()),
                ..ProfilePatch::default()
            },
        );
        assert!(matches!(collision, Err(CoreError::Validation(_))));

        // Re-submitting the current username is not a collision.
        let same = users
            .update_profile(
                &ada.id,
                &ProfilePatch {
                    username: Some("ada".to_string()),
                    ..ProfilePatch::default()
                },
            )
            .expect("same username ok");
        assert_eq!(same.username, "ada");
    }

    #[test]
    fn follow_toggle_is_symmetric_and_reversible() {
        let (users, _) = setup();
        let ada = register(&users, "ada");
        let grace = register(&users, "grace");

        let first = users.toggle_follow(&ada.id, &grace.id).expect("follow");
        assert!(first.is_following);
        assert_eq!(first.following_count, 1);
        assert_eq!(first.followers_count, 1);

        let ada_doc = users.get(&ada.id).expect("reload ada");
        let grace_doc = users.get(&grace.id).expect("reload grace");
        assert_eq!(ada_doc.following, vec![grace.id.clone()]);
        assert_eq!(grace_doc.followers, vec![ada.id.clone()]);

        let second = users.toggle_follow(&ada.id, &grace.id).expect("unfollow");
        assert!(!second.is_following);
        assert_eq!(second.following_count, 0);
        assert_eq!(second.followers_count, 0);
    }

    #[test]
    fn self_follow_is_rejected() {
        let (users, _) = setup();
        let ada = register(&users, "ada");
        assert!(matches!(
            users.toggle_follow(&ada.id, &ada.id),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn follow_missing_target_is_not_found() {
        let (users, _) = setup();
        let ada = register(&users, "ada");
        assert!(matches!(
            users.toggle_follow(&ada.id, "missing-id"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn account_deletion_cascades_to_authored_blogs() {
        let (users, blogs) = setup();
        let ada = register(&users, "ada");
        for i in 0..3 {
            blogs
                .create(
                    &ada.id,
                    &bloggle_shared::models::NewBlogInput {
                        title: format!("Post {i}"),
                        content: "Some body text.".to_string(),
                        excerpt: None,
                        publication: None,
                        tags: None,
                        status: None,
                        category: None,
                    },
                )
                .expect("create blog");
        }

        users.delete_account(&ada.id).expect("delete account");

        let filter = bloggle_shared::models::BlogFilter {
            author: Some(ada.id.clone()),
            ..bloggle_shared::models::BlogFilter::default()
        };
        let page = blogs.list(&filter, 1, 10).expect("list");
        assert_eq!(page.total, 0);
        assert!(matches!(users.get(&ada.id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn admin_cannot_delete_own_account_via_admin_path() {
        let (users, _) = setup();
        let admin = register(&users, "admin");
        let admin = users.promote_to_admin(&admin.id).expect("promote");
        assert!(admin.is_administrator());

        assert!(matches!(
            users.admin_delete(&admin.id, &admin.id),
            Err(CoreError::Validation(_))
        ));

        // The self-service path carries no such restriction.
        users.delete_account(&admin.id).expect("self-service delete");
    }

    #[test]
    fn moderation_status_is_stored_but_not_enforced() {
        let (users, _) = setup();
        let ada = register(&users, "ada");
        let status = users
            .set_status(&ada.id, ModerationStatus::Banned)
            .expect("set status");
        assert_eq!(status, ModerationStatus::Banned);

        // A banned user can still authenticate; no read path consults the
        // flag.
        let authed = users
            .authenticate("ada@example.com", "password123")
            .expect("banned login still works");
        assert_eq!(authed.status, ModerationStatus::Banned);
    }

    #[test]
    fn admin_listing_searches_and_counts_blogs() {
        let (users, blogs) = setup();
        let ada = register(&users, "ada");
        register(&users, "grace");
        blogs
            .create(
                &ada.id,
                &bloggle_shared::models::NewBlogInput {
                    title: "Only post".to_string(),
                    content: "Body.".to_string(),
                    excerpt: None,
                    publication: None,
                    tags: None,
                    status: None,
                    category: None,
                },
            )
            .expect("create blog");

        let all = users.list(None, 1, 10).expect("list all");
        assert_eq!(all.total, 2);

        let found = users.list(Some("ada"), 1, 10).expect("search");
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].user.username, "ada");
        assert_eq!(found.items[0].blog_count, 1);

        // Out-of-range pages come back empty.
        let past_the_end = users.list(None, usize::MAX, 10).expect("huge page");
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.total, 2);
    }

    #[test]
    fn profile_limits_count_chars_not_bytes() {
        let (users, _) = setup();
        let ada = register(&users, "ada");

        // 200 chars, 600 bytes: exactly at the bio limit.
        let wide_bio = "漢".repeat(200);
        let updated = users
            .update_profile(
                &ada.id,
                &ProfilePatch {
                    bio: Some(wide_bio.clone()),
                    ..ProfilePatch::default()
                },
            )
            .expect("wide bio");
        assert_eq!(updated.bio, wide_bio);

        let too_long = users.update_profile(
            &ada.id,
            &ProfilePatch {
                bio: Some("漢".repeat(201)),
                ..ProfilePatch::default()
            },
        );
        assert!(matches!(too_long, Err(CoreError::Validation(_))));
    }
}
