//! Sample users and blogs for local development.

use std::path::Path;

use anyhow::Result;
use bloggle_shared::{
    models::{BlogStatus, Category, NewBlogInput, ProfilePatch, RegisterInput},
    BlogStore, CoreError, Database, UserStore,
};

struct SeedUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    bio: &'static str,
    location: &'static str,
    avatar: &'static str,
    admin: bool,
}

struct SeedBlog {
    publication: &'static str,
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    tags: &'static [&'static str],
    category: Category,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        username: "admin",
        email: "admin@bloggle.com",
        password: "admin123",
        bio: "Bloggle Administrator",
        location: "Admin HQ",
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        admin: true,
    },
    SeedUser {
        username: "ethan_siegel",
        email: "ethan@example.com",
        password: "password123",
        bio: "Science writer and astrophysicist",
        location: "San Francisco, CA",
        avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
        admin: false,
    },
    SeedUser {
        username: "esha_brahmbhatt",
        email: "esha@example.com",
        password: "password123",
        bio: "Public health researcher and writer",
        location: "New York, NY",
        avatar: "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
        admin: false,
    },
    SeedUser {
        username: "lawrence_lessig",
        email: "lawrence@example.com",
        password: "password123",
        bio: "Legal scholar and political activist",
        location: "Cambridge, MA",
        avatar: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150&h=150&fit=crop&crop=face",
        admin: false,
    },
];

const BLOGS: &[SeedBlog] = &[
    SeedBlog {
        publication: "Starts With A Bang!",
        title: "What a nuclear reactor on the Moon really means for NASA's future",
        excerpt: "There are real concerns with long-term power generation on the Moon; nuclear could be the solution we've been searching for...",
        content: "The Moon presents unique challenges for long-term human habitation, particularly when it comes to power generation. Solar power, while abundant, has limitations during the lunar night which lasts approximately 14 Earth days. Nuclear power could provide a reliable, continuous energy source that could revolutionize our ability to establish permanent lunar bases.\n\nNASA's Artemis program aims to return humans to the Moon by 2024, and establishing sustainable power sources will be crucial for long-term missions. Nuclear reactors could power everything from life support systems to scientific instruments, enabling unprecedented exploration of the lunar surface.\n\nThe technology isn't new - NASA has been developing nuclear power systems for space applications for decades. The Kilopower project, for example, demonstrated a small nuclear reactor that could provide up to 10 kilowatts of electrical power for at least 10 years.",
        tags: &["Space", "Technology", "NASA", "Nuclear Power"],
        category: Category::Science,
    },
    SeedBlog {
        publication: "Cabin Fever Magazine",
        title: "An Introduction to Media Epidemiology",
        excerpt: "A deep dive into how media and communications are intimately related to the health of a population...",
        content: "Media epidemiology is an emerging field that examines how information spreads through populations and how it affects public health outcomes. Just as diseases can spread through contact, information and misinformation can spread through social networks, with potentially serious consequences for public health.\n\nDuring the COVID-19 pandemic, we've seen firsthand how quickly misinformation can spread and how it can undermine public health efforts. Understanding the mechanisms of information spread is crucial for developing effective communication strategies.\n\nThis field combines elements of epidemiology, communication theory, and social network analysis to understand how messages travel through populations and how they influence health behaviors. By understanding these patterns, public health officials can design more effective interventions.",
        tags: &["Media", "Public Health", "Sociology", "Communication"],
        category: Category::Health,
    },
    SeedBlog {
        publication: "Lessig",
        title: "Courage versus Complicity [updated]",
        excerpt: "As retired Admiral Mark Montgomery recently put it, the strategy of Donald Trump is not unusual for authoritarian leaders...",
        content: "The choice between courage and complicity has never been more critical in American politics. When leaders fail to speak truth to power, when institutions fail to hold the powerful accountable, democracy itself is at risk.\n\nHistory shows us that authoritarian leaders often follow similar patterns: they attack the press, undermine the judiciary, and seek to consolidate power. Recognizing these patterns early is crucial for preventing democratic backsliding.\n\nThe question for every citizen, every public official, every institution is simple: will you choose courage or complicity? Will you stand up for democratic values, or will you remain silent in the face of threats to democracy?\n\nThis is not a partisan issue - it's a question of whether we value democracy itself. The future of our republic depends on the choices we make today.",
        tags: &["Politics", "Leadership", "History", "Democracy"],
        category: Category::Politics,
    },
];

/// Populate the database with the sample accounts and posts.
pub fn run(db_path: &Path, fresh: bool) -> Result<()> {
    if fresh {
        remove_database_files(db_path)?;
    }

    let db = Database::open(db_path)?;
    let users = UserStore::new(db.clone());
    let blogs = BlogStore::new(db);

    tracing::info!("Starting database seeding");

    let mut author_ids = Vec::with_capacity(USERS.len());
    for seed in USERS {
        let user = match users.register(&RegisterInput {
            username: seed.username.to_string(),
            email: seed.email.to_string(),
            password: seed.password.to_string(),
        }) {
            Ok(user) => {
                tracing::info!(username = %user.username, "Created user");
                user
            },
            // Re-running the seeder keeps existing accounts.
            Err(CoreError::Validation(_)) => {
                let user = users.find_by_username(seed.username)?;
                tracing::info!(username = %user.username, "User already exists, keeping");
                author_ids.push(user.id);
                continue;
            },
            Err(err) => return Err(err.into()),
        };

        users.update_profile(
            &user.id,
            &ProfilePatch {
                bio: Some(seed.bio.to_string()),
                location: Some(seed.location.to_string()),
                ..ProfilePatch::default()
            },
        )?;
        users.update_avatar(&user.id, seed.avatar)?;
        if seed.admin {
            users.promote_to_admin(&user.id)?;
        }
        author_ids.push(user.id);
    }

    if blogs.stats()?.total_blogs > 0 {
        tracing::info!("Blogs already present, skipping blog seeding");
        return Ok(());
    }

    // Distribute blogs among the seeded users, like-for-like with the
    // sample data set.
    for (i, seed) in BLOGS.iter().enumerate() {
        let author_id = &author_ids[i % author_ids.len()];
        let blog = blogs.create(
            author_id,
            &NewBlogInput {
                title: seed.title.to_string(),
                content: seed.content.to_string(),
                excerpt: Some(seed.excerpt.to_string()),
                publication: Some(seed.publication.to_string()),
                tags: Some(seed.tags.iter().map(|t| t.to_string()).collect()),
                status: Some(BlogStatus::Published),
                category: Some(seed.category),
            },
        )?;
        tracing::info!(title = %blog.title, "Created blog");
    }

    tracing::info!("Database seeding completed successfully");
    Ok(())
}

/// Delete the database file along with its WAL sidecars.
fn remove_database_files(db_path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut path = db_path.as_os_str().to_owned();
        path.push(suffix);
        match std::fs::remove_file(Path::new(&path)) {
            Ok(()) => {},
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
