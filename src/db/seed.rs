//! Demo content for the in-memory store: an admin account, the site settings
//! row and a handful of projects and posts.

use bcrypt::hash;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::memory::MemoryStore;
use super::models::{
    BlogPost, NewBlogPost, NewPortfolioProject, PortfolioProject, PostStatus, Profile,
    ProjectCategory, SiteSettings,
};
use super::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to hash seed password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("seed task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create the admin profile that can log in with `email` / `password`.
pub async fn seed_admin(
    store: &MemoryStore,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<Profile, SeedError> {
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash(password, bcrypt_cost))
        .await??;

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: Some("Site Admin".to_string()),
        role: Some("admin".to_string()),
        avatar_url: None,
        password_hash,
        created_at: now,
        updated_at: now,
    };
    Ok(store.insert_profile(profile).await?)
}

pub fn default_site_settings() -> SiteSettings {
    SiteSettings {
        id: Uuid::new_v4(),
        hero_title: "Websites that work for your business".to_string(),
        hero_subtitle: "Web development and AI integration".to_string(),
        hero_description: Some(
            "From classic company sites to online stores with AI assistants.".to_string(),
        ),
        about_title: "About me".to_string(),
        about_description: Some("Full-stack developer building sites since 2015.".to_string()),
        years_experience: Some(9),
        projects_count: Some(120),
        satisfaction_rate: Some(98),
        ai_integrations: Some(35),
        contact_email: Some("hello@example.com".to_string()),
        contact_phone: None,
        social_github: Some("https://github.com/example".to_string()),
        social_linkedin: None,
        social_telegram: None,
        updated_at: Utc::now(),
        updated_by: None,
    }
}

fn demo_projects() -> Vec<PortfolioProject> {
    let projects = [
        ("AI assistant for e-commerce", ProjectCategory::Ai, true),
        ("Corporate site with CMS", ProjectCategory::Classic, false),
        ("Premium online store", ProjectCategory::Ecommerce, true),
        ("Multilingual portal", ProjectCategory::Classic, false),
    ];
    projects
        .into_iter()
        .enumerate()
        .map(|(i, (title, category, featured))| {
            PortfolioProject::from_new(
                NewPortfolioProject {
                    title: title.to_string(),
                    description: format!("{title}: design, build and launch."),
                    category,
                    tags: vec!["react".to_string(), "rust".to_string()],
                    image_url: None,
                    live_url: None,
                    github_url: None,
                    featured,
                    sort_order: i as i32,
                    is_published: true,
                },
                None,
            )
        })
        .collect()
}

fn demo_posts(author_id: Option<Uuid>) -> Vec<BlogPost> {
    let posts = [
        ("why-ai-in-small-shops", "Why AI belongs in small shops", PostStatus::Published, 72),
        ("choosing-a-cms", "Choosing a CMS in 2024", PostStatus::Published, 24),
        ("notes-on-headless", "Notes on headless commerce", PostStatus::Draft, 2),
    ];
    posts
        .into_iter()
        .map(|(slug, title, status, age_hours)| {
            let mut post = BlogPost::from_new(
                NewBlogPost {
                    title: title.to_string(),
                    slug: slug.to_string(),
                    excerpt: Some(format!("{title}.")),
                    content: format!("<p>{title}</p>"),
                    image_url: None,
                    status,
                    tags: vec!["web".to_string()],
                    meta_title: None,
                    meta_description: None,
                    published_at: None,
                },
                author_id,
            );
            post.created_at = Utc::now() - Duration::hours(age_hours);
            post.updated_at = post.created_at;
            if post.published_at.is_some() {
                post.published_at = Some(post.created_at);
            }
            post
        })
        .collect()
}

/// Fill an empty store with the admin account and demo content.
pub async fn seed_demo(
    store: &MemoryStore,
    admin_email: &str,
    admin_password: &str,
    bcrypt_cost: u32,
) -> Result<Profile, SeedError> {
    let admin = seed_admin(store, admin_email, admin_password, bcrypt_cost).await?;
    store.insert_site_settings(default_site_settings()).await;
    for project in demo_projects() {
        store.insert_project(&project).await?;
    }
    for post in demo_posts(Some(admin.user_id)) {
        store.insert_post(&post).await?;
    }
    tracing::info!(admin = %admin.email, "Seeded in-memory store with demo content");
    Ok(admin)
}
