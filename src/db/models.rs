//! Database Models - records shared by the storage layer, the routes and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile of an authenticated principal
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    /// Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Singleton site configuration (hero text, stats, contact info)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: Uuid,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_description: Option<String>,
    pub about_title: String,
    pub about_description: Option<String>,
    pub years_experience: Option<i32>,
    pub projects_count: Option<i32>,
    pub satisfaction_rate: Option<i32>,
    pub ai_integrations: Option<i32>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub social_github: Option<String>,
    pub social_linkedin: Option<String>,
    pub social_telegram: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ProjectCategory {
    Classic,
    Ai,
    Ecommerce,
}

/// Portfolio project model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PortfolioProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub sort_order: i32,
    pub is_published: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New portfolio project for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPortfolioProject {
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// Blog post model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New blog post for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

fn default_status() -> PostStatus {
    PostStatus::Draft
}

impl PortfolioProject {
    pub fn from_new(new: NewPortfolioProject, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            category: new.category,
            tags: new.tags,
            image_url: new.image_url,
            live_url: new.live_url,
            github_url: new.github_url,
            featured: new.featured,
            sort_order: new.sort_order,
            is_published: new.is_published,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

impl BlogPost {
    /// Build a post from a creation request. A post created as published
    /// without an explicit `published_at` is stamped with the creation time.
    pub fn from_new(new: NewBlogPost, author_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        let published_at = match (new.status, new.published_at) {
            (PostStatus::Published, None) => Some(now),
            (_, at) => at,
        };
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            slug: new.slug,
            excerpt: new.excerpt,
            content: new.content,
            image_url: new.image_url,
            status: new.status,
            tags: new.tags,
            meta_title: new.meta_title,
            meta_description: new.meta_description,
            published_at,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_serializes_password_hash() {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            full_name: None,
            role: Some("admin".to_string()),
            avatar_url: None,
            password_hash: "$2b$04$secret".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());

        let back: Profile = serde_json::from_value(json).unwrap();
        assert!(back.password_hash.is_empty());
        assert_eq!(back.email, profile.email);
    }

    #[test]
    fn test_new_post_defaults_to_draft() {
        let new: NewBlogPost =
            serde_json::from_str(r#"{"title":"Hi","slug":"hi","content":"body"}"#).unwrap();
        assert_eq!(new.status, PostStatus::Draft);

        let post = BlogPost::from_new(new, None);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_published_post_is_stamped() {
        let new: NewBlogPost = serde_json::from_str(
            r#"{"title":"Hi","slug":"hi","content":"body","status":"published"}"#,
        )
        .unwrap();
        let post = BlogPost::from_new(new, None);
        assert!(post.published_at.is_some());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProjectCategory::Ecommerce).unwrap(),
            "\"ecommerce\""
        );
        assert_eq!(serde_json::to_string(&ProjectCategory::Ai).unwrap(), "\"ai\"");
    }
}
