//! In-memory store used when no database is configured, and by tests.

use async_trait::async_trait;
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{BlogPost, PortfolioProject, PostStatus, Profile, SiteSettings};
use super::{Store, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    site_settings: Vec<SiteSettings>,
    projects: Vec<PortfolioProject>,
    posts: Vec<BlogPost>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) -> StoreResult<Profile> {
        let mut tables = self.tables.write().await;
        if tables.profiles.iter().any(|p| p.email == profile.email) {
            return Err(StoreError::Conflict("Email already in use".to_string()));
        }
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    pub async fn insert_site_settings(&self, settings: SiteSettings) {
        self.tables.write().await.site_settings.push(settings);
    }
}

fn slug_taken(posts: &[BlogPost], slug: &str, except: Option<Uuid>) -> bool {
    posts
        .iter()
        .any(|p| p.slug == slug && Some(p.id) != except)
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<Duration> {
        let start = Instant::now();
        let _tables = self.tables.read().await;
        Ok(start.elapsed())
    }

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn profile_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> StoreResult<Option<Profile>> {
        let mut tables = self.tables.write().await;
        if tables
            .profiles
            .iter()
            .any(|p| p.email == profile.email && p.user_id != profile.user_id)
        {
            return Err(StoreError::Conflict("Email already in use".to_string()));
        }
        let Some(stored) = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        else {
            return Ok(None);
        };
        stored.email = profile.email.clone();
        stored.full_name = profile.full_name.clone();
        stored.role = profile.role.clone();
        stored.avatar_url = profile.avatar_url.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn set_password_hash(&self, user_id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.profiles.iter_mut().find(|p| p.user_id == user_id) {
            Some(stored) => {
                stored.password_hash = password_hash.to_string();
                stored.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>> {
        Ok(self.tables.read().await.site_settings.first().cloned())
    }

    async fn save_site_settings(
        &self,
        settings: &SiteSettings,
    ) -> StoreResult<Option<SiteSettings>> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables
            .site_settings
            .iter_mut()
            .find(|s| s.id == settings.id)
        else {
            return Ok(None);
        };
        *stored = SiteSettings {
            updated_at: Utc::now(),
            ..settings.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn list_projects(&self, published_only: bool) -> StoreResult<Vec<PortfolioProject>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<PortfolioProject> = tables
            .projects
            .iter()
            .filter(|p| !published_only || p.is_published)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.sort_order);
        Ok(projects)
    }

    async fn project(&self, id: Uuid) -> StoreResult<Option<PortfolioProject>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_project(&self, project: &PortfolioProject) -> StoreResult<PortfolioProject> {
        self.tables.write().await.projects.push(project.clone());
        Ok(project.clone())
    }

    async fn save_project(
        &self,
        project: &PortfolioProject,
    ) -> StoreResult<Option<PortfolioProject>> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(None);
        };
        *stored = PortfolioProject {
            created_by: stored.created_by,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..project.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        Ok(tables.projects.len() < before)
    }

    async fn list_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<BlogPost> = tables
            .posts
            .iter()
            .filter(|p| !published_only || p.status == PostStatus::Published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(&self, post: &BlogPost) -> StoreResult<BlogPost> {
        let mut tables = self.tables.write().await;
        if slug_taken(&tables.posts, &post.slug, None) {
            return Err(StoreError::Conflict("Slug already exists".to_string()));
        }
        tables.posts.push(post.clone());
        Ok(post.clone())
    }

    async fn save_post(&self, post: &BlogPost) -> StoreResult<Option<BlogPost>> {
        let mut tables = self.tables.write().await;
        if slug_taken(&tables.posts, &post.slug, Some(post.id)) {
            return Err(StoreError::Conflict("Slug already exists".to_string()));
        }
        let Some(stored) = tables.posts.iter_mut().find(|p| p.id == post.id) else {
            return Ok(None);
        };
        *stored = BlogPost {
            author_id: stored.author_id,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..post.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }
}
