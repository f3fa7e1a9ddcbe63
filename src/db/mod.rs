pub mod memory;
pub mod models;
pub mod patch;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use models::{BlogPost, PortfolioProject, Profile, SiteSettings};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to whichever backend the server was started with.
pub type SharedStore = Arc<dyn Store>;

/// Persistence for the four site resources.
///
/// `save_*` methods overwrite the stored row with the same key and return
/// `None` when that row no longer exists. Listing methods return rows in the
/// order the public API serves them: projects by `sort_order` ascending,
/// posts by `created_at` descending.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> StoreResult<Duration>;

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>>;
    async fn profile_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;
    async fn save_profile(&self, profile: &Profile) -> StoreResult<Option<Profile>>;
    async fn set_password_hash(&self, user_id: Uuid, password_hash: &str) -> StoreResult<bool>;

    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>>;
    async fn save_site_settings(&self, settings: &SiteSettings)
        -> StoreResult<Option<SiteSettings>>;

    async fn list_projects(&self, published_only: bool) -> StoreResult<Vec<PortfolioProject>>;
    async fn project(&self, id: Uuid) -> StoreResult<Option<PortfolioProject>>;
    async fn insert_project(&self, project: &PortfolioProject) -> StoreResult<PortfolioProject>;
    async fn save_project(&self, project: &PortfolioProject)
        -> StoreResult<Option<PortfolioProject>>;
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>>;
    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>>;
    async fn insert_post(&self, post: &BlogPost) -> StoreResult<BlogPost>;
    async fn save_post(&self, post: &BlogPost) -> StoreResult<Option<BlogPost>>;
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/portfolio".to_string()),
            max_connections: std::env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_POOL_MIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}
