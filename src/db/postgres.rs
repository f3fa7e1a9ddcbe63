use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::models::{BlogPost, PortfolioProject, Profile, SiteSettings};
use super::{DbConfig, Store, StoreError, StoreResult};

const PROFILE_COLUMNS: &str =
    "id, user_id, email, full_name, role, avatar_url, password_hash, created_at, updated_at";

const SETTINGS_COLUMNS: &str = "id, hero_title, hero_subtitle, hero_description, about_title, \
     about_description, years_experience, projects_count, satisfaction_rate, ai_integrations, \
     contact_email, contact_phone, social_github, social_linkedin, social_telegram, updated_at, \
     updated_by";

const PROJECT_COLUMNS: &str = "id, title, description, category, tags, image_url, live_url, \
     github_url, featured, sort_order, is_published, created_by, created_at, updated_at";

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, image_url, status, tags, \
     meta_title, meta_description, published_at, author_id, created_at, updated_at";

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: Option<DbConfig>) -> Result<Self, sqlx::Error> {
        let config = config.unwrap_or_default();

        tracing::info!("Initializing database connection pool...");
        tracing::debug!(
            "Database URL: {}",
            config.url.replace(
                |c: char| !c.is_ascii_alphanumeric() && c != ':' && c != '/' && c != '@' && c != '.',
                "*"
            )
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        sqlx::query("SELECT 1").fetch_one(&pool).await?;

        tracing::info!("Database connection pool initialized successfully");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                full_name TEXT,
                role TEXT DEFAULT 'admin',
                avatar_url TEXT,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS site_settings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                hero_title TEXT NOT NULL,
                hero_subtitle TEXT NOT NULL,
                hero_description TEXT,
                about_title TEXT NOT NULL,
                about_description TEXT,
                years_experience INTEGER,
                projects_count INTEGER,
                satisfaction_rate INTEGER,
                ai_integrations INTEGER,
                contact_email TEXT,
                contact_phone TEXT,
                social_github TEXT,
                social_linkedin TEXT,
                social_telegram TEXT,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_by UUID
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS portfolio_projects (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL CHECK (category IN ('classic', 'ai', 'ecommerce')),
                tags TEXT[] NOT NULL DEFAULT '{}',
                image_url TEXT,
                live_url TEXT,
                github_url TEXT,
                featured BOOLEAN NOT NULL DEFAULT false,
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_published BOOLEAN NOT NULL DEFAULT false,
                created_by UUID,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                excerpt TEXT,
                content TEXT NOT NULL,
                image_url TEXT,
                status TEXT NOT NULL DEFAULT 'draft'
                    CHECK (status IN ('draft', 'published', 'archived')),
                tags TEXT[] NOT NULL DEFAULT '{}',
                meta_title TEXT,
                meta_description TEXT,
                published_at TIMESTAMPTZ,
                author_id UUID,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_portfolio_projects_published
                ON portfolio_projects(is_published, sort_order);
            CREATE INDEX IF NOT EXISTS idx_blog_posts_status_created
                ON blog_posts(status, created_at DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database migrations completed successfully");

        Ok(())
    }
}

/// Map a unique-constraint violation to a conflict carrying `message`.
fn conflict_or(err: sqlx::Error, message: &str) -> StoreError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => StoreError::Conflict(message.to_string()),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<Duration> {
        let start = Instant::now();
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(start.elapsed())
    }

    async fn find_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn profile_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_profile(&self, profile: &Profile) -> StoreResult<Option<Profile>> {
        let sql = format!(
            "UPDATE profiles SET email = $1, full_name = $2, role = $3, avatar_url = $4, \
             updated_at = now() WHERE user_id = $5 RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(&profile.email)
            .bind(&profile.full_name)
            .bind(&profile.role)
            .bind(&profile.avatar_url)
            .bind(profile.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Email already in use"))
    }

    async fn set_password_hash(&self, user_id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE profiles SET password_hash = $1, updated_at = now() WHERE user_id = $2",
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn site_settings(&self) -> StoreResult<Option<SiteSettings>> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings LIMIT 1");
        Ok(sqlx::query_as::<_, SiteSettings>(&sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_site_settings(
        &self,
        s: &SiteSettings,
    ) -> StoreResult<Option<SiteSettings>> {
        let sql = format!(
            r#"
            UPDATE site_settings
            SET hero_title = $1, hero_subtitle = $2, hero_description = $3, about_title = $4,
                about_description = $5, years_experience = $6, projects_count = $7,
                satisfaction_rate = $8, ai_integrations = $9, contact_email = $10,
                contact_phone = $11, social_github = $12, social_linkedin = $13,
                social_telegram = $14, updated_by = $15, updated_at = now()
            WHERE id = $16
            RETURNING {SETTINGS_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, SiteSettings>(&sql)
            .bind(&s.hero_title)
            .bind(&s.hero_subtitle)
            .bind(&s.hero_description)
            .bind(&s.about_title)
            .bind(&s.about_description)
            .bind(s.years_experience)
            .bind(s.projects_count)
            .bind(s.satisfaction_rate)
            .bind(s.ai_integrations)
            .bind(&s.contact_email)
            .bind(&s.contact_phone)
            .bind(&s.social_github)
            .bind(&s.social_linkedin)
            .bind(&s.social_telegram)
            .bind(s.updated_by)
            .bind(s.id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_projects(&self, published_only: bool) -> StoreResult<Vec<PortfolioProject>> {
        let filter = if published_only {
            "WHERE is_published = true"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM portfolio_projects {filter} ORDER BY sort_order ASC"
        );
        Ok(sqlx::query_as::<_, PortfolioProject>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn project(&self, id: Uuid) -> StoreResult<Option<PortfolioProject>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM portfolio_projects WHERE id = $1");
        Ok(sqlx::query_as::<_, PortfolioProject>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_project(&self, p: &PortfolioProject) -> StoreResult<PortfolioProject> {
        let sql = format!(
            r#"
            INSERT INTO portfolio_projects (id, title, description, category, tags, image_url,
                live_url, github_url, featured, sort_order, is_published, created_by,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, PortfolioProject>(&sql)
            .bind(p.id)
            .bind(&p.title)
            .bind(&p.description)
            .bind(p.category)
            .bind(&p.tags)
            .bind(&p.image_url)
            .bind(&p.live_url)
            .bind(&p.github_url)
            .bind(p.featured)
            .bind(p.sort_order)
            .bind(p.is_published)
            .bind(p.created_by)
            .bind(p.created_at)
            .bind(p.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save_project(&self, p: &PortfolioProject) -> StoreResult<Option<PortfolioProject>> {
        let sql = format!(
            r#"
            UPDATE portfolio_projects
            SET title = $1, description = $2, category = $3, tags = $4, image_url = $5,
                live_url = $6, github_url = $7, featured = $8, sort_order = $9,
                is_published = $10, updated_at = now()
            WHERE id = $11
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, PortfolioProject>(&sql)
            .bind(&p.title)
            .bind(&p.description)
            .bind(p.category)
            .bind(&p.tags)
            .bind(&p.image_url)
            .bind(&p.live_url)
            .bind(&p.github_url)
            .bind(p.featured)
            .bind(p.sort_order)
            .bind(p.is_published)
            .bind(p.id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM portfolio_projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let filter = if published_only {
            "WHERE status = 'published'"
        } else {
            ""
        };
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts {filter} ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1");
        Ok(sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_post(&self, p: &BlogPost) -> StoreResult<BlogPost> {
        let sql = format!(
            r#"
            INSERT INTO blog_posts (id, title, slug, excerpt, content, image_url, status, tags,
                meta_title, meta_description, published_at, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {POST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(p.id)
            .bind(&p.title)
            .bind(&p.slug)
            .bind(&p.excerpt)
            .bind(&p.content)
            .bind(&p.image_url)
            .bind(p.status)
            .bind(&p.tags)
            .bind(&p.meta_title)
            .bind(&p.meta_description)
            .bind(p.published_at)
            .bind(p.author_id)
            .bind(p.created_at)
            .bind(p.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Slug already exists"))
    }

    async fn save_post(&self, p: &BlogPost) -> StoreResult<Option<BlogPost>> {
        let sql = format!(
            r#"
            UPDATE blog_posts
            SET title = $1, slug = $2, excerpt = $3, content = $4, image_url = $5, status = $6,
                tags = $7, meta_title = $8, meta_description = $9, published_at = $10,
                updated_at = now()
            WHERE id = $11
            RETURNING {POST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(&p.title)
            .bind(&p.slug)
            .bind(&p.excerpt)
            .bind(&p.content)
            .bind(&p.image_url)
            .bind(p.status)
            .bind(&p.tags)
            .bind(&p.meta_title)
            .bind(&p.meta_description)
            .bind(p.published_at)
            .bind(p.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, "Slug already exists"))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
