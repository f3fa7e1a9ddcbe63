//! Server configuration read from the environment (after `.env` is loaded).

use std::net::SocketAddr;

use crate::db::DbConfig;
use crate::error::StartupError;

pub const DEFAULT_JWT_SECRET: &str = "default-jwt-secret-change-in-production";

/// Origins the front-end dev servers run on.
const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:3000",
    "http://localhost:5173",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    /// `None` runs the server on the seeded in-memory store.
    pub database: Option<DbConfig>,
    pub allowed_origins: Vec<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            environment: "development".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            database: None,
            allowed_origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            database: std::env::var("DATABASE_URL")
                .ok()
                .map(|_| DbConfig::default()),
            allowed_origins,
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.bcrypt_cost),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| StartupError::Config(format!("invalid HOST/PORT {}:{}", self.host, self.port)))
    }

    /// Refuse to start in production with the default secret; warn about
    /// default admin credentials.
    pub fn validate(&self) -> Result<(), StartupError> {
        if !self.is_production() {
            return Ok(());
        }
        if self.jwt_secret.is_empty() || self.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(StartupError::Config(
                "JWT_SECRET must be set to a secure, unique value in production".to_string(),
            ));
        }
        if self.database.is_none() && self.admin_password == "admin" {
            tracing::warn!(
                "SECURITY: ADMIN_PASSWORD is using the insecure default 'admin'. \
                 Set ADMIN_PASSWORD or configure DATABASE_URL."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_in_development() {
        let config = AppConfig::default();
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 3001);
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(StartupError::Config(_))));
    }

    #[test]
    fn test_production_accepts_custom_secret() {
        let config = AppConfig {
            environment: "production".to_string(),
            jwt_secret: "a-long-random-secret".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
