use std::path::PathBuf;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, for development
    Pretty,
    /// One JSON object per line, for production
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub environment: String,
    pub level: String,
    pub format: LogFormat,
    /// Directory for the rolling files; `None` logs to stdout only.
    pub directory: Option<PathBuf>,
}

impl LogConfig {
    /// `ENVIRONMENT`, `LOG_LEVEL` and `LOG_DIR` from the environment.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if is_production {
                "info".to_string()
            } else {
                "debug".to_string()
            }
        });

        let directory = match std::env::var("LOG_DIR") {
            Ok(dir) if dir.is_empty() || dir == "none" => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => Some(PathBuf::from("logs")),
        };

        Self {
            environment,
            level,
            format: if is_production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            directory,
        }
    }

    /// Default filter directive when `RUST_LOG` is not set.
    pub fn filter_directive(&self) -> String {
        format!(
            "portfolio_site={},tower_http=debug,axum=debug",
            self.level
        )
    }
}
