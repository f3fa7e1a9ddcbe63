#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to seed demo content: {0}")]
    Seed(#[from] crate::db::seed::SeedError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
