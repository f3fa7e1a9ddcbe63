/*!
 * Logging Module
 * Subscriber setup and HTTP request logging
 */
pub mod config;
pub mod middleware;

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use config::{LogConfig, LogFormat};

/// Install the global subscriber.
///
/// The returned guards flush the background writers when dropped, so the
/// caller must hold them for the lifetime of the process.
pub fn init(config: &LogConfig) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let (console_writer, console_guard) = non_blocking(io::stdout());
    guards.push(console_guard);

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

    if let Some(dir) = &config.directory {
        std::fs::create_dir_all(dir).ok();

        // All logs, plus errors only in a separate file
        let (file_writer, file_guard) = non_blocking(rolling::daily(dir, "app.log"));
        let (error_writer, error_guard) = non_blocking(rolling::daily(dir, "error.log"));
        guards.push(file_guard);
        guards.push(error_guard);

        match config.format {
            LogFormat::Json => {
                layers.push(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true)
                        .boxed(),
                );
                layers.push(
                    fmt::layer()
                        .json()
                        .with_writer(error_writer)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR)
                        .boxed(),
                );
            }
            LogFormat::Pretty => {
                layers.push(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_ansi(false)
                        .boxed(),
                );
                layers.push(
                    fmt::layer()
                        .with_writer(error_writer)
                        .with_ansi(false)
                        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR)
                        .boxed(),
                );
            }
        }
    }

    match config.format {
        LogFormat::Json => layers.push(
            fmt::layer()
                .json()
                .with_writer(console_writer)
                .with_target(false)
                .boxed(),
        ),
        LogFormat::Pretty => layers.push(
            fmt::layer()
                .with_writer(console_writer)
                .with_target(true)
                .pretty()
                .boxed(),
        ),
    }

    // A second init (tests, embedding) keeps the first subscriber.
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .is_ok()
    {
        tracing::info!("Logging initialized for {} environment", config.environment);
    }

    guards
}
