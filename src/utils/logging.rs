//! Logging setup and configuration

use anyhow::Result;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;

pub const LOG_DIR: &str = "output/logs";

pub struct LoggingGuard {
    pub _guard: tracing_appender::non_blocking::WorkerGuard,
}

pub fn setup_logging(config: &LoggingConfig) -> Result<Arc<LoggingGuard>> {
    let file_appender = tracing_appender::rolling::hourly(LOG_DIR, "og-auto-bot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_json = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
    });
    let console_human = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_ansi(config.color)
            .with_level(true)
    });

    tracing_subscriber::registry()
        .with(console_json)
        .with(console_human)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_level(true)
                .with_ansi(false)
                .compact()
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(config.level.parse()?)
                .from_env_lossy()
        )
        .try_init()?;

    Ok(Arc::new(LoggingGuard { _guard: guard }))
}

pub fn setup_output_directories() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;
    Ok(())
}

/// Logs a caught failure. With `debug` set the whole source chain is printed.
pub fn log_failure(debug: bool, context: &str, err: &(dyn std::error::Error + 'static)) {
    if !debug {
        error!("❌ {}: {}", context, err);
        return;
    }

    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    error!("❌ {}: {}", context, chain.join(" <- caused by: "));
}
