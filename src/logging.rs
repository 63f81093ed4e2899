//! Logging configuration for ragfant

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

const LOG_FILE_PREFIX: &str = "ragfant.log";

/// Initialize logging from configuration, `verbose` forces debug level
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    init_logging_with_level(level, &config.log_dir, config.file_output)
}

/// Initialize logging with custom log level
pub fn init_logging_with_level(level: &str, log_dir: &str, file_output: bool) -> Result<()> {
    // RUST_LOG wins over the configured level when set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},ragfant={level}")));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = if file_output {
        let logs_dir = Path::new(log_dir);
        if !logs_dir.exists() {
            std::fs::create_dir_all(logs_dir)?;
        }

        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Keep the writer alive for the whole process
        std::mem::forget(guard);

        Some(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .with_ansi(false)
                .boxed(),
        )
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::RagfantError::Config(format!("logging already initialized: {e}")))?;

    tracing::debug!("Logging initialized with level: {}", level);
    if file_output {
        tracing::debug!("Log files will be saved to: {log_dir}/{LOG_FILE_PREFIX}.YYYY-MM-DD");
    }

    Ok(())
}

/// Initialize simple logging for testing
pub fn init_simple_logging() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
    Ok(())
}
