//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments
//! Features:
//! - Console output (pretty in development, JSON in production)
//! - Daily rotating application logs `shop.YYYY-MM-DD.log` (deleted after 14 days)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Rolling file name prefix
const LOG_FILE_PREFIX: &str = "shop";
/// Rolling file name suffix
const LOG_FILE_SUFFIX: &str = "log";
/// Days to keep application logs
const LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files (older than 14 days)
///
/// Returns the number of deleted files
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    use chrono::Local;

    let cutoff = (Local::now() - chrono::Duration::days(LOG_RETENTION_DAYS)).date_naive();
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Match shop.YYYY-MM-DD.log pattern
        let date = name
            .strip_prefix(LOG_FILE_PREFIX)
            .and_then(|d| d.strip_prefix('.'))
            .and_then(|d| d.strip_suffix(LOG_FILE_SUFFIX))
            .and_then(|d| d.strip_suffix('.'))
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        if let Some(date) = date
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format (true for production, false for development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(dir) = log_dir else {
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    fs::create_dir_all(dir)?;

    let app_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)?;

    let file_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(app_log))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(app_log))
            .boxed()
    };

    subscriber.with(console_layer).with(file_layer).try_init()?;

    // Start cleanup task
    tokio::spawn(periodic_cleanup(dir.to_path_buf()));

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }

        sleep(Duration::from_secs(3600)).await; // Run every hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = TempDir::new().unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();

        let old = dir.path().join("shop.2000-01-01.log");
        let fresh = dir.path().join(format!("shop.{today}.log"));
        let unrelated = dir.path().join("notes.2000-01-01.log");
        for path in [&old, &fresh, &unrelated] {
            fs::write(path, "x").unwrap();
        }

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = TempDir::new().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing")).unwrap(), 0);
    }
}
