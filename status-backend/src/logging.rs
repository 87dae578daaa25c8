use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use anyhow::Context;
use tokio::task;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the non-blocking file writer alive; drop it last in `main`.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Map a configured level name to a known directive, `None` when unknown.
fn resolve_level(level: &str) -> Option<&'static str> {
    let level = level.trim().to_lowercase();
    LEVELS.iter().copied().find(|known| *known == level)
}

/// Install stdout + daily-rotated file logging and start the old-log sweeper.
///
/// Must be called from inside a tokio runtime.
pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
    retention_days: u64,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let resolved = resolve_level(level);

    let builder = EnvFilter::builder()
        .with_default_directive(resolved.unwrap_or("info").parse()?);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    if resolved.is_none() {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    let max_age = Duration::from_secs(60 * 60 * 24 * retention_days);
    start_log_cleanup_task(log_dir, prefix.to_string(), max_age);

    Ok(LoggerGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String, max_age: Duration) {
    task::spawn(async move {
        loop {
            match cleanup_old_logs(&log_dir, &prefix, max_age) {
                Ok(0) => {}
                Ok(deleted) => tracing::info!("Deleted {} old log file(s)", deleted),
                Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::debug!("Old log file deleted: {}", file_name);
            deleted += 1;
        }
    }
    Ok(deleted)
}
