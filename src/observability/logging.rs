use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{CleanerError, Result};

/// Initializes the logging system with both console and file output.
///
/// Console lines go to stdout; the same lines, without ANSI colours, are
/// appended to `log_file`. `RUST_LOG` overrides `default_filter` when set.
/// The returned guard must be held until exit so the file sink is flushed.
pub fn init_logging(log_file: &Path, default_filter: &str) -> Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CleanerError::Logging(format!("invalid log file path '{}'", log_file.display()))
        })?;

    std::fs::create_dir_all(directory).map_err(|source| CleanerError::Write {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| CleanerError::Logging(e.to_string()))?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking_writer);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stdout);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CleanerError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing::info;

    #[test]
    fn test_log_lines_reach_the_file_in_a_new_directory() {
        let dir = tempdir().unwrap();
        let log_file = dir.path().join("logs").join("processing.log");

        let guard = init_logging(&log_file, "info").unwrap();
        info!("Validating 3 records");
        drop(guard);

        let text = std::fs::read_to_string(&log_file).unwrap();
        let line = text
            .lines()
            .find(|line| line.contains("Validating 3 records"))
            .unwrap();
        assert!(line.contains("INFO"));
        assert!(!line.contains('\u{1b}'), "file output has no ANSI codes");
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let err = init_logging(Path::new("/"), "info").unwrap_err();
        assert!(matches!(err, CleanerError::Logging(_)));
    }
}
