use crate::config::{ConfigError, FileConfig};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};

/// Environment variable that, when set, overrides the configured log filter
const LOG_ENV_VAR: &str = "AUTOSNAKE_LOG";

/// Send `tracing` events to the log file named in `config`.  The terminal
/// belongs to the TUI, so nothing is ever logged to stdout or stderr.
pub(crate) fn init(config: &FileConfig) -> Result<(), LoggingError> {
    let filter = log_filter(std::env::var(LOG_ENV_VAR).ok(), &config.log_level)?;
    let path = config.log_path()?;
    let file = open_log_file(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(LoggingError::Install)?;
    tracing::debug!(path = %path.display(), "Logging started");
    Ok(())
}

fn log_filter(from_env: Option<String>, configured: &str) -> Result<EnvFilter, LoggingError> {
    let directives = from_env.filter(|s| !s.trim().is_empty());
    let directives = directives.as_deref().unwrap_or(configured);
    EnvFilter::try_new(directives).map_err(|source| LoggingError::Filter {
        directives: directives.to_owned(),
        source,
    })
}

fn open_log_file(path: &Path) -> Result<fs_err::File, LoggingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(LoggingError::Open)?;
    }
    fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LoggingError::Open)
}

#[derive(Debug, Error)]
pub(crate) enum LoggingError {
    #[error("failed to determine log file path")]
    Path(#[from] ConfigError),
    #[error("invalid log filter {directives:?}")]
    Filter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install log subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tracing_subscriber::filter::LevelFilter;

    #[rstest]
    #[case(None, "info", LevelFilter::INFO)]
    #[case(Some("debug"), "info", LevelFilter::DEBUG)]
    #[case(Some("  "), "warn", LevelFilter::WARN)]
    #[case(None, "autosnake=trace", LevelFilter::TRACE)]
    fn choose_filter(
        #[case] from_env: Option<&str>,
        #[case] configured: &str,
        #[case] level: LevelFilter,
    ) {
        let filter = log_filter(from_env.map(String::from), configured).unwrap();
        assert_eq!(filter.max_level_hint(), Some(level));
    }

    #[test]
    fn bad_filter() {
        let e = log_filter(Some(String::from("autosnake=loud")), "info").unwrap_err();
        assert!(matches!(e, LoggingError::Filter { ref directives, .. } if directives == "autosnake=loud"));
    }

    #[test]
    fn open_appends() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("logs").join("autosnake.log");
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
