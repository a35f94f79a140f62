//! Tracing setup.
//!
//! The widget owns the terminal, so log output only ever goes to a file.
//! Without a configured file no subscriber is installed at all.

use crate::config::{LogConfig, LogFormat};
use crate::error::{Result, SearchboxError};
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable whose directives override the configured level.
pub const LOG_ENV: &str = "SEARCHBOX_LOG";

/// Installs the global subscriber described by `config`.
///
/// The returned guard flushes buffered lines when dropped and must live as
/// long as the program logs.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let Some(path) = config.file.as_ref() else {
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SearchboxError::Io {
            path: path.clone(),
            source,
        })?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(env_filter(config)?)
        .with_level(true)
        .with_ansi(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| {
        SearchboxError::InvalidConfig(format!("cannot install log subscriber: {err}"))
    })?;

    Ok(Some(guard))
}

fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        return EnvFilter::try_new(&directives).map_err(|err| {
            SearchboxError::InvalidConfig(format!("{LOG_ENV}='{directives}': {err}"))
        });
    }
    EnvFilter::try_new(&config.level).map_err(|err| {
        SearchboxError::InvalidConfig(format!("log level '{}': {err}", config.level))
    })
}

#[cfg(test)]
mod tests {
    use super::init;
    use crate::config::LogConfig;

    #[test]
    fn no_file_means_no_subscriber() {
        let guard = init(&LogConfig::default()).expect("init succeeds");
        assert!(guard.is_none());
    }

    #[test]
    fn unopenable_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = LogConfig {
            file: Some(dir.path().join("missing").join("searchbox.log")),
            ..LogConfig::default()
        };
        assert!(matches!(
            init(&config),
            Err(crate::error::SearchboxError::Io { .. })
        ));
    }
}
