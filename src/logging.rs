//! Logging initialisation.
//!
//! Natively a `tracing-subscriber` fmt subscriber prints events, filtered by `RUST_LOG`
//! when set and by the configured level otherwise. In the browser no subscriber is
//! installed: `tracing` forwards events to the `log` facade and `console_log` prints them
//! to the developer console.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use tracing::Level;

use crate::config::LoggingConfig;
use crate::error::EditorError;

/// Parse a level name (`trace`, `debug`, `info`, `warn`, `error`), ignoring case.
pub fn parse_level(raw: &str) -> Result<Level, EditorError> {
    raw.trim()
        .parse::<Level>()
        .map_err(|_| EditorError::InvalidConfig(format!("unknown log level: {raw:?}")))
}

/// Install logging for the current target. Calling it again is harmless.
pub fn init(config: &LoggingConfig) -> Result<(), EditorError> {
    #[cfg(feature = "browser")]
    {
        init_console(config)
    }
    #[cfg(not(feature = "browser"))]
    {
        init_subscriber(config)
    }
}

/// Install the fmt subscriber. `config.level` may be any `EnvFilter` directive.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), EditorError> {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| EditorError::InvalidConfig(format!("invalid log filter {:?}: {e}", config.level)))?,
    };
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init() {
        tracing::debug!(%err, "tracing subscriber already installed");
    }
    Ok(())
}

/// Route panics and log records to the browser console.
#[cfg(feature = "browser")]
pub fn init_console(config: &LoggingConfig) -> Result<(), EditorError> {
    console_error_panic_hook::set_once();
    let level = match parse_level(&config.level)? {
        Level::TRACE => log::Level::Trace,
        Level::DEBUG => log::Level::Debug,
        Level::INFO => log::Level::Info,
        Level::WARN => log::Level::Warn,
        Level::ERROR => log::Level::Error,
    };
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
    Ok(())
}
