//! Logger initialization.
//!
//! Everything logs through the `log` facade; this module installs `env_logger` as the backend.
//! Output goes to standard output by default so the resize diagnostics show up on the console
//! next to anything else the program prints.

use std::sync::Once;

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "quad_core=debug,wgpu=warn").
/// When it is `None`, `RUST_LOG` is consulted, and the fallback is `info` for this crate and
/// `warn` for everything else. [`DIAGNOSTICS_TARGET`] is enabled at `info` on top of any of
/// these.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            target: LogTarget::Stdout,
        }
    }
}

/// Log target of the per-resize projection line. It stays at `info` under every filter.
pub const DIAGNOSTICS_TARGET: &str = "quad_core::diagnostics";

static INIT: Once = Once::new();

/// Builds the logger for `config`. `rust_log` is the value of `RUST_LOG`, if set.
fn builder(config: &LoggingConfig, rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter.as_deref().or(rust_log) {
        builder.parse_filters(filter);
    } else {
        // wgpu is chatty at info level
        builder
            .filter_level(log::LevelFilter::Warn)
            .filter_module("quad_core", log::LevelFilter::Info);
    }
    builder.filter_module(DIAGNOSTICS_TARGET, log::LevelFilter::Info);

    builder.write_style(config.write_style);
    builder.target(match config.target {
        LogTarget::Stdout => env_logger::Target::Stdout,
        LogTarget::Stderr => env_logger::Target::Stderr,
    });
    builder
}

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let mut builder = builder(&config, rust_log.as_deref());

        // Tests may have installed a logger already.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            env_filter: Some("debug".to_string()),
            ..LoggingConfig::default()
        });
        log::info!("still logging");
    }

    fn enabled(logger: &env_logger::Logger, target: &str, level: log::Level) -> bool {
        log::Log::enabled(logger, &log::Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn default_filter_quiets_dependencies() {
        let logger = builder(&LoggingConfig::default(), None).build();
        assert!(enabled(&logger, "quad_core::frame", log::Level::Info));
        assert!(!enabled(&logger, "wgpu_core::device", log::Level::Info));
        assert!(enabled(&logger, "wgpu_core::device", log::Level::Warn));
    }

    #[test]
    fn diagnostics_survive_restrictive_filters() {
        let logger = builder(&LoggingConfig::default(), Some("wgpu=debug")).build();
        assert!(!enabled(&logger, "quad_core::frame", log::Level::Info));
        assert!(enabled(&logger, DIAGNOSTICS_TARGET, log::Level::Info));

        let config = LoggingConfig {
            env_filter: Some("off".to_string()),
            ..LoggingConfig::default()
        };
        let logger = builder(&config, Some("debug")).build();
        assert!(enabled(&logger, DIAGNOSTICS_TARGET, log::Level::Info));
        assert!(!enabled(&logger, DIAGNOSTICS_TARGET, log::Level::Debug));
    }
}
