//! Logging setup shared by the Quill binaries
//!
//! Every binary builds a [`LoggingConfig`] and calls [`LoggingConfig::init`]
//! once at startup. The CLI logs to stderr; the TUI owns the terminal and
//! sends its log to a file instead.
//!
//! ```no_run
//! use libquill::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "info".to_string(), false).init();
//! ```
//!
//! `QUILL_LOG_FORMAT` (`text`, `json`, `pretty`) and `QUILL_LOG_LEVEL` are
//! read by [`config_from_env`]; `RUST_LOG` always wins over the level.

use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain lines, no colors
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, colored when writing to a terminal
    Pretty,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [LogFormat::Text, LogFormat::Json, LogFormat::Pretty]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid log format: '{}'. Valid options: text, json, pretty",
                    s
                )
            })
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Forces `debug`
    pub verbose: bool,
    /// Log file; `None` means stderr
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            file: None,
        }
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file = Some(path);
        self
    }

    fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    fn writer(&self) -> BoxMakeWriter {
        let Some(path) = &self.file else {
            return BoxMakeWriter::new(std::io::stderr);
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
            // Never stderr: the terminal belongs to the UI
            Err(_) => BoxMakeWriter::new(std::io::sink),
        }
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already installed
    pub fn init(&self) {
        let ansi = self.file.is_none();
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(self.writer());

        match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_target(true)
                .init(),
            LogFormat::Pretty => builder
                .pretty()
                .with_ansi(ansi)
                .with_file(true)
                .with_line_number(true)
                .init(),
            LogFormat::Text => builder.with_ansi(false).with_target(false).init(),
        }
    }
}

/// Format and level from `QUILL_LOG_FORMAT` / `QUILL_LOG_LEVEL`
///
/// An unparseable format falls back to text.
pub fn config_from_env(default_level: &str) -> LoggingConfig {
    let format = std::env::var("QUILL_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var("QUILL_LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());

    LoggingConfig::new(format, level, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_format_parsing_ignores_case() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("TEXT".parse::<LogFormat>(), Ok(LogFormat::Text));
    }

    #[test]
    fn test_unknown_format_names_valid_options() {
        let error = "xml".parse::<LogFormat>().unwrap_err();
        assert!(error.contains("'xml'"));
        assert!(error.contains("text, json, pretty"));
    }

    #[test]
    fn test_file_destination() {
        let config = LoggingConfig::new(LogFormat::Text, "warn".to_string(), false)
            .with_file(PathBuf::from("/tmp/quill-tui.log"));

        assert_eq!(config.file, Some(PathBuf::from("/tmp/quill-tui.log")));
        assert_eq!(config.level, "warn");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("QUILL_LOG_FORMAT", "json");
        std::env::set_var("QUILL_LOG_LEVEL", "trace");
        let config = config_from_env("info");
        std::env::remove_var("QUILL_LOG_FORMAT");
        std::env::remove_var("QUILL_LOG_LEVEL");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "trace");
    }

    #[test]
    #[serial]
    fn test_bad_env_format_falls_back_to_text() {
        std::env::set_var("QUILL_LOG_FORMAT", "yaml");
        std::env::remove_var("QUILL_LOG_LEVEL");
        let config = config_from_env("warn");
        std::env::remove_var("QUILL_LOG_FORMAT");

        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "warn");
    }
}
