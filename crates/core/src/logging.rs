//! Logging built on the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `CHATPANE_LOG`: Filter directive (like `RUST_LOG`), e.g., `chatpane_ui=debug`
//! - `CHATPANE_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `CHATPANE_LOG_DIR`: Directory for the rolling file log (default `~/.chatpane/logs/`)
//!
//! # Configuration
//!
//! Logging is configured via the `[logging]` section in `chatpane.toml`:
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = false
//! level = "debug"
//!
//! [logging.privacy]
//! log_message_content = false
//! truncate_length = 200
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chatpane_core::logging;
//!
//! let _guard = logging::init_logging(None)?;
//! # Ok::<(), chatpane_core::Error>(())
//! ```

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    /// Get the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Logging configuration wrapper that bridges config and logging modules.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level for stderr output.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
    /// Privacy controls for message text.
    pub privacy: PrivacyConfig,
}

/// Privacy configuration for message text in logs.
#[derive(Debug, Clone, Default)]
pub struct PrivacyConfig {
    /// Include message text in log events.
    pub log_message_content: bool,
    /// Maximum length for truncated content.
    pub truncate_length: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), file: None, privacy: PrivacyConfig::default() }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();

        Self {
            level: config.level,
            format,
            file: if config.file.enabled { Some(config.file) } else { None },
            privacy: PrivacyConfig {
                log_message_content: config.privacy.log_message_content,
                truncate_length: config.privacy.truncate_length,
            },
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable file logging.
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Set privacy configuration.
    pub fn with_privacy(mut self, config: PrivacyConfig) -> Self {
        self.privacy = config;
        self
    }

    /// Filter directive: `CHATPANE_LOG`, then `RUST_LOG`, then the configured level.
    fn filter_directive(&self) -> String {
        env::var("CHATPANE_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone())
    }

    fn build_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.filter_directive()).unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Detect if stderr is a TTY for pretty formatting.
    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("CHATPANE_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        match self.format {
            LogFormat::Pretty if !Self::is_tty() => LogFormat::Compact,
            format => format,
        }
    }

    /// Get the log directory path.
    fn get_log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("CHATPANE_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".chatpane").join("logs"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Sets up an env-based filter, formatted stderr output and, when enabled, a daily-rolling JSON
/// file log. The returned guard flushes the file writer on drop and must be held for the life of
/// the program.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let env_filter = config.build_env_filter();

    let stderr_layer = match config.detect_format() {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
    }
    .with_filter(env_filter);

    let (file_layer, guard) = match &config.file {
        Some(file_config) => {
            let log_dir = LoggingConfig::get_log_dir()?;
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "chatpane.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(&file_config.level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Apply privacy settings to message text before it goes into a log event.
pub fn redact_content(content: &str, privacy: &PrivacyConfig) -> String {
    if !privacy.log_message_content {
        return format!("[REDACTED] ({} chars)", content.chars().count());
    }

    let total = content.chars().count();
    if total <= privacy.truncate_length {
        return content.to_string();
    }

    let mut truncated = content.chars().take(privacy.truncate_length).collect::<String>();
    truncated.push_str("...");
    truncated.push_str(&format!(" ({} total chars)", total));
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
        assert!(!config.privacy.log_message_content);
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .with_level("debug")
            .with_format(LogFormat::Json)
            .with_file_logging(FileLoggingConfig { enabled: true, level: "trace".to_string() })
            .with_privacy(PrivacyConfig { log_message_content: true, truncate_length: 1000 });

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file.as_ref().map(|f| f.level.as_str()), Some("trace"));
        assert!(config.privacy.log_message_content);
        assert_eq!(config.privacy.truncate_length, 1000);
    }

    #[test]
    fn test_logging_config_from_config_section() {
        let mut section = ConfigLoggingConfig::default();
        section.format = "compact".to_string();
        section.privacy.log_message_content = true;

        let config = LoggingConfig::from(section.clone());
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file.is_none());
        assert!(config.privacy.log_message_content);

        section.file.enabled = true;
        let config = LoggingConfig::from(section);
        assert!(config.file.is_some());
    }

    #[test]
    fn test_redact_content_hidden() {
        let privacy = PrivacyConfig { log_message_content: false, truncate_length: 100 };
        assert_eq!(redact_content("secret question", &privacy), "[REDACTED] (15 chars)");
    }

    #[test]
    fn test_redact_content_truncates() {
        let privacy = PrivacyConfig { log_message_content: true, truncate_length: 10 };

        let redacted = redact_content("abcdefghijklmnopqrstuvwxyz", &privacy);
        assert!(redacted.starts_with("abcdefghij..."));
        assert!(redacted.contains("26 total chars"));
    }

    #[test]
    fn test_redact_content_short_passes_through() {
        let privacy = PrivacyConfig { log_message_content: true, truncate_length: 10 };
        assert_eq!(redact_content("short", &privacy), "short");
    }

    #[test]
    fn test_redact_content_counts_chars_not_bytes() {
        let privacy = PrivacyConfig { log_message_content: true, truncate_length: 3 };
        assert_eq!(redact_content("สวัสดี", &privacy), "สวั... (6 total chars)");
    }
}
