use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::logging::LogFormat;

/// How prose text in a reply is turned into markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProseMarkup {
    /// Escape every markup-significant character (default)
    #[default]
    Escape,
    /// Treat prose as markup, but pass it through the allow-list sanitizer
    Sanitize,
}

impl ProseMarkup {
    pub const VALUES: &[ProseMarkup] = &[ProseMarkup::Escape, ProseMarkup::Sanitize];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProseMarkup::Escape => "escape",
            ProseMarkup::Sanitize => "sanitize",
        }
    }
}

impl std::fmt::Display for ProseMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProseMarkup {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "escape" => Ok(ProseMarkup::Escape),
            "sanitize" => Ok(ProseMarkup::Sanitize),
            _ => Err(ConfigError::InvalidProseMarkup(s.to_string()).into()),
        }
    }
}

/// Where chat messages are posted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Scheme and host of the chat backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint path, relative to `base_url`
    #[serde(default = "default_endpoint_path")]
    pub path: String,

    /// Transport timeout; unset means the client never gives up on its own
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl EndpointConfig {
    /// Full URL the controller posts to
    pub fn url(&self) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            return self.path.clone();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.path.trim_start_matches('/'))
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), path: default_endpoint_path(), timeout_secs: None }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_endpoint_path() -> String {
    "chatbot.php".to_string()
}

/// Presentation settings for rendered entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Identity tag prefixed to assistant replies
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    #[serde(default)]
    pub prose_markup: ProseMarkup,

    /// syntect theme used for the highlight stylesheet and terminal output
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { assistant_name: default_assistant_name(), prose_markup: ProseMarkup::default(), theme: default_theme() }
    }
}

fn default_assistant_name() -> String {
    "NBFDEV AI".to_string()
}

fn default_theme() -> String {
    "base16-ocean.dark".to_string()
}

/// Fixed texts the controller renders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagesConfig {
    /// Placeholder shown while a request is in flight
    pub thinking: String,
    /// Reply when the backend answered with neither `response` nor `error`
    pub no_response: String,
    /// Reply when the request never completed
    pub connection_error: String,
    /// Prefix for HTTP error replies
    pub error_prefix: String,
    /// Fallback for an HTTP error without a parseable body; `{status}` is substituted
    pub status_error: String,
}

impl MessagesConfig {
    /// Status fallback text with the status code filled in
    pub fn status_error_for(&self, status: u16) -> String {
        self.status_error.replace("{status}", &status.to_string())
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            thinking: "Thinking...".to_string(),
            no_response: "No response from the server".to_string(),
            connection_error: "Could not connect to the server. Please check your internet connection.".to_string(),
            error_prefix: "Error: ".to_string(),
            status_error: "Server responded with status {status}".to_string(),
        }
    }
}

/// Startup greeting surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WelcomeConfig {
    /// Banner text shown in the transcript until the first keystroke
    pub banner: Option<String>,
    /// Text of the one-time startup modal
    pub modal: Option<String>,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self { banner: Some("I am NBFDEV AI. How can I help?".to_string()), modal: None }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive for stderr output
    pub level: String,
    /// `pretty`, `json` or `compact`
    pub format: String,
    pub file: FileLoggingConfig,
    pub privacy: PrivacyLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            file: FileLoggingConfig::default(),
            privacy: PrivacyLoggingConfig::default(),
        }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string() }
    }
}

/// `[logging.privacy]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrivacyLoggingConfig {
    /// Include message text in log events
    pub log_message_content: bool,
    /// Maximum characters of message text kept in a log event
    pub truncate_length: usize,
}

impl Default for PrivacyLoggingConfig {
    fn default() -> Self {
        Self { log_message_content: false, truncate_length: 200 }
    }
}

/// Root configuration structure for chatpane.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let base_url = &self.endpoint.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.clone()).into());
        }

        if self.endpoint.path.trim().is_empty() {
            return Err(ConfigError::MissingField("endpoint.path".to_string()).into());
        }

        if self.endpoint.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout.into());
        }

        if self.display.assistant_name.trim().is_empty() {
            return Err(ConfigError::MissingField("display.assistant_name".to_string()).into());
        }

        if LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(ConfigError::InvalidLogFormat(self.logging.format.clone()).into());
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# chatpane configuration example
# Copy this file to chatpane.toml and customize as needed

[endpoint]
# Scheme and host of the chat backend
base_url = "http://localhost:8000"
# Path of the chat endpoint, relative to base_url
path = "chatbot.php"
# Transport timeout in seconds (optional, unset = wait indefinitely)
# timeout_secs = 60

[display]
# Identity tag prefixed to assistant replies
assistant_name = "NBFDEV AI"
# Prose handling: "escape" (default) or "sanitize"
prose_markup = "escape"
# syntect theme for code highlighting
theme = "base16-ocean.dark"

[messages]
thinking = "Thinking..."
no_response = "No response from the server"
connection_error = "Could not connect to the server. Please check your internet connection."
error_prefix = "Error: "
status_error = "Server responded with status {status}"

[welcome]
banner = "I am NBFDEV AI. How can I help?"
# modal = "Welcome! Report problems to the maintainers."

[logging]
level = "warn"
format = "pretty"

[logging.file]
enabled = false
level = "debug"

[logging.privacy]
log_message_content = false
truncate_length = 200
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base URL is not http(s)
    #[error("invalid base URL (expected http:// or https://): {0}")]
    InvalidBaseUrl(String),

    /// A required value is empty
    #[error("missing value: {0}")]
    MissingField(String),

    /// Timeout of zero seconds
    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,

    /// Invalid prose markup mode
    #[error("invalid prose markup: {0}")]
    InvalidProseMarkup(String),

    /// Invalid log format
    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
