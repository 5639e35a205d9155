pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    Config, ConfigError, DisplayConfig, EndpointConfig, FileLoggingConfig, MessagesConfig, PrivacyLoggingConfig,
    ProseMarkup, WelcomeConfig,
};
pub use error::{Error, Result};
pub use logging::{LogFormat, LoggingConfig, PrivacyConfig, init_logging, redact_content};
