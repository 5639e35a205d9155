use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for chatpane-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types shared across the chatpane crates
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend errors (building the client, talking to the endpoint)
    #[error("backend error: {0}")]
    Backend(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("missing endpoint".to_string());
        assert_eq!(err.to_string(), "configuration error: missing endpoint");

        let err = Error::Backend("connection refused".to_string());
        assert_eq!(err.to_string(), "backend error: connection refused");

        let err = Error::Other("plain".to_string());
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_from_config_error() {
        let err: Error = ConfigError::InvalidProseMarkup("raw".to_string()).into();
        assert_eq!(err.to_string(), "configuration error: invalid prose markup: raw");
    }
}
