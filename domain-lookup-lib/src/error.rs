//! Error handling for fatal lookup-engine failures.
//!
//! Only startup problems end up here: fetching or parsing the bootstrap
//! document, invalid configuration, unreadable input files. Failures while
//! resolving a single domain are reported as a [`LookupOutcome`] instead and
//! never abort the batch.
//!
//! [`LookupOutcome`]: crate::LookupOutcome

use std::fmt;

/// Main error type for the domain lookup library.
#[derive(Debug, Clone)]
pub enum LookupError {
    /// The bootstrap document could not be fetched
    Bootstrap { url: String, message: String },

    /// A document (bootstrap JSON, config TOML) could not be parsed
    Parse { message: String },

    /// The bootstrap document carried no services
    EmptyRegistry,

    /// A bootstrap service entry was not a `[labels, urls]` pair
    MalformedService { index: usize, elements: usize },

    /// Configuration errors (invalid settings, etc.)
    Config { message: String },

    /// File I/O errors when reading domain lists or config files
    File { path: String, message: String },

    /// Network-related errors outside of a single domain lookup
    Network {
        message: String,
        source: Option<String>,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl LookupError {
    /// Create a new bootstrap fetch error.
    pub fn bootstrap<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Bootstrap {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from building the registry directory.
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            Self::Bootstrap { .. } | Self::EmptyRegistry | Self::MalformedService { .. }
        )
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap { url, message } => {
                write!(f, "Bootstrap error for '{}': {}", url, message)
            }
            Self::Parse { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::EmptyRegistry => {
                write!(
                    f,
                    "RDAP services list is empty: no routing information available"
                )
            }
            Self::MalformedService { index, elements } => {
                write!(
                    f,
                    "RDAP service #{} is not a tuple: expected 2 elements, found {}",
                    index, elements
                )
            }
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::File { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Network { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON parsing failed: {}", err))
    }
}

impl From<toml::de::Error> for LookupError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_message() {
        let msg = LookupError::EmptyRegistry.to_string();
        assert!(msg.contains("empty"));
        assert!(msg.contains("no routing information available"));
    }

    #[test]
    fn test_malformed_service_message() {
        let err = LookupError::MalformedService {
            index: 3,
            elements: 1,
        };
        assert_eq!(
            err.to_string(),
            "RDAP service #3 is not a tuple: expected 2 elements, found 1"
        );
        assert!(err.is_registry_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LookupError = json_err.into();
        assert!(matches!(err, LookupError::Parse { .. }));
        assert!(!err.is_registry_error());
    }
}
