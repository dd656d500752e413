//! Error types for configuration loading.
//!
//! Service-level errors (weather lookups, geolocation, storage) live next to
//! the modules that produce them; this module only covers the configuration
//! layer, which is the one fatal path the binary reports directly to the
//! user. `user_message()` returns a UI-appropriate message.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Returns a user-friendly message suitable for display in the UI.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => {
                "No configuration directory is available on this system."
            }
            ConfigError::Io(_) => "Unable to read your settings. Please try again.",
            ConfigError::ParseError(_) => {
                "Configuration file is malformed. Check your settings."
            }
            ConfigError::SerializeError(_) => "Failed to save settings. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        assert!(!ConfigError::NoConfigDir.user_message().is_empty());
        let io_err = ConfigError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!io_err.user_message().is_empty());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
