use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(sqlrest_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(sqlrest_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {}", .0.display())]
    #[diagnostic(
        code(sqlrest_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(PathBuf),

    #[error("Missing default profile: {0}")]
    #[diagnostic(
        code(sqlrest_config::missing_default_profile),
        help("Ensure the default_profile field references an existing profile")
    )]
    MissingDefaultProfile(String),

    #[error("Missing profile: {0}")]
    #[diagnostic(
        code(sqlrest_config::missing_profile),
        help("Add the profile to your configuration or use an existing one")
    )]
    MissingProfile(String),

    #[error("Invalid gateway URL `{url}` in profile '{profile}'")]
    #[diagnostic(
        code(sqlrest_config::invalid_url),
        help("Use an absolute URL such as http://127.0.0.1:3000")
    )]
    InvalidUrl {
        profile: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme '{scheme}' in profile '{profile}'")]
    #[diagnostic(
        code(sqlrest_config::unsupported_scheme),
        help("Only http and https gateways are supported")
    )]
    UnsupportedScheme { profile: String, scheme: String },

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(sqlrest_config::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(sqlrest_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(sqlrest_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ConfigError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingProfile("staging".to_string());
        assert_eq!(err.to_string(), "Missing profile: staging");

        let err = ConfigError::UnsupportedScheme {
            profile: "default".to_string(),
            scheme: "ftp".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported URL scheme 'ftp' in profile 'default'"
        );
    }

    #[test]
    fn test_io_context() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result
            .with_context(|| "writing config".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "Error while writing config: denied");
    }
}
