//! Configuration errors reported at startup

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is unset or empty
    #[error("missing required configuration value: {field}")]
    Missing { field: &'static str },

    #[error("{field} is not a valid URL ({value:?}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// Base URL whose path does not end in `/`, so the slug would not be a path segment
    #[error("{field} must end with '/', got {value:?}")]
    MissingTrailingSlash { field: &'static str, value: String },

    /// The slug did not end up as the last path segment of the URL
    #[error("{field} does not address the application slug: {value:?}")]
    SlugNotInPath { field: &'static str, value: String },

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    /// Asset path is absolute or escapes the asset root
    #[error("{field} must be a relative path under the asset root, got {path:?}")]
    InvalidAssetPath { field: &'static str, path: String },

    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::Missing { field }
            | ConfigError::InvalidUrl { field, .. }
            | ConfigError::MissingTrailingSlash { field, .. }
            | ConfigError::SlugNotInPath { field, .. }
            | ConfigError::InvalidValue { field, .. }
            | ConfigError::InvalidAssetPath { field, .. } => Some(*field),
            ConfigError::Io { .. } | ConfigError::Parse { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
