// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog host unreachable (DNS, refused connection, reset)
    #[error("Network error ({source_name}): {message}")]
    Network { source_name: String, message: String },

    #[error("Request to {source_name} timed out")]
    Timeout { source_name: String },

    /// Catalog answered with a non-success status or an unreadable body
    #[error("{source_name} API error (status {status:?}): {message}")]
    Api {
        source_name: String,
        status: Option<u16>,
        message: String,
    },

    #[error("No results found")]
    NoResults,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify a reqwest failure coming from the named catalog.
    pub fn from_http(source_name: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                source_name: source_name.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Api {
                source_name: source_name.to_string(),
                status: Some(status.as_u16()),
                message: err.to_string(),
            }
        } else if err.is_decode() || err.is_body() {
            Self::Api {
                source_name: source_name.to_string(),
                status: None,
                message: err.to_string(),
            }
        } else {
            Self::Network {
                source_name: source_name.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Validation(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::NoResults).unwrap();
        assert_eq!(json, "\"No results found\"");
    }
}
