// src/application/error_handling.rs
//
// Error Handling for Commands
//
// - Maps internal errors → user-friendly responses
// - Provides a consistent error format for every front end
// - Never exposes internal implementation details
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    /// Text meant for the user
    pub message: String,
    /// Technical detail, when there is something useful to add
    pub details: Option<String>,
}

/// User-facing error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// No connection to a catalog
    Network,

    /// A catalog took too long to answer
    Timeout,

    /// A catalog answered with an error
    Api,

    /// Persistence failure
    Database,

    /// Invalid input or broken invariant
    Validation,

    NotFound,

    /// The search ran but matched nothing
    NoResults,

    Unknown,
}

impl From<&AppError> for ErrorType {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network { .. } => ErrorType::Network,
            AppError::Timeout { .. } => ErrorType::Timeout,
            AppError::Api { .. } => ErrorType::Api,
            AppError::Database(_) | AppError::Pool(_) => ErrorType::Database,
            AppError::Domain(_) | AppError::Validation(_) => ErrorType::Validation,
            AppError::NotFound => ErrorType::NotFound,
            AppError::NoResults => ErrorType::NoResults,
            AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Other(_) => ErrorType::Unknown,
        }
    }
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        let error_type = ErrorType::from(&error);

        let (message, details) = match &error {
            AppError::Network { .. } => (
                "No connection. Check your internet connection and try again".to_string(),
                Some(error.to_string()),
            ),

            AppError::Timeout { .. } => (
                "The request took too long. Try again".to_string(),
                Some(error.to_string()),
            ),

            AppError::Api { status, .. } => (api_message(*status), Some(error.to_string())),

            AppError::Database(_) | AppError::Pool(_) => {
                // Log full error for debugging
                log::error!("Database error: {:?}", error);
                (
                    "Could not save your changes. Try again or restart the app".to_string(),
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Domain(domain_error) => (
                "The change was rejected".to_string(),
                Some(domain_error.to_string()),
            ),

            AppError::Validation(message) => (message.clone(), None),

            AppError::NotFound => ("Book not found in your library".to_string(), None),

            AppError::NoResults => (
                "No books found. Try a different search".to_string(),
                None,
            ),

            AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Other(_) => {
                log::error!("Unexpected error: {:?}", error);
                (
                    "Something went wrong. Please try again".to_string(),
                    Some(error.to_string()),
                )
            }
        };

        Self {
            success: false,
            error_type,
            message,
            details,
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self {
            success: false,
            error_type: ErrorType::Validation,
            message,
            details: None,
        }
    }
}

fn api_message(status: Option<u16>) -> String {
    match status {
        Some(404) => "Nothing was found for that search".to_string(),
        Some(429) => "Too many searches. Wait a moment and try again".to_string(),
        Some(500) | Some(502) | Some(503) => {
            "The server is having problems. Try again later".to_string()
        }
        Some(code) => format!("Server error ({}). Try again later", code),
        None => "The server sent an unexpected response. Try again later".to_string(),
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}
