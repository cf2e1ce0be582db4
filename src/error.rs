use crate::catalog::validation::ValidationErrors;
use thiserror::Error;

const FALLBACK_FETCH_MESSAGE: &str = "Failed to fetch properties";

/// Errors raised by the catalog client
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never completed (connection refused, timeout, DNS...)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a failure status
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Creation form rejected locally; nothing was sent
    #[error("invalid property: {0}")]
    Validation(ValidationErrors),

    #[error("property not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CatalogError {
    /// Single human-readable message shown in place of the result list
    pub fn user_message(&self) -> String {
        let message = match self {
            CatalogError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            CatalogError::Status { status, .. } => format!("Request failed with status {}", status),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            FALLBACK_FETCH_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
