//! Error types for the ranking engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need to branch on a specific failure can
//! `downcast_ref::<RankingError>()` the returned error.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Entity not found: {entity_id}")]
    EntityNotFound { entity_id: String },

    #[error("Invalid match record: {reason}")]
    InvalidMatchRecord { reason: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl RankingError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity_id: impl Into<String>) -> Self {
        Self::EntityNotFound {
            entity_id: entity_id.into(),
        }
    }
}
