/// Domain-specific error types for foodfinder
///
/// Provides actionable error messages with enough context for callers
/// to correct bad input. Malformed candidate data is never an error;
/// these cover bad requests, configuration, and upstream failures.

#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::provider::ProviderError> for FinderError {
    fn from(e: crate::provider::ProviderError) -> Self {
        FinderError::Provider(e.to_string())
    }
}

impl FinderError {
    /// Helper to create validation errors with field names
    ///
    /// Example:
    /// ```
    /// use foodfinder::errors::FinderError;
    /// let err = FinderError::validation("query", "Query cannot be empty");
    /// ```
    pub fn validation(field: &str, message: &str) -> Self {
        FinderError::Validation {
            message: message.to_string(),
            field: Some(field.to_string()),
        }
    }
}
