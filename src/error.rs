use thiserror::Error;

/// Main error type for the analytics engine
#[derive(Error, Debug)]
pub enum AnalyticsError {
    // Input validation errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown variables: {names:?}")]
    UnknownVariables { names: Vec<String> },

    #[error("Column length mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Fitted-transform misuse
    #[error("Transform not fitted: {transform}")]
    NotFitted { transform: &'static str },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AnalyticsError
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Shorthand for an `InvalidInput` with a formatted message
    pub fn invalid(msg: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput(msg.into())
    }
}
