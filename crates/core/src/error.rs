//! Domain error types.

/// Errors produced by core domain logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored value could not be parsed into its domain type.
    #[error("Parse error: {0}")]
    Parse(String),
}
