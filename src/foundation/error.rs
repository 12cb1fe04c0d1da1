/// Convenience result type used across AutoSize.
pub type AutoSizeResult<T> = Result<T, AutoSizeError>;

/// Top-level error taxonomy used by adaptation APIs.
#[derive(thiserror::Error, Debug)]
pub enum AutoSizeError {
    /// A design size that is not strictly positive (or not finite) reached the computation.
    #[error("invalid design size: {0}")]
    InvalidDesignSize(f32),

    /// A baseline value required by the active unit policy was never captured.
    #[error("missing baseline: {0}")]
    MissingBaseline(String),

    /// Invalid user-provided configuration or metrics data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AutoSizeError {
    /// Build a [`AutoSizeError::MissingBaseline`] value.
    pub fn missing_baseline(msg: impl Into<String>) -> Self {
        Self::MissingBaseline(msg.into())
    }

    /// Build a [`AutoSizeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AutoSizeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
