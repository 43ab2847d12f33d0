/// Convenience result type used across the crate.
pub type KymoResult<T> = Result<T, KymoError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is recoverable: a declined operation leaves prior state untouched.
#[derive(thiserror::Error, Debug)]
pub enum KymoError {
    /// The request was declined because of what the user supplied (no key frames,
    /// mismatched vertex counts, anchor already set).
    #[error("user input error: {0}")]
    UserInput(String),

    /// Structurally invalid data (zero line width, frame outside the stack, bad buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// The cooperative cancel flag was raised between rows.
    #[error("kymograph assembly cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KymoError {
    /// Build a [`KymoError::UserInput`] value.
    pub fn user_input(msg: impl Into<String>) -> Self {
        Self::UserInput(msg.into())
    }

    /// Build a [`KymoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Return `true` for errors that represent a declined user request.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::UserInput(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
