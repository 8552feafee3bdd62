//! Chat error types

use thiserror::Error;

use crate::providers::ProviderError;

/// Errors that end a user turn early
///
/// Tool failures never appear here; they are reported to the model as text.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The model backend could not produce a reply
    #[error("{0}")]
    Backend(#[from] ProviderError),
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_passes_through() {
        let err: ChatError = ProviderError::Other("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
