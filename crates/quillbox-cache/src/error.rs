//! Cache error types.

/// Errors that can occur during cache operations.
///
/// Cache errors are optimization-path concerns: callers recover locally and
/// never surface them, so the taxonomy stays deliberately small.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to obtain a connection to the cache backend.
    #[error("Cache connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A cache command failed against a reachable backend.
    #[error("Cache backend error: {message}")]
    Backend {
        /// Description of the command failure.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CacheError::connection("refused").to_string(),
            "Cache connection error: refused"
        );
        assert_eq!(
            CacheError::backend("timeout").to_string(),
            "Cache backend error: timeout"
        );
    }
}
