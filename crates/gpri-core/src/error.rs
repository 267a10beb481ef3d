//! Error types for gpri-core

/// Result type alias for gpri operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gpri operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed step input
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request could not be sent or the response could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response from the GitHub API
    #[error("{0}")]
    Api(String),

    /// API rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Response body is not the expected event array
    #[error("{0}")]
    Payload(String),

    /// The target commit is not among the fetched merge events
    #[error("No merge event found: {0}")]
    NoMatch(String),

    /// Writing to the pipeline environment store failed
    #[error("Export error: {0}")]
    Export(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime error (Tokio, client construction)
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport(format!("request timed out: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Payload(format!("Failed to parse github events: {}", err))
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Configuration error
    Config,
    /// Transport error
    Transport,
    /// HTTP status error
    Api,
    /// API rate limit exceeded
    RateLimitExceeded,
    /// Malformed event feed
    Payload,
    /// No merge event for the target commit
    NoMatch,
    /// Export error
    Export,
    /// I/O operation error
    Io,
    /// Runtime error
    Runtime,
}

/// Coarse failure class, one per process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Step inputs missing or unparseable
    Configuration,
    /// Network failure
    Transport,
    /// The API answered, but not with what we expected
    Protocol,
    /// Pipeline environment store rejected a value
    Export,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Taxonomy bucket for this kind.
    pub const fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::Config => ErrorCategory::Configuration,
            ErrorKind::Transport => ErrorCategory::Transport,
            ErrorKind::Api
            | ErrorKind::RateLimitExceeded
            | ErrorKind::Payload
            | ErrorKind::NoMatch => ErrorCategory::Protocol,
            ErrorKind::Export => ErrorCategory::Export,
            ErrorKind::Io | ErrorKind::Runtime => ErrorCategory::Internal,
        }
    }

    /// Process exit code the CLI terminates with.
    pub const fn exit_code(self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Transport => 3,
            ErrorCategory::Protocol => 4,
            ErrorCategory::Export => 5,
            ErrorCategory::Internal => 1,
        }
    }
}

impl Error {
    /// Get the error kind — zero allocation, returns a Copy enum.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Api(_) => ErrorKind::Api,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::Payload(_) => ErrorKind::Payload,
            Error::NoMatch(_) => ErrorKind::NoMatch,
            Error::Export(_) => ErrorKind::Export,
            Error::Io(_) => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// Borrow the error message — zero allocation.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::Transport(msg)
            | Error::Api(msg)
            | Error::RateLimitExceeded(msg)
            | Error::Payload(msg)
            | Error::NoMatch(msg)
            | Error::Export(msg)
            | Error::Runtime(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }

    /// Shorthand for `self.kind().exit_code()`.
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_zero_alloc() {
        assert_eq!(std::mem::size_of::<ErrorKind>(), 1);
    }

    #[test]
    fn test_error_message_borrows() {
        let err = Error::Config("commitSHA is empty!".to_string());
        let msg: &str = err.message();
        assert_eq!(msg, "commitSHA is empty!");
    }

    #[test]
    fn test_all_error_variants_have_kind() {
        let cases: Vec<(Error, ErrorKind)> = vec![
            (Error::Config("c".into()), ErrorKind::Config),
            (Error::Transport("t".into()), ErrorKind::Transport),
            (Error::Api("a".into()), ErrorKind::Api),
            (
                Error::RateLimitExceeded("rl".into()),
                ErrorKind::RateLimitExceeded,
            ),
            (Error::Payload("p".into()), ErrorKind::Payload),
            (Error::NoMatch("n".into()), ErrorKind::NoMatch),
            (Error::Export("e".into()), ErrorKind::Export),
            (Error::Io(std::io::Error::other("io")), ErrorKind::Io),
            (Error::Runtime("r".into()), ErrorKind::Runtime),
        ];

        for (err, expected_kind) in cases {
            assert_eq!(err.kind(), expected_kind, "Mismatch for {:?}", err);
        }
    }

    #[test]
    fn test_exit_codes_follow_categories() {
        assert_eq!(Error::Config("c".into()).exit_code(), 2);
        assert_eq!(Error::Transport("t".into()).exit_code(), 3);
        assert_eq!(Error::Api("a".into()).exit_code(), 4);
        assert_eq!(Error::RateLimitExceeded("r".into()).exit_code(), 4);
        assert_eq!(Error::Payload("p".into()).exit_code(), 4);
        assert_eq!(Error::NoMatch("n".into()).exit_code(), 4);
        assert_eq!(Error::Export("e".into()).exit_code(), 5);
        assert_eq!(Error::Runtime("r".into()).exit_code(), 1);
    }

    #[test]
    fn test_every_exit_code_is_nonzero() {
        let kinds = [
            ErrorKind::Config,
            ErrorKind::Transport,
            ErrorKind::Api,
            ErrorKind::RateLimitExceeded,
            ErrorKind::Payload,
            ErrorKind::NoMatch,
            ErrorKind::Export,
            ErrorKind::Io,
            ErrorKind::Runtime,
        ];
        for kind in kinds {
            assert_ne!(kind.exit_code(), 0, "{:?} must fail the step", kind);
        }
    }

    #[test]
    fn test_json_error_is_payload() {
        let err: Error = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Payload);
        assert!(err.message().starts_with("Failed to parse github events:"));
    }

    #[test]
    fn test_api_error_displays_message_verbatim() {
        let err = Error::Api("HTTP error 404 Not Found; error message: Not Found".into());
        assert_eq!(
            err.to_string(),
            "HTTP error 404 Not Found; error message: Not Found"
        );
    }
}
