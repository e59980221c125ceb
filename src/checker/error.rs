// src/checker/error.rs
// =============================================================================
// Error types for link checking.
//
// There are two very different kinds of failure here, and they travel on
// different channels:
//
// - TransportError: one URL could not be checked (DNS, refused connection,
//   timeout, TLS...). It is stored INSIDE that URL's CheckResult and never
//   aborts the batch.
// - CheckError: the batch dispatcher itself went wrong. This is the only
//   error `check_all` ever returns.
// =============================================================================

use thiserror::Error;

/// Why a single HEAD request produced no HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("could not resolve hostname: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),

    /// The request code panicked before the transport could answer
    #[error("check panicked: {0}")]
    Panicked(String),
}

impl TransportError {
    /// Classifies a reqwest error into one of our variants.
    ///
    /// reqwest only exposes a handful of `is_*` predicates, so DNS and TLS
    /// failures are recognised from the error chain's text.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let detail = error_chain(error);
        let lowered = detail.to_lowercase();

        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_redirect() {
            TransportError::TooManyRedirects
        } else if error.is_builder() {
            TransportError::InvalidUrl(detail)
        } else if lowered.contains("dns") || lowered.contains("resolve") {
            TransportError::Dns(detail)
        } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
            TransportError::Tls(detail)
        } else if error.is_connect() {
            TransportError::Connect(detail)
        } else {
            TransportError::Request(detail)
        }
    }
}

// Joins an error with its sources: "outer: inner: root". hyper already
// folds some sources into its own Display, those are not repeated.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Batch-level failure of `LinkChecker::check_all`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("concurrency limit must be at least 1")]
    InvalidLimit,

    #[error("dispatcher finished with {received} of {expected} results")]
    Incomplete { expected: usize, received: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Connect("refused".to_string()).to_string(),
            "connection failed: refused"
        );
    }

    #[test]
    fn test_incomplete_message() {
        let err = CheckError::Incomplete { expected: 3, received: 2 };
        assert_eq!(err.to_string(), "dispatcher finished with 2 of 3 results");
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "root cause");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        // io::Error wrapping another error displays the inner message
        assert!(error_chain(&outer).contains("root cause"));
    }

    // Wraps a source and repeats its text in its own Display, like hyper does
    #[derive(Debug)]
    struct Folded(std::io::Error);

    impl std::fmt::Display for Folded {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "tcp connect error: {}", self.0)
        }
    }

    impl std::error::Error for Folded {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[derive(Debug)]
    struct Outer(Folded);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error trying to connect")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_does_not_repeat_folded_sources() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let chain = error_chain(&Outer(Folded(refused)));

        assert_eq!(chain, "error trying to connect: tcp connect error: Connection refused");
        assert_eq!(chain.matches("Connection refused").count(), 1);
    }
}
