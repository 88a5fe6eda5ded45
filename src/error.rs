//! # Error Types
//!
//! This module defines the error type used across the search engine. Most of
//! the engine is infallible by contract (`search` always returns a genome),
//! so errors appear in exactly three places: option validation, a material
//! channel closing underneath an operator, and a background unit missing the
//! cancellation handshake.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evosearch::error::{Result, SearchError};
//!
//! fn check_limit(seconds: f64) -> Result<()> {
//!     if seconds > 0.0 {
//!         Ok(())
//!     } else {
//!         Err(SearchError::Configuration(
//!             "time limit must be positive".to_string(),
//!         ))
//!     }
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur inside the search engine.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when a gene or chromosome channel disconnects while
    /// an operator is drawing material from it. This only happens during
    /// shutdown; workers treat it as the signal to exit.
    #[error("Material stream disconnected")]
    StreamDisconnected(#[from] crossbeam_channel::RecvError),

    /// Error that occurs when a background unit fails to acknowledge the
    /// cancellation signal within the grace period.
    #[error("Background unit '{0}' did not acknowledge cancellation")]
    CancelUnacknowledged(&'static str),
}

/// A specialized Result type for search-engine operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the
/// error type fixed to `SearchError`.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_displays_message() {
        let err = SearchError::Configuration("bad limit".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad limit");
    }

    #[test]
    fn test_recv_error_converts_to_stream_disconnected() {
        fn recv_from_closed() -> Result<char> {
            let (tx, rx) = crossbeam_channel::bounded::<char>(1);
            drop(tx);
            Ok(rx.recv()?)
        }

        assert!(matches!(
            recv_from_closed(),
            Err(SearchError::StreamDisconnected(_))
        ));
    }
}
