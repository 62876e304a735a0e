//! Post-commit error types.
//!
//! Everything here describes a failure that happens *after* the response
//! has been committed through the out-parameter. None of these can be
//! reported to the peer; the exchange surfaces them through its outcome
//! and tracing events only.

use thiserror::Error;

/// A body-channel failure.
///
/// Mirrors the two ways a byte stream dies: the peer (or transport) has
/// closed it, or the previous operation on it failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("stream closed")]
    Closed,

    #[error("last operation failed: {0}")]
    LastOperationFailed(String),
}

/// Failure to acquire the body channel from a committed response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The channel was already handed out; at most one exists per body.
    #[error("response body already taken")]
    AlreadyTaken,

    /// The transport refused to open the body channel.
    #[error("body channel unavailable: {0}")]
    Unavailable(#[from] StreamError),
}
