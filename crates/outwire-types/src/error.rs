//! Protocol-level error codes.

use thiserror::Error;

/// Errors a handler can surface to the peer through the response
/// out-parameter.
///
/// These are the only errors that cross the protocol boundary: they are
/// placed into the out-parameter *instead of* a response, so they exist
/// only on the pre-commit path. Failures after commit never reach the
/// peer and are reported through the exchange outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("HTTP protocol error: {0}")]
    Protocol(String),

    #[error("connection terminated")]
    ConnectionTerminated,

    #[error("destination unavailable")]
    DestinationUnavailable,
}
