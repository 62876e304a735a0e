//! outwire-types — shared data model for the Outwire response-delivery
//! protocol.
//!
//! Provides the header-field collection, request method, and incoming
//! request handle consumed by the exchange layer, plus the protocol-level
//! [`ErrorCode`] that a handler can place into the response out-parameter
//! when an exchange is rejected before commit.

pub mod error;
pub mod header;
pub mod method;
pub mod request;

pub use error::ErrorCode;
pub use header::{Header, HeaderMap};
pub use method::Method;
pub use request::IncomingRequest;
