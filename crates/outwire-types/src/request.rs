//! Incoming request handle.

use crate::header::HeaderMap;
use crate::method::Method;

/// An inbound HTTP request, owned by the dispatcher for the duration of
/// one exchange.
///
/// The exchange layer treats this as an opaque, read-only handle: it is
/// carried through to response builders (which may inspect it to shape
/// the response) but the delivery protocol itself never reads it.
/// Inbound body access is deliberately absent — body-reading belongs to
/// the dispatcher, not to response delivery.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: Method,
    path_with_query: String,
    headers: HeaderMap,
}

impl IncomingRequest {
    pub fn new(
        method: Method,
        path_with_query: impl Into<String>,
        headers: HeaderMap,
    ) -> Self {
        Self {
            method,
            path_with_query: path_with_query.into(),
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path_with_query(&self) -> &str {
        &self.path_with_query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
