//! The one-shot response out-parameter.
//!
//! `ResponseOutparam` is the commit point of an exchange: resolving it
//! makes the response head (or an error code) visible to the dispatcher,
//! independent of body delivery. Resolution consumes the slot, so the
//! "exactly once" invariant is enforced by the type system rather than a
//! runtime check — there is no way to write code that resolves it twice.

use std::sync::{Arc, OnceLock};

use outwire_types::{ErrorCode, HeaderMap};

use crate::response::{CommittedResponse, OutgoingResponse};
use crate::transport::Transport;

/// The committed, metadata-only view of a response: what the peer can
/// observe before any body bytes arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: HeaderMap,
}

type Slot = Arc<OnceLock<Result<ResponseHead, ErrorCode>>>;

/// Write-once slot the dispatcher hands to a handler for one exchange.
///
/// Exactly one of [`send`](ResponseOutparam::send) or
/// [`fail`](ResponseOutparam::fail) must be called; both consume the
/// slot. The dispatcher observes the resolution through the paired
/// [`ResponseReceiver`].
pub struct ResponseOutparam {
    slot: Slot,
    transport: Box<dyn Transport>,
}

/// The dispatcher's view of an out-parameter.
pub struct ResponseReceiver {
    slot: Slot,
}

impl ResponseOutparam {
    /// Create an out-parameter for one exchange, wired to the transport
    /// that will carry the body bytes.
    pub fn new(transport: Box<dyn Transport>) -> (Self, ResponseReceiver) {
        let slot: Slot = Arc::new(OnceLock::new());
        (
            Self {
                slot: Arc::clone(&slot),
                transport,
            },
            ResponseReceiver { slot },
        )
    }

    /// Commit `response`. Its head becomes visible to the dispatcher
    /// immediately; the returned [`CommittedResponse`] holds the
    /// body-writing rights.
    ///
    /// The head is frozen at this point — the response value is gone,
    /// and the committed handle exposes no metadata mutation.
    pub fn send(self, response: OutgoingResponse) -> CommittedResponse {
        let (status, headers) = response.into_parts();
        // Infallible: `self` is consumed, so this is the slot's first write.
        let _ = self.slot.set(Ok(ResponseHead { status, headers }));
        CommittedResponse::new(status, self.transport)
    }

    /// Resolve the exchange with an error instead of a response.
    ///
    /// Only reachable before commit; the transport is dropped without
    /// ever opening a body channel.
    pub fn fail(self, code: ErrorCode) {
        let _ = self.slot.set(Err(code));
    }
}

impl ResponseReceiver {
    /// The resolution, if the handler has resolved the slot yet.
    pub fn get(&self) -> Option<&Result<ResponseHead, ErrorCode>> {
        self.slot.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;

    struct NullTransport;

    impl Transport for NullTransport {
        fn write_and_flush(&mut self, _bytes: &[u8]) -> Result<(), StreamError> {
            Ok(())
        }
    }

    fn outparam() -> (ResponseOutparam, ResponseReceiver) {
        ResponseOutparam::new(Box::new(NullTransport))
    }

    #[test]
    fn unresolved_until_sent() {
        let (param, rx) = outparam();
        assert!(!rx.is_resolved());
        assert!(rx.get().is_none());

        param.send(OutgoingResponse::new(HeaderMap::new()));
        assert!(rx.is_resolved());
    }

    #[test]
    fn send_exposes_head_to_receiver() {
        let (param, rx) = outparam();

        let mut headers = HeaderMap::new();
        headers.append("content-type", "text/plain".as_bytes());
        let mut response = OutgoingResponse::new(headers.clone());
        response
            .set_status_code(404)
            .expect("404 is a valid status");

        param.send(response);

        let head = rx.get().and_then(|r| r.as_ref().ok()).expect("head set");
        assert_eq!(head.status, 404);
        assert_eq!(head.headers, headers);
    }

    #[test]
    fn fail_exposes_error_code() {
        let (param, rx) = outparam();
        param.fail(ErrorCode::ConnectionTerminated);

        assert_eq!(
            rx.get(),
            Some(&Err(ErrorCode::ConnectionTerminated))
        );
    }
}
