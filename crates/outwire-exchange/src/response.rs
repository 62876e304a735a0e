//! Outgoing responses, before and after commit.

use outwire_types::{ErrorCode, HeaderMap};

use crate::body::BodyChannel;
use crate::error::BodyError;
use crate::transport::Transport;

/// A response under construction, exclusively owned by the handler.
///
/// Committing it through
/// [`ResponseOutparam::send`](crate::ResponseOutparam::send) moves the
/// value away, which is what freezes the metadata: there is nothing left
/// to mutate.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    status: u16,
    headers: HeaderMap,
}

impl OutgoingResponse {
    /// Build a response with the given header fields and status 200.
    /// Never fails.
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            status: 200,
            headers,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Set the status code. Rejects values outside the HTTP range.
    pub fn set_status_code(&mut self, status: u16) -> Result<(), ErrorCode> {
        if !(100..=599).contains(&status) {
            return Err(ErrorCode::Protocol(format!(
                "invalid status code {status}"
            )));
        }
        self.status = status;
        Ok(())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub(crate) fn into_parts(self) -> (u16, HeaderMap) {
        (self.status, self.headers)
    }
}

/// Body-writing rights for a response whose head is already committed.
///
/// This is all that remains of a response after commit. The body channel
/// can be acquired at most once; afterwards the handle is inert.
pub struct CommittedResponse {
    status: u16,
    transport: Option<Box<dyn Transport>>,
}

impl CommittedResponse {
    pub(crate) fn new(status: u16, transport: Box<dyn Transport>) -> Self {
        Self {
            status,
            transport: Some(transport),
        }
    }

    /// Status code of the committed head, for logging.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Acquire the body channel.
    ///
    /// Fails if the channel was already taken, or if the transport
    /// refuses to open it (the peer may have gone away after receiving
    /// the head). Either way the commit stands; the exchange just ends
    /// with an empty body.
    pub fn body(&mut self) -> Result<BodyChannel, BodyError> {
        let mut transport = self.transport.take().ok_or(BodyError::AlreadyTaken)?;
        transport.open_body()?;
        Ok(BodyChannel::new(transport))
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

    struct RefusingTransport;

    impl Transport for RefusingTransport {
        fn open_body(&mut self) -> Result<(), StreamError> {
            Err(StreamError::Closed)
        }

        fn write_and_flush(&mut self, _bytes: &[u8]) -> Result<(), StreamError> {
            unreachable!("body never opens")
        }
    }

    #[test]
    fn new_response_defaults_to_200_with_given_headers() {
        let mut headers = HeaderMap::new();
        headers.append("x-test", "1".as_bytes());

        let response = OutgoingResponse::new(headers);
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn set_status_code_validates_range() {
        let mut response = OutgoingResponse::new(HeaderMap::new());
        response.set_status_code(204).expect("valid");
        assert_eq!(response.status_code(), 204);

        assert!(response.set_status_code(99).is_err());
        assert!(response.set_status_code(600).is_err());
        // Rejected values leave the status untouched.
        assert_eq!(response.status_code(), 204);
    }

    #[test]
    fn body_succeeds_at_most_once() {
        let mut committed = CommittedResponse::new(200, Box::new(NullTransport));

        assert!(committed.body().is_ok());
        assert_eq!(committed.body().unwrap_err(), BodyError::AlreadyTaken);
        assert_eq!(committed.body().unwrap_err(), BodyError::AlreadyTaken);
    }

    #[test]
    fn body_surfaces_transport_refusal() {
        let mut committed = CommittedResponse::new(200, Box::new(RefusingTransport));

        assert_eq!(
            committed.body().unwrap_err(),
            BodyError::Unavailable(StreamError::Closed)
        );
    }
}
