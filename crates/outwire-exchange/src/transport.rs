//! The transport seam.

use crate::error::StreamError;

/// The narrow interface the exchange needs from the byte transport.
///
/// Implemented by whatever turns body bytes into network frames — that
/// layer is an external collaborator and never appears in this crate.
/// All calls are blocking: `write_and_flush` returns only once the bytes
/// have been durably handed to the transport or an error occurred.
///
/// The dispatcher supplies the transport when it creates the
/// [`ResponseOutparam`](crate::ResponseOutparam); it is only reachable
/// through the body channel of a committed response, so no body bytes
/// can flow before commit.
pub trait Transport: Send {
    /// Open the body channel after the response head has been committed.
    ///
    /// May fail if the peer went away after receiving the head; the
    /// exchange then terminates with the head committed and an empty
    /// body.
    fn open_body(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    /// Submit `bytes` and block until they are flushed.
    ///
    /// All-or-nothing per call: on success every supplied byte was
    /// accepted and flushed; on failure none were durably delivered and
    /// the channel is dead. Callers never pass more than
    /// [`MAX_WRITE_BYTES`](crate::MAX_WRITE_BYTES) per call.
    fn write_and_flush(&mut self, bytes: &[u8]) -> Result<(), StreamError>;

    /// Signal that the body is complete.
    fn finish(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}
