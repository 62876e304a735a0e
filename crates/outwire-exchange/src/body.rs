//! The body output channel and its write permission.

use std::fmt;

use crate::error::StreamError;
use crate::transport::Transport;

/// Largest number of bytes submitted to the transport per
/// write-and-flush call. Larger payloads are split into successive
/// calls.
pub const MAX_WRITE_BYTES: usize = 4096;

/// The body output channel of a committed response.
///
/// Obtained once per response via
/// [`CommittedResponse::body`](crate::CommittedResponse::body). Writing
/// goes through a [`BodyWriter`] permission handle, which mutably
/// borrows the channel — at most one live writer can exist, checked at
/// compile time.
pub struct BodyChannel {
    transport: Box<dyn Transport>,
    flushed: usize,
    closed: bool,
}

impl BodyChannel {
    pub(crate) fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            flushed: 0,
            closed: false,
        }
    }

    /// Request write permission.
    ///
    /// Fails once the channel is dead — after any flush failure the
    /// channel stays closed and no further writes are possible.
    pub fn write(&mut self) -> Result<BodyWriter<'_>, StreamError> {
        if self.closed {
            return Err(StreamError::Closed);
        }
        Ok(BodyWriter { channel: self })
    }

    /// Bytes durably flushed to the transport so far.
    pub fn bytes_flushed(&self) -> usize {
        self.flushed
    }

    /// Signal that the body is complete.
    ///
    /// Consumes the channel; a channel that died mid-write cannot be
    /// finished.
    pub fn finish(mut self) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::Closed);
        }
        self.transport.finish()
    }
}

impl fmt::Debug for BodyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyChannel")
            .field("flushed", &self.flushed)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Write permission on a [`BodyChannel`].
pub struct BodyWriter<'a> {
    channel: &'a mut BodyChannel,
}

impl fmt::Debug for BodyWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyWriter")
            .field("channel", &self.channel)
            .finish()
    }
}

impl BodyWriter<'_> {
    /// Submit `bytes` and block until every byte is flushed.
    ///
    /// Payloads over [`MAX_WRITE_BYTES`] are flushed in successive
    /// chunks, in order. The first failure closes the channel and
    /// returns; bytes flushed by earlier chunks stay counted on the
    /// channel, bytes from the failed chunk do not. No retry.
    pub fn blocking_write_and_flush(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        for chunk in bytes.chunks(MAX_WRITE_BYTES) {
            match self.channel.transport.write_and_flush(chunk) {
                Ok(()) => self.channel.flushed += chunk.len(),
                Err(e) => {
                    self.channel.closed = true;
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts writes until `fail_after` flushes have succeeded, then
    /// fails every call. Records each flush length.
    struct ScriptedTransport {
        flush_lens: Vec<usize>,
        finished: bool,
        fail_after: Option<usize>,
    }

    impl ScriptedTransport {
        fn reliable() -> Self {
            Self {
                flush_lens: Vec::new(),
                finished: false,
                fail_after: None,
            }
        }

        fn failing_after(n: usize) -> Self {
            Self {
                fail_after: Some(n),
                ..Self::reliable()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn write_and_flush(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
            if self.fail_after.is_some_and(|n| self.flush_lens.len() >= n) {
                return Err(StreamError::LastOperationFailed("peer reset".into()));
            }
            self.flush_lens.push(bytes.len());
            Ok(())
        }

        fn finish(&mut self) -> Result<(), StreamError> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn small_payload_is_one_flush() {
        let mut channel = BodyChannel::new(Box::new(ScriptedTransport::reliable()));
        channel
            .write()
            .expect("open channel grants permission")
            .blocking_write_and_flush(b"Hello, world!")
            .expect("flush succeeds");

        assert_eq!(channel.bytes_flushed(), 13);
        assert!(channel.finish().is_ok());
    }

    #[test]
    fn large_payload_is_chunked_in_order() {
        let mut channel = BodyChannel::new(Box::new(ScriptedTransport::reliable()));
        let payload = vec![0xAB; 10_000];
        channel
            .write()
            .expect("permission")
            .blocking_write_and_flush(&payload)
            .expect("flush succeeds");

        assert_eq!(channel.bytes_flushed(), 10_000);
    }

    #[test]
    fn empty_payload_flushes_nothing() {
        let mut channel = BodyChannel::new(Box::new(ScriptedTransport::reliable()));
        channel
            .write()
            .expect("permission")
            .blocking_write_and_flush(b"")
            .expect("empty flush is a no-op");

        assert_eq!(channel.bytes_flushed(), 0);
    }

    #[test]
    fn flush_failure_closes_channel() {
        let mut channel = BodyChannel::new(Box::new(ScriptedTransport::failing_after(0)));
        let err = channel
            .write()
            .expect("permission granted before first failure")
            .blocking_write_and_flush(b"doomed")
            .unwrap_err();
        assert_eq!(err, StreamError::LastOperationFailed("peer reset".into()));

        // Dead channel: no new permission, no finish.
        assert_eq!(channel.write().unwrap_err(), StreamError::Closed);
        assert_eq!(channel.finish().unwrap_err(), StreamError::Closed);
    }

    #[test]
    fn mid_stream_failure_keeps_earlier_chunks_counted() {
        let mut channel = BodyChannel::new(Box::new(ScriptedTransport::failing_after(1)));
        let payload = vec![0u8; MAX_WRITE_BYTES + 100];

        let err = channel
            .write()
            .expect("permission")
            .blocking_write_and_flush(&payload)
            .unwrap_err();
        assert_eq!(err, StreamError::LastOperationFailed("peer reset".into()));
        assert_eq!(channel.bytes_flushed(), MAX_WRITE_BYTES);
    }
}
