//! The four-stage delivery pipeline.

use bytes::Bytes;
use tracing::{debug, warn};

use outwire_types::{ErrorCode, HeaderMap, IncomingRequest};

use crate::error::{BodyError, StreamError};
use crate::outparam::ResponseOutparam;
use crate::response::OutgoingResponse;

/// Terminal state of one exchange.
///
/// Only [`Rejected`](ExchangeOutcome::Rejected) reaches the peer (via
/// the out-parameter's error arm). The two degraded variants exist so
/// telemetry can tell a clean full-body delivery apart from a commit
/// whose body never made it — the wire cannot carry that distinction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Head committed, body fully flushed and finished.
    Completed { bytes_flushed: usize },

    /// Head committed; the body channel could not be acquired. The peer
    /// sees the committed head with an empty body. Valid terminal state.
    BodyUnavailable { error: BodyError },

    /// Head committed; writing died part-way. The peer sees the head and
    /// whatever prefix of the body was flushed before the failure.
    WriteAborted {
        error: StreamError,
        bytes_flushed: usize,
    },

    /// Pre-commit failure, carried to the peer through the
    /// out-parameter. Nothing was committed.
    Rejected { code: ErrorCode },
}

impl ExchangeOutcome {
    /// Whether a response head reached the peer.
    pub fn is_committed(&self) -> bool {
        !matches!(self, ExchangeOutcome::Rejected { .. })
    }

    /// Whether the whole body was delivered.
    pub fn is_complete(&self) -> bool {
        matches!(self, ExchangeOutcome::Completed { .. })
    }
}

/// Delivers one response payload per invocation, running the fixed
/// construct → commit → acquire → write-and-flush sequence.
///
/// The pipeline is strictly sequential; the blocking flush inside stage
/// four is the only call that can block. Each stage checks its result
/// before the next runs, and the out-parameter is resolved exactly once
/// on every path — pre-commit failures resolve it with an error, while
/// post-commit failures are terminal but unreportable: they end the
/// exchange with a degraded [`ExchangeOutcome`] and a `warn` event, and
/// are never propagated as errors, since a retry would need a second
/// commit.
pub struct ResponseExchange {
    payload: Bytes,
}

impl ResponseExchange {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Deliver the payload with a default response: status 200, empty
    /// header fields. Construction cannot fail on this path.
    pub fn deliver(
        &self,
        request: &IncomingRequest,
        response_out: ResponseOutparam,
    ) -> ExchangeOutcome {
        self.deliver_with(request, response_out, |_| {
            Ok(OutgoingResponse::new(HeaderMap::new()))
        })
    }

    /// Deliver the payload with a caller-built response.
    ///
    /// If `build` fails, the out-parameter is resolved with its error
    /// code and no commit happens; the later stages never run.
    pub fn deliver_with<B>(
        &self,
        request: &IncomingRequest,
        response_out: ResponseOutparam,
        build: B,
    ) -> ExchangeOutcome
    where
        B: FnOnce(&IncomingRequest) -> Result<OutgoingResponse, ErrorCode>,
    {
        // Stage 1: construct.
        let response = match build(request) {
            Ok(response) => response,
            Err(code) => {
                warn!(
                    method = %request.method(),
                    path = request.path_with_query(),
                    %code,
                    "response construction failed, rejecting exchange"
                );
                response_out.fail(code.clone());
                return ExchangeOutcome::Rejected { code };
            }
        };

        // Stage 2: commit. The head is now visible to the peer; nothing
        // past this point can be reported through the out-parameter.
        let mut committed = response_out.send(response);
        debug!(status = committed.status_code(), "response head committed");

        // Stage 3: acquire the body channel.
        let mut channel = match committed.body() {
            Ok(channel) => channel,
            Err(error) => {
                warn!(%error, "response committed without body");
                return ExchangeOutcome::BodyUnavailable { error };
            }
        };

        // Stage 4: write permission, blocking flush, finish.
        let flush_result = match channel.write() {
            Ok(mut writer) => writer.blocking_write_and_flush(&self.payload),
            Err(error) => {
                warn!(%error, "write permission denied after commit");
                return ExchangeOutcome::WriteAborted {
                    error,
                    bytes_flushed: 0,
                };
            }
        };
        if let Err(error) = flush_result {
            warn!(
                %error,
                bytes_flushed = channel.bytes_flushed(),
                "body flush failed after commit"
            );
            return ExchangeOutcome::WriteAborted {
                error,
                bytes_flushed: channel.bytes_flushed(),
            };
        }

        let bytes_flushed = channel.bytes_flushed();
        if let Err(error) = channel.finish() {
            warn!(%error, bytes_flushed, "body finish failed after flush");
            return ExchangeOutcome::WriteAborted {
                error,
                bytes_flushed,
            };
        }

        debug!(bytes_flushed, "exchange completed");
        ExchangeOutcome::Completed { bytes_flushed }
    }
}
