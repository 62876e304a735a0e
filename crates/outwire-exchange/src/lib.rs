//! outwire-exchange — the commit-then-stream response-delivery protocol.
//!
//! One exchange covers a single request/response pair, from "handler
//! invoked" to "body fully flushed". The defining property is that the
//! response *metadata* is committed — and becomes visible to the peer —
//! before the body bytes are necessarily written:
//!
//! 1. **Construct** an [`OutgoingResponse`] with its header fields.
//! 2. **Commit** it through the one-shot [`ResponseOutparam`]. The slot
//!    is consumed on resolution, so a second commit is a compile error.
//! 3. **Acquire** the body channel from the committed response
//!    (fallible; at most once).
//! 4. **Write and flush** the payload through the channel's write
//!    permission, then finish the body.
//!
//! Failures before commit are carried to the peer through the
//! out-parameter. Failures after commit cannot reach the peer at all:
//! the exchange degrades to a terminal [`ExchangeOutcome`] and reports
//! the condition only through tracing events and the outcome value.
//!
//! The transport behind the body channel is a trait seam
//! ([`Transport`]); the component runtime, connection handling, and
//! request parsing all live outside this crate.

pub mod body;
pub mod error;
pub mod exchange;
pub mod outparam;
pub mod response;
pub mod transport;

pub use body::{BodyChannel, BodyWriter, MAX_WRITE_BYTES};
pub use error::{BodyError, StreamError};
pub use exchange::{ExchangeOutcome, ResponseExchange};
pub use outparam::{ResponseHead, ResponseOutparam, ResponseReceiver};
pub use response::{CommittedResponse, OutgoingResponse};
pub use transport::Transport;
