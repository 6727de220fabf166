//! Transports carrying resolver requests and replies.
//!
//! A transport is a strictly serialized bidirectional channel: every call
//! sends at most one request and owes the caller exactly one reply. Two
//! implementations exist: [`ChildProcessTransport`] spawns and owns a
//! resolver executable, [`ServiceTransport`] wraps a request/response
//! client for an already-running documentation service.

mod process;
mod service;

pub use process::{ChildProcessTransport, ErrorOutputHandler};
pub use service::{
    ServiceClient, ServiceMessage, ServiceTransport, RESOLVE_REQUEST_KIND, RESOLVE_RESPONSE_KIND,
};

use crate::error::Result;
use crate::protocol::{Request, Response};

/// A bidirectional channel to a resolver peer.
///
/// Calls must be serialized by the caller; the transport maintains exactly
/// one in-flight request and never interleaves replies.
pub trait Transport: Send {
    /// Send one request and block until its reply arrives.
    ///
    /// Passing `None` is only meaningful as the first call on a
    /// child-process transport, where it reads the peer's handshake
    /// announcement without writing anything. Service transports have no
    /// handshake and treat `None` as a caller bug.
    fn send_and_wait(&mut self, request: Option<&Request>) -> Result<Response>;
}
