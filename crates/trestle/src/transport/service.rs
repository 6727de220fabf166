//! Transport over an already-running documentation service.

use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::{Request, Response};

use super::Transport;

/// Message kind for resolution requests sent to a documentation service.
pub const RESOLVE_REQUEST_KIND: &str = "resolve-reference";

/// Message kind the documentation service replies with.
pub const RESOLVE_RESPONSE_KIND: &str = "resolved-reference-response";

/// One message in a documentation service's envelope: a kind, a
/// correlation identifier, and an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    /// The message kind, e.g. [`RESOLVE_REQUEST_KIND`].
    pub kind: String,
    /// Correlates a reply with its request.
    pub identifier: String,
    /// The encoded payload, when the message carries one.
    pub payload: Option<Vec<u8>>,
}

impl ServiceMessage {
    /// Create a service message.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        identifier: impl Into<String>,
        payload: Option<Vec<u8>>,
    ) -> Self {
        Self {
            kind: kind.into(),
            identifier: identifier.into(),
            payload,
        }
    }
}

/// The documentation-service collaborator: sends one message and blocks
/// until the correlated reply arrives.
///
/// Hosts implement this over whatever channel reaches their service;
/// tests implement it with scripted replies.
pub trait ServiceClient: Send {
    /// Send `message` and wait for the reply correlated to it.
    ///
    /// # Errors
    ///
    /// Returns an error when the channel itself fails; protocol-level
    /// failures travel inside the reply payload.
    fn send_and_wait(&mut self, message: ServiceMessage) -> Result<ServiceMessage>;
}

/// A transport that forwards requests through a [`ServiceClient`].
///
/// No handshake is performed on this path; the primary bundle identifier
/// is supplied when the resolver is constructed.
pub struct ServiceTransport {
    client: Box<dyn ServiceClient>,
    next_request_id: u64,
}

impl ServiceTransport {
    /// Create a transport over the given service client.
    #[must_use]
    pub fn new(client: Box<dyn ServiceClient>) -> Self {
        Self {
            client,
            next_request_id: 0,
        }
    }
}

impl Transport for ServiceTransport {
    /// # Panics
    ///
    /// Panics when `request` is `None`: service transports have no
    /// handshake, so a handshake read is a caller bug.
    fn send_and_wait(&mut self, request: Option<&Request>) -> Result<Response> {
        let Some(request) = request else {
            panic!("service transports perform no handshake; every call must carry a request");
        };

        self.next_request_id += 1;
        let identifier = format!("{RESOLVE_REQUEST_KIND}-{}", self.next_request_id);

        let payload =
            serde_json::to_vec(request).map_err(|source| Error::UnableToEncodeRequest {
                description: request.to_string(),
                source,
            })?;

        trace!(identifier = %identifier, request = %request, "Sending request to documentation service");
        let reply = self.client.send_and_wait(ServiceMessage::new(
            RESOLVE_REQUEST_KIND,
            identifier,
            Some(payload),
        ))?;

        if reply.kind != RESOLVE_RESPONSE_KIND {
            return Err(Error::InvalidResponseKind { kind: reply.kind });
        }

        let payload = reply.payload.unwrap_or_default();
        serde_json::from_slice(&payload)
            .map_err(|source| Error::undecodable_response(&payload, source))
    }
}
