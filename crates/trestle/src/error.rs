//! Error types for external resolution operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for external resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while communicating with an external resolver.
///
/// Construction-time failures (`MissingResolver`, `ResolverNotExecutable`,
/// `InvalidBundleIdentifierOutput`) mean no resolver was obtained at all.
/// The remaining variants fail the call they occurred on; the resolver
/// stays usable unless the process itself is gone (`ProcessDidExit`).
#[derive(Debug, Error)]
pub enum Error {
    /// No file exists at the configured resolver location.
    #[error("no external resolver exists at '{}'", path.display())]
    MissingResolver {
        /// The configured resolver location.
        path: PathBuf,
    },

    /// The file at the configured resolver location cannot be executed.
    #[error("the external resolver at '{}' is not executable", path.display())]
    ResolverNotExecutable {
        /// The configured resolver location.
        path: PathBuf,
    },

    /// The first reply from the resolver process was not a bundle identifier.
    #[error("the external resolver did not output a valid bundle identifier as its first message")]
    InvalidBundleIdentifierOutput,

    /// The resolver process exited while a reply was expected.
    #[error("the external resolver process exited{}", display_exit_code(*exit_code))]
    ProcessDidExit {
        /// The process exit code, when it could be collected.
        exit_code: Option<i32>,
    },

    /// The resolver announced its bundle identifier again after the handshake.
    #[error("the external resolver sent a bundle identifier after the handshake")]
    SentBundleIdentifierAgain,

    /// The resolver answered the request with an error message of its own.
    ///
    /// The message is surfaced verbatim.
    #[error("{message}")]
    ForwardedError {
        /// The error message exactly as the resolver sent it.
        message: String,
    },

    /// A documentation-service reply arrived with an unknown message kind.
    #[error("unknown response kind from the documentation service: '{kind}'")]
    InvalidResponseKind {
        /// The message kind that was received.
        kind: String,
    },

    /// A reply could not be decoded as any known response.
    #[error("unable to decode response from the external resolver (data: {data}): {source}")]
    UnableToDecodeResponse {
        /// The raw reply, converted to UTF-8 on a best-effort basis.
        data: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A request could not be encoded for the wire.
    #[error("unable to encode request ({description}): {source}")]
    UnableToEncodeRequest {
        /// The human-readable description of the request.
        description: String,
        /// The underlying encode error.
        #[source]
        source: serde_json::Error,
    },

    /// A request line did not decode as any known request.
    ///
    /// This is the decode target for peers reading the host's requests; the
    /// host itself never receives requests.
    #[error("unknown type of request")]
    UnknownTypeOfRequest,

    /// The reply variant does not match the request that was sent.
    #[error("unexpected response '{response}' for request {request}")]
    UnexpectedResponse {
        /// The kind of response that was received.
        response: String,
        /// The human-readable description of the request.
        request: String,
    },

    /// I/O error on the resolver pipes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing-resolver error.
    #[must_use]
    pub fn missing_resolver(path: &std::path::Path) -> Self {
        Self::MissingResolver {
            path: path.to_path_buf(),
        }
    }

    /// Create a not-executable error.
    #[must_use]
    pub fn not_executable(path: &std::path::Path) -> Self {
        Self::ResolverNotExecutable {
            path: path.to_path_buf(),
        }
    }

    /// Create a decode error carrying the raw reply bytes as lossy UTF-8.
    #[must_use]
    pub fn undecodable_response(data: &[u8], source: serde_json::Error) -> Self {
        Self::UnableToDecodeResponse {
            data: String::from_utf8_lossy(data).into_owned(),
            source,
        }
    }
}

fn display_exit_code(exit_code: Option<i32>) -> String {
    exit_code.map_or_else(String::new, |code| format!(" with code {code}"))
}
