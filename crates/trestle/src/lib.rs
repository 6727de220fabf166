//! # Trestle: Out-of-Process Reference Resolution Bridge
//!
//! Trestle lets a documentation compiler delegate resolution of external
//! topic, symbol, and asset references to a sibling resolver: either a
//! long-running executable the bridge spawns and owns, or an
//! already-running documentation service reached through a
//! request/response client. Transport, line framing, the bundle
//! identifier handshake, caching, and process lifecycle all stay behind
//! one in-process interface.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use trestle::{
//!     ExternalReferenceResolver, OutOfProcessResolver, SourceLanguage, TopicReference,
//!     UnresolvedReference,
//! };
//!
//! let mut resolver = OutOfProcessResolver::from_executable(
//!     Path::new("/usr/local/bin/docs-resolver"),
//!     Box::new(|chunk| eprint!("{chunk}")),
//! )?;
//!
//! let swift = SourceLanguage::new("Swift", "swift");
//! let reference = TopicReference::Unresolved(UnresolvedReference::new(
//!     format!("doc://{}/Foo/Bar", resolver.bundle_identifier()),
//! ));
//!
//! let result = resolver.resolve(reference, swift);
//! # let _ = result;
//! # Ok::<(), trestle::Error>(())
//! ```
//!
//! ## Design Notes
//!
//! - One request, one reply, strictly FIFO: callers serialize their
//!   invocations, and every call blocks until the peer answers or its
//!   pipe closes. There is no timeout; a caller that needs one drops the
//!   resolver, which terminates the child.
//! - The peer's stderr is drained on a dedicated thread so large error
//!   bursts cannot deadlock the reply stream.
//! - Resolved information is cached per topic URL, per symbol identifier,
//!   and per asset, for the life of the resolver. Entities and URLs for
//!   previously resolved references are served from those caches without
//!   further I/O.

#![forbid(unsafe_code)]

mod entity;
mod error;
mod protocol;
mod resolver;
mod transport;
mod types;

pub use entity::{Availability, DocumentationNode, SymbolSemantic};
pub use error::{Error, Result};
pub use protocol::{
    AssetMetadata, DataAsset, DeclarationFragment, EntityKind, PlatformAvailability, Request,
    ResolvedInformation, Response,
};
pub use resolver::{
    ExternalReferenceResolver, ExternalSymbolResolver, FallbackAssetResolver,
    FallbackReferenceResolver, OutOfProcessResolver, SYMBOL_BUNDLE_IDENTIFIER,
};
pub use transport::{
    ChildProcessTransport, ErrorOutputHandler, ServiceClient, ServiceMessage, ServiceTransport,
    Transport, RESOLVE_REQUEST_KIND, RESOLVE_RESPONSE_KIND,
};
pub use types::{
    InvalidTopicUrl, MarkupDocument, MarkupParser, PlainTextParser, ResolvedReference,
    SourceLanguage, TopicReference, TopicResolutionResult, TopicUrl, UnresolvedReference, Version,
};
