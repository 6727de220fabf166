//! The resolver core: owns a transport and three caches, performs the
//! handshake, and exposes the four resolver roles to the host compiler.
//!
//! ## Caching contract
//!
//! Anything this resolver minted, it can explain: a successful topic
//! resolve stores the reply under the requested URL, a successful symbol
//! resolve stores it under the precise identifier, and those entries live
//! until the resolver is dropped. Asking for the entity or URL of a
//! reference this resolver returned therefore never performs I/O; a cache
//! miss on that path means the host wired its pipeline incorrectly and is
//! treated as fatal.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::entity::{project_node, DocumentationNode};
use crate::error::{Error, Result};
use crate::protocol::{DataAsset, Request, ResolvedInformation, Response};
use crate::transport::{
    ChildProcessTransport, ErrorOutputHandler, ServiceClient, ServiceTransport, Transport,
};
use crate::types::{
    MarkupParser, PlainTextParser, ResolvedReference, SourceLanguage, TopicReference,
    TopicResolutionResult, TopicUrl,
};

/// Bundle identifier minted onto references to externally resolved
/// symbols, so they can later be recognized as this resolver's.
pub const SYMBOL_BUNDLE_IDENTIFIER: &str = "com.externally.resolved.symbol";

/// Resolves external topic references on behalf of the host compiler.
pub trait ExternalReferenceResolver {
    /// Resolve a topic reference.
    ///
    /// Already-resolved input is returned unchanged. Unresolved input is
    /// forwarded to the peer; on success the result carries a canonical
    /// reference in this resolver's primary bundle, on failure the
    /// original reference paired with the peer's explanation.
    ///
    /// The requested language is part of the role contract; the minted
    /// reference carries the language the peer reports.
    ///
    /// # Panics
    ///
    /// Panics when the unresolved URL carries no bundle identifier: local
    /// references must never reach an external resolver.
    fn resolve(
        &mut self,
        reference: TopicReference,
        source_language: SourceLanguage,
    ) -> TopicResolutionResult;

    /// Build the documentation node for a reference this resolver
    /// previously resolved.
    ///
    /// # Panics
    ///
    /// Panics when the reference is not in the topic cache, which means it
    /// was not minted by this resolver.
    fn entity(&self, reference: &ResolvedReference) -> DocumentationNode;

    /// The canonical external URL for a reference this resolver previously
    /// resolved.
    ///
    /// # Panics
    ///
    /// Panics when the reference is not in the topic cache.
    fn url_for_resolved_reference(&self, reference: &ResolvedReference) -> &str;
}

/// The fallback flavor of [`ExternalReferenceResolver`]: consulted only
/// for references that may already have been resolved, never allowed to
/// issue new requests.
pub trait FallbackReferenceResolver {
    /// The documentation node for `reference`, if it was previously
    /// resolved by this resolver.
    fn entity_if_previously_resolved(
        &self,
        reference: &ResolvedReference,
    ) -> Option<DocumentationNode>;

    /// The canonical external URL for `reference`, if it was previously
    /// resolved by this resolver.
    fn url_for_resolved_reference_if_previously_resolved(
        &self,
        reference: &ResolvedReference,
    ) -> Option<&str>;
}

/// Resolves symbols by precise identifier on behalf of the host compiler.
pub trait ExternalSymbolResolver {
    /// Resolve a symbol by its precise identifier and build its
    /// documentation node.
    ///
    /// The minted reference lives in the synthetic symbol bundle
    /// ([`SYMBOL_BUNDLE_IDENTIFIER`]) with the identifier as its only
    /// path component.
    ///
    /// # Errors
    ///
    /// Fails when the peer reports an error or the transport breaks down.
    fn symbol_entity(&mut self, precise_identifier: &str) -> Result<DocumentationNode>;

    /// The canonical external URL for a symbol reference minted by
    /// [`Self::symbol_entity`].
    ///
    /// Returns `None` when the reference does not belong to the synthetic
    /// symbol bundle.
    ///
    /// # Panics
    ///
    /// Panics when the reference belongs to the synthetic symbol bundle
    /// but its symbol is not in the cache.
    fn url_for_resolved_symbol(&self, reference: &ResolvedReference) -> Option<&str>;

    /// The precise identifier behind an external symbol reference, in any
    /// of its pipeline states (unresolved, resolved, or failed).
    ///
    /// Returns `None` when the reference does not belong to the synthetic
    /// symbol bundle.
    fn precise_identifier(&self, reference: &TopicReference) -> Option<String>;
}

/// Resolves assets on a best-effort basis: errors are swallowed and the
/// asset is treated as absent.
pub trait FallbackAssetResolver {
    /// Resolve an asset by name within a bundle.
    fn resolve_asset(&mut self, asset_name: &str, bundle_identifier: &str) -> Option<DataAsset>;
}

/// A reference resolver that delegates to an out-of-process peer.
///
/// Construct it [from an executable](Self::from_executable) it will spawn
/// and own, or [from a service client](Self::from_service) reaching an
/// already-running documentation service. Callers must serialize
/// invocations: the underlying transport maintains exactly one in-flight
/// request.
pub struct OutOfProcessResolver {
    transport: Box<dyn Transport>,
    bundle_identifier: String,
    markup: Box<dyn MarkupParser>,
    topic_cache: HashMap<String, ResolvedInformation>,
    symbol_cache: HashMap<String, ResolvedInformation>,
    asset_cache: HashMap<(String, String), DataAsset>,
}

impl std::fmt::Debug for OutOfProcessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutOfProcessResolver")
            .field("bundle_identifier", &self.bundle_identifier)
            .finish_non_exhaustive()
    }
}

impl OutOfProcessResolver {
    /// Spawn the resolver executable at `resolver_path` and perform the
    /// bundle identifier handshake.
    ///
    /// Everything the process writes to stderr is forwarded to
    /// `error_output_handler`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingResolver`] / [`Error::ResolverNotExecutable`]
    /// for an unusable executable, and
    /// [`Error::InvalidBundleIdentifierOutput`] when the first reply is
    /// anything but a bundle identifier.
    pub fn from_executable(
        resolver_path: &Path,
        error_output_handler: ErrorOutputHandler,
    ) -> Result<Self> {
        let mut transport = ChildProcessTransport::spawn(resolver_path, error_output_handler)?;

        let bundle_identifier = match transport.send_and_wait(None)? {
            Response::BundleIdentifier(identifier) => identifier,
            other => {
                debug!(
                    reply = other.kind_name(),
                    "First reply from the external resolver was not a bundle identifier"
                );
                return Err(Error::InvalidBundleIdentifierOutput);
            }
        };
        debug!(bundle = %bundle_identifier, "External resolver handshake complete");

        Ok(Self::with_transport(Box::new(transport), bundle_identifier))
    }

    /// Wrap an already-running documentation service.
    ///
    /// No handshake is performed on this path; the primary bundle
    /// identifier is supplied by the caller.
    #[must_use]
    pub fn from_service(
        client: Box<dyn ServiceClient>,
        bundle_identifier: impl Into<String>,
    ) -> Self {
        Self::with_transport(
            Box::new(ServiceTransport::new(client)),
            bundle_identifier.into(),
        )
    }

    pub(crate) fn with_transport(transport: Box<dyn Transport>, bundle_identifier: String) -> Self {
        Self {
            transport,
            bundle_identifier,
            markup: Box::new(PlainTextParser),
            topic_cache: HashMap::new(),
            symbol_cache: HashMap::new(),
            asset_cache: HashMap::new(),
        }
    }

    /// Replace the markup parser used for abstracts.
    #[must_use]
    pub fn with_markup_parser(mut self, parser: Box<dyn MarkupParser>) -> Self {
        self.markup = parser;
        self
    }

    /// The primary bundle identifier: announced by the peer at handshake,
    /// or supplied at construction for service transports. Immutable for
    /// the life of the resolver.
    #[must_use]
    pub fn bundle_identifier(&self) -> &str {
        &self.bundle_identifier
    }

    fn resolve_information_for_topic_url(&mut self, url: &str) -> Result<ResolvedInformation> {
        if let Some(cached) = self.topic_cache.get(url) {
            trace!(url, "Topic served from cache");
            return Ok(cached.clone());
        }

        let request = Request::Topic(url.to_string());
        let information = self.expect_resolved_information(&request)?;
        self.topic_cache.insert(url.to_string(), information.clone());
        Ok(information)
    }

    fn resolve_information_for_symbol(
        &mut self,
        precise_identifier: &str,
    ) -> Result<ResolvedInformation> {
        if let Some(cached) = self.symbol_cache.get(precise_identifier) {
            trace!(precise_identifier, "Symbol served from cache");
            return Ok(cached.clone());
        }

        let request = Request::Symbol(precise_identifier.to_string());
        let information = self.expect_resolved_information(&request)?;
        self.symbol_cache
            .insert(precise_identifier.to_string(), information.clone());
        Ok(information)
    }

    fn resolve_information_for_asset(
        &mut self,
        asset_name: &str,
        bundle_identifier: &str,
    ) -> Result<DataAsset> {
        let key = (asset_name.to_string(), bundle_identifier.to_string());
        if let Some(cached) = self.asset_cache.get(&key) {
            trace!(asset = asset_name, "Asset served from cache");
            return Ok(cached.clone());
        }

        let request = Request::Asset {
            asset_name: asset_name.to_string(),
            bundle_identifier: bundle_identifier.to_string(),
        };
        match self.transport.send_and_wait(Some(&request))? {
            Response::Asset(asset) => {
                self.asset_cache.insert(key, asset.clone());
                Ok(asset)
            }
            Response::BundleIdentifier(_) => Err(Error::SentBundleIdentifierAgain),
            Response::ErrorMessage(message) => Err(Error::ForwardedError { message }),
            other => Err(Error::UnexpectedResponse {
                response: other.kind_name().to_string(),
                request: request.to_string(),
            }),
        }
    }

    /// Send `request` and require a `resolvedInformation` reply.
    fn expect_resolved_information(&mut self, request: &Request) -> Result<ResolvedInformation> {
        match self.transport.send_and_wait(Some(request))? {
            Response::ResolvedInformation(information) => Ok(information),
            Response::BundleIdentifier(_) => Err(Error::SentBundleIdentifierAgain),
            Response::ErrorMessage(message) => Err(Error::ForwardedError { message }),
            other => Err(Error::UnexpectedResponse {
                response: other.kind_name().to_string(),
                request: request.to_string(),
            }),
        }
    }

    fn cached_topic(&self, reference: &ResolvedReference) -> Option<&ResolvedInformation> {
        self.topic_cache.get(&reference.url())
    }
}

impl ExternalReferenceResolver for OutOfProcessResolver {
    fn resolve(
        &mut self,
        reference: TopicReference,
        _source_language: SourceLanguage,
    ) -> TopicResolutionResult {
        let unresolved = match reference {
            TopicReference::Resolved(result) => return result,
            TopicReference::Unresolved(unresolved) => unresolved,
        };

        let url = match TopicUrl::parse(&unresolved.topic_url) {
            Ok(url) => url,
            Err(error) => {
                return TopicResolutionResult::Failure {
                    message: error.to_string(),
                    reference: unresolved,
                };
            }
        };

        assert!(
            url.bundle_identifier.is_some(),
            "local reference '{}' was passed to the external resolver for '{}'; \
             local references must be resolved before external resolution",
            unresolved.topic_url,
            self.bundle_identifier,
        );

        match self.resolve_information_for_topic_url(&url.doc_url()) {
            Ok(information) => TopicResolutionResult::Success(ResolvedReference::new(
                self.bundle_identifier.clone(),
                url.path,
                url.fragment,
                information.language,
            )),
            Err(error) => TopicResolutionResult::Failure {
                message: error.to_string(),
                reference: unresolved,
            },
        }
    }

    fn entity(&self, reference: &ResolvedReference) -> DocumentationNode {
        let Some(information) = self.cached_topic(reference) else {
            panic!(
                "a reference ('{}') previously resolved by this resolver was not in its cache",
                reference.url()
            );
        };
        project_node(reference.clone(), information, self.markup.as_ref())
    }

    fn url_for_resolved_reference(&self, reference: &ResolvedReference) -> &str {
        let Some(information) = self.cached_topic(reference) else {
            panic!(
                "a reference ('{}') previously resolved by this resolver was not in its cache",
                reference.url()
            );
        };
        &information.url
    }
}

impl FallbackReferenceResolver for OutOfProcessResolver {
    fn entity_if_previously_resolved(
        &self,
        reference: &ResolvedReference,
    ) -> Option<DocumentationNode> {
        self.cached_topic(reference)
            .map(|information| project_node(reference.clone(), information, self.markup.as_ref()))
    }

    fn url_for_resolved_reference_if_previously_resolved(
        &self,
        reference: &ResolvedReference,
    ) -> Option<&str> {
        self.cached_topic(reference)
            .map(|information| information.url.as_str())
    }
}

impl ExternalSymbolResolver for OutOfProcessResolver {
    fn symbol_entity(&mut self, precise_identifier: &str) -> Result<DocumentationNode> {
        let information = self.resolve_information_for_symbol(precise_identifier)?;

        // The caller presented only a precise identifier, so the reply is
        // assumed to describe a symbol. If its kind disagrees, projection
        // falls back to the non-symbol shape; the reference is minted
        // either way.
        let reference = ResolvedReference::new(
            SYMBOL_BUNDLE_IDENTIFIER,
            format!("/{precise_identifier}"),
            None,
            information.language.clone(),
        );
        Ok(project_node(reference, &information, self.markup.as_ref()))
    }

    fn url_for_resolved_symbol(&self, reference: &ResolvedReference) -> Option<&str> {
        if reference.bundle_identifier != SYMBOL_BUNDLE_IDENTIFIER {
            return None;
        }

        let precise_identifier = reference.last_path_component();
        let Some(information) = self.symbol_cache.get(precise_identifier) else {
            panic!(
                "a symbol ('{precise_identifier}') previously resolved by this resolver \
                 was not in its cache"
            );
        };
        Some(information.url.as_str())
    }

    fn precise_identifier(&self, reference: &TopicReference) -> Option<String> {
        let (bundle_identifier, path) = match reference {
            TopicReference::Resolved(TopicResolutionResult::Success(resolved)) => {
                (resolved.bundle_identifier.clone(), resolved.path.clone())
            }
            TopicReference::Unresolved(unresolved)
            | TopicReference::Resolved(TopicResolutionResult::Failure {
                reference: unresolved,
                ..
            }) => {
                let url = TopicUrl::parse(&unresolved.topic_url).ok()?;
                (url.bundle_identifier?, url.path)
            }
        };

        if bundle_identifier != SYMBOL_BUNDLE_IDENTIFIER {
            return None;
        }
        Some(crate::types::last_path_component(&path).to_string())
    }
}

impl FallbackAssetResolver for OutOfProcessResolver {
    fn resolve_asset(&mut self, asset_name: &str, bundle_identifier: &str) -> Option<DataAsset> {
        match self.resolve_information_for_asset(asset_name, bundle_identifier) {
            Ok(asset) => Some(asset),
            Err(error) => {
                // Assets are optional artifacts; treat every failure as
                // "the peer does not have this asset".
                debug!(
                    asset = asset_name,
                    bundle = bundle_identifier,
                    error = %error,
                    "Asset resolution failed, treating the asset as absent"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{EntityKind, PlatformAvailability};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Transport that replays scripted replies and logs every call.
    struct MockTransport {
        replies: VecDeque<Response>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for MockTransport {
        fn send_and_wait(&mut self, request: Option<&Request>) -> Result<Response> {
            self.log
                .lock()
                .unwrap()
                .push(request.map_or_else(|| "handshake".to_string(), ToString::to_string));
            Ok(self.replies.pop_front().expect("no reply scripted"))
        }
    }

    fn swift() -> SourceLanguage {
        SourceLanguage::new("Swift", "swift")
    }

    fn symbol_information() -> ResolvedInformation {
        ResolvedInformation {
            kind: EntityKind {
                name: "Class".to_string(),
                id: "class".to_string(),
                is_symbol: true,
            },
            url: "https://x/Foo/Bar".to_string(),
            title: "Bar".to_string(),
            abstract_summary: "A class.".to_string(),
            language: swift(),
            available_languages: [swift()].into_iter().collect(),
            platforms: Some(vec![PlatformAvailability {
                name: "Mac Catalyst".to_string(),
                introduced: Some("13.5".to_string()),
                deprecated: None,
                obsoleted: None,
                renamed: None,
                unconditionally_deprecated: None,
                unconditionally_unavailable: None,
            }]),
            declaration_fragments: None,
        }
    }

    fn resolver_with(replies: Vec<Response>) -> (OutOfProcessResolver, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let transport = MockTransport {
            replies: replies.into(),
            log: Arc::clone(&log),
        };
        (
            OutOfProcessResolver::with_transport(
                Box::new(transport),
                "com.example.Docs".to_string(),
            ),
            log,
        )
    }

    fn unresolved(url: &str) -> TopicReference {
        TopicReference::Unresolved(crate::types::UnresolvedReference::new(url))
    }

    #[test]
    fn resolve_mints_reference_in_the_primary_bundle() {
        let (mut resolver, log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let result = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());

        let TopicResolutionResult::Success(reference) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(reference.bundle_identifier, "com.example.Docs");
        assert_eq!(reference.path, "/Foo/Bar");
        assert_eq!(reference.fragment, None);
        assert_eq!(reference.source_language, swift());
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["topic: 'doc://com.example.Docs/Foo/Bar'"]
        );
    }

    #[test]
    fn second_resolve_for_the_same_url_issues_no_wire_request() {
        let (mut resolver, log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let first = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());
        let second = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());

        assert_eq!(first, second);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn entity_and_url_come_from_the_cache_without_io() {
        let (mut resolver, log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let result = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());
        let TopicResolutionResult::Success(reference) = result else {
            panic!("expected success");
        };

        let node = resolver.entity(&reference);
        assert_eq!(node.name, "Bar");
        assert_eq!(node.reference, reference);
        assert!(node.semantic.is_some());

        assert_eq!(
            resolver.url_for_resolved_reference(&reference),
            "https://x/Foo/Bar"
        );
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn fallback_lookups_never_touch_the_transport() {
        let (resolver, log) = resolver_with(vec![]);
        let reference = ResolvedReference::new("com.example.Docs", "/Never/Seen", None, swift());

        assert!(resolver.entity_if_previously_resolved(&reference).is_none());
        assert!(resolver
            .url_for_resolved_reference_if_previously_resolved(&reference)
            .is_none());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn already_resolved_input_is_returned_unchanged() {
        let (mut resolver, log) = resolver_with(vec![]);
        let resolved = TopicResolutionResult::Success(ResolvedReference::new(
            "com.example.Docs",
            "/Foo",
            None,
            swift(),
        ));

        let result = resolver.resolve(TopicReference::Resolved(resolved.clone()), swift());

        assert_eq!(result, resolved);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn malformed_url_is_a_structured_failure_naming_the_url() {
        let (mut resolver, log) = resolver_with(vec![]);

        let result = resolver.resolve(unresolved("not a url"), swift());

        let TopicResolutionResult::Failure { reference, message } = result else {
            panic!("expected failure");
        };
        assert_eq!(reference.topic_url, "not a url");
        assert!(message.contains("not a url"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "local reference")]
    fn local_reference_is_a_programming_error() {
        let (mut resolver, _log) = resolver_with(vec![]);

        let _ = resolver.resolve(unresolved("doc:///Local/Path"), swift());
    }

    #[test]
    fn forwarded_error_fails_the_call_and_is_not_cached() {
        let (mut resolver, log) = resolver_with(vec![
            Response::ErrorMessage("unknown topic".to_string()),
            Response::ResolvedInformation(symbol_information()),
        ]);

        let first = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());
        let TopicResolutionResult::Failure { message, .. } = first else {
            panic!("expected failure");
        };
        assert_eq!(message, "unknown topic");

        // A retry re-issues the wire request and can now succeed.
        let second = resolver.resolve(unresolved("doc://com.example.Docs/Foo/Bar"), swift());
        assert!(matches!(second, TopicResolutionResult::Success(_)));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn bundle_identifier_reply_after_handshake_fails_the_call() {
        let (mut resolver, _log) = resolver_with(vec![Response::BundleIdentifier(
            "com.example.Docs".to_string(),
        )]);

        let result = resolver.resolve(unresolved("doc://com.example.Docs/Foo"), swift());

        let TopicResolutionResult::Failure { message, .. } = result else {
            panic!("expected failure");
        };
        assert!(message.contains("after the handshake"));
    }

    #[test]
    fn mismatched_reply_variant_fails_the_call() {
        let (mut resolver, _log) = resolver_with(vec![Response::Asset(DataAsset::default())]);

        let result = resolver.resolve(unresolved("doc://com.example.Docs/Foo"), swift());

        let TopicResolutionResult::Failure { message, .. } = result else {
            panic!("expected failure");
        };
        assert!(message.contains("unexpected response"));
        assert!(message.contains("topic: 'doc://com.example.Docs/Foo'"));
    }

    #[test]
    #[should_panic(expected = "was not in its cache")]
    fn entity_for_an_unknown_reference_is_a_programming_error() {
        let (resolver, _log) = resolver_with(vec![]);
        let reference = ResolvedReference::new("com.example.Docs", "/Never/Seen", None, swift());

        let _ = resolver.entity(&reference);
    }

    #[test]
    fn symbol_entity_mints_a_synthetic_symbol_reference() {
        let (mut resolver, log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let node = resolver.symbol_entity("s:3Foo3BarC").unwrap();

        assert_eq!(node.reference.bundle_identifier, SYMBOL_BUNDLE_IDENTIFIER);
        assert_eq!(node.reference.path, "/s:3Foo3BarC");
        assert_eq!(node.reference.source_language, swift());

        let semantic = node.semantic.expect("symbol reply projects a semantic");
        assert_eq!(semantic.availability.len(), 1);
        assert_eq!(semantic.availability[0].domain, "macCatalyst");
        assert_eq!(
            semantic.availability[0].introduced,
            Some(crate::types::Version::new(13, 5, 0))
        );

        assert_eq!(log.lock().unwrap().as_slice(), ["symbol: 's:3Foo3BarC'"]);
    }

    #[test]
    fn symbol_entity_is_served_from_cache_on_repeat() {
        let (mut resolver, log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let first = resolver.symbol_entity("s:3Foo3BarC").unwrap();
        let second = resolver.symbol_entity("s:3Foo3BarC").unwrap();

        assert_eq!(first.reference, second.reference);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn url_for_resolved_symbol_round_trips_through_the_cache() {
        let (mut resolver, _log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let node = resolver.symbol_entity("s:3Foo3BarC").unwrap();

        assert_eq!(
            resolver.url_for_resolved_symbol(&node.reference),
            Some("https://x/Foo/Bar")
        );
    }

    #[test]
    fn url_for_resolved_symbol_ignores_foreign_bundles() {
        let (resolver, _log) = resolver_with(vec![]);
        let reference = ResolvedReference::new("com.example.Docs", "/Foo", None, swift());

        assert_eq!(resolver.url_for_resolved_symbol(&reference), None);
    }

    #[test]
    #[should_panic(expected = "was not in its cache")]
    fn url_for_an_unknown_synthetic_symbol_is_a_programming_error() {
        let (resolver, _log) = resolver_with(vec![]);
        let reference =
            ResolvedReference::new(SYMBOL_BUNDLE_IDENTIFIER, "/s:unknown", None, swift());

        let _ = resolver.url_for_resolved_symbol(&reference);
    }

    #[test]
    fn precise_identifier_inverts_symbol_reference_minting() {
        let (mut resolver, _log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);

        let node = resolver.symbol_entity("s:3Foo3BarC").unwrap();
        let reference = TopicReference::Resolved(TopicResolutionResult::Success(node.reference));

        assert_eq!(
            resolver.precise_identifier(&reference),
            Some("s:3Foo3BarC".to_string())
        );
    }

    #[test]
    fn precise_identifier_reads_unresolved_and_failed_references() {
        let (resolver, _log) = resolver_with(vec![]);
        let url = format!("doc://{SYMBOL_BUNDLE_IDENTIFIER}/s:3Foo3BarC");

        assert_eq!(
            resolver.precise_identifier(&unresolved(&url)),
            Some("s:3Foo3BarC".to_string())
        );

        let failed = TopicReference::Resolved(TopicResolutionResult::Failure {
            reference: crate::types::UnresolvedReference::new(url),
            message: "went wrong".to_string(),
        });
        assert_eq!(
            resolver.precise_identifier(&failed),
            Some("s:3Foo3BarC".to_string())
        );

        assert_eq!(
            resolver.precise_identifier(&unresolved("doc://com.example.Docs/Foo")),
            None
        );
    }

    #[test]
    fn asset_reply_is_cached_and_returned() {
        let mut asset = DataAsset::default();
        asset
            .variants
            .insert("1x".to_string(), "https://x/logo.png".to_string());
        let (mut resolver, log) = resolver_with(vec![Response::Asset(asset.clone())]);

        let first = resolver.resolve_asset("logo", "com.example.Docs");
        let second = resolver.resolve_asset("logo", "com.example.Docs");

        assert_eq!(first.as_ref(), Some(&asset));
        assert_eq!(first, second);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn asset_errors_are_swallowed() {
        let (mut resolver, log) = resolver_with(vec![Response::ErrorMessage(
            "no such asset".to_string(),
        )]);

        assert_eq!(resolver.resolve_asset("logo", "com.example.Docs"), None);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn bundle_identifier_is_immutable_after_construction() {
        let (resolver, _log) = resolver_with(vec![]);

        assert_eq!(resolver.bundle_identifier(), "com.example.Docs");
    }

    #[test]
    fn a_substituted_markup_parser_sees_the_abstract_source() {
        struct ShoutingParser;

        impl MarkupParser for ShoutingParser {
            fn parse(&self, source: &str) -> crate::types::MarkupDocument {
                crate::types::MarkupDocument {
                    paragraphs: vec![source.to_uppercase()],
                }
            }
        }

        let (resolver, _log) = resolver_with(vec![Response::ResolvedInformation(
            symbol_information(),
        )]);
        let mut resolver = resolver.with_markup_parser(Box::new(ShoutingParser));

        let node = resolver.symbol_entity("s:3Foo3BarC").unwrap();

        assert_eq!(
            node.abstract_section.paragraphs,
            vec!["A CLASS.".to_string()]
        );
    }
}
