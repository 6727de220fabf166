//! Host-facing data model: references, topic URLs, source languages,
//! platform versions, and the markup seam.
//!
//! These are the types the documentation compiler exchanges with the
//! resolver. Wire-only payload shapes live in [`crate::protocol`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A source language a documentation entity is available in.
///
/// Carries both a display name and a lowercase identifier, matching the
/// wire shape `{"name":"Swift","id":"swift"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLanguage {
    /// Display name, e.g. `"Swift"`.
    pub name: String,
    /// Stable identifier, e.g. `"swift"`.
    pub id: String,
}

impl SourceLanguage {
    /// Create a source language from its display name and identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A topic URL could not be split into scheme, bundle, path, and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid reference URL: '{0}'")]
pub struct InvalidTopicUrl(pub String);

/// A parsed topic URL of the form `scheme://bundle/path#fragment`.
///
/// The authority component is the bundle identifier. References without an
/// authority are local references, which are outside this crate's remit;
/// parsing still succeeds so callers can inspect them, with
/// [`TopicUrl::bundle_identifier`] absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicUrl {
    /// URL scheme, conventionally `doc`.
    pub scheme: String,
    /// The bundle identifier, when the URL carries an authority.
    pub bundle_identifier: Option<String>,
    /// The path, including its leading `/` (empty for bare bundle URLs).
    pub path: String,
    /// The fragment, without the `#`.
    pub fragment: Option<String>,
}

impl TopicUrl {
    /// Parse a topic URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTopicUrl`] when the text has no scheme separator, an
    /// empty or malformed scheme, or embedded whitespace.
    pub fn parse(text: &str) -> Result<Self, InvalidTopicUrl> {
        let invalid = || InvalidTopicUrl(text.to_string());

        if text.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (scheme, rest) = text.split_once("://").ok_or_else(invalid)?;
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(invalid());
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (rest, None),
        };

        let (authority, path) = match rest.find('/') {
            Some(index) => (&rest[..index], rest[index..].to_string()),
            None => (rest, String::new()),
        };

        let bundle_identifier = (!authority.is_empty()).then(|| authority.to_string());

        Ok(Self {
            scheme: scheme.to_string(),
            bundle_identifier,
            path,
            fragment,
        })
    }

    /// Render this URL normalized to the `doc` scheme.
    ///
    /// This rendering is what resolved references reproduce, so it is the
    /// canonical key for anything cached per topic URL.
    #[must_use]
    pub fn doc_url(&self) -> String {
        let mut url = format!(
            "doc://{}{}",
            self.bundle_identifier.as_deref().unwrap_or(""),
            self.path
        );
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

impl fmt::Display for TopicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}",
            self.scheme,
            self.bundle_identifier.as_deref().unwrap_or(""),
            self.path
        )?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// A reference that has not been resolved yet.
///
/// Holds the raw topic URL text as authored, so that malformed URLs stay
/// representable until resolution reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// The topic URL as authored, e.g. `doc://com.example.Docs/Foo/Bar`.
    pub topic_url: String,
}

impl UnresolvedReference {
    /// Create an unresolved reference from raw topic URL text.
    #[must_use]
    pub fn new(topic_url: impl Into<String>) -> Self {
        Self {
            topic_url: topic_url.into(),
        }
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.topic_url)
    }
}

/// A canonical, post-resolution reference.
///
/// Two references are equal iff bundle identifier, path, fragment, and
/// source language are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedReference {
    /// The identifier of the bundle the reference belongs to.
    pub bundle_identifier: String,
    /// The path within the bundle, including its leading `/`.
    pub path: String,
    /// The fragment, without the `#`.
    pub fragment: Option<String>,
    /// The language the referenced entity was resolved for.
    pub source_language: SourceLanguage,
}

impl ResolvedReference {
    /// Create a resolved reference.
    #[must_use]
    pub fn new(
        bundle_identifier: impl Into<String>,
        path: impl Into<String>,
        fragment: Option<String>,
        source_language: SourceLanguage,
    ) -> Self {
        Self {
            bundle_identifier: bundle_identifier.into(),
            path: path.into(),
            fragment,
            source_language,
        }
    }

    /// Render the canonical `doc://` URL for this reference.
    #[must_use]
    pub fn url(&self) -> String {
        let mut url = format!("doc://{}{}", self.bundle_identifier, self.path);
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }

    /// The last component of the reference path.
    #[must_use]
    pub fn last_path_component(&self) -> &str {
        last_path_component(&self.path)
    }
}

impl fmt::Display for ResolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// The last `/`-separated component of a path.
pub(crate) fn last_path_component(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A topic reference as the host pipeline carries it: either still
/// unresolved, or the outcome of an earlier resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicReference {
    /// Not resolved yet.
    Unresolved(UnresolvedReference),
    /// Already went through a resolver.
    Resolved(TopicResolutionResult),
}

/// The outcome of resolving one topic reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicResolutionResult {
    /// The reference resolved to a canonical reference.
    Success(ResolvedReference),
    /// The reference did not resolve; the original reference is kept
    /// together with a human-readable explanation.
    Failure {
        /// The reference that failed to resolve.
        reference: UnresolvedReference,
        /// Why resolution failed.
        message: String,
    },
}

/// A platform version, parsed tolerantly.
///
/// Availability metadata in the wild writes versions as one to three
/// dot-separated components (`"13"`, `"13.5"`, `"13.5.1"`); missing
/// components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a version from its components.
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string with one to three numeric components.
    ///
    /// Returns `None` for anything else; callers treat unparseable
    /// versions as absent rather than failing the surrounding entry.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let components: Vec<&str> = text.split('.').collect();
        if components.len() > 3 {
            return None;
        }

        let mut parsed = [0u32; 3];
        for (slot, component) in parsed.iter_mut().zip(&components) {
            *slot = component.parse().ok()?;
        }

        Some(Self::new(parsed[0], parsed[1], parsed[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A parsed markup document.
///
/// Deliberately skeletal: the bridge only transports abstracts, it does
/// not interpret them. Hosts with a richer markup model plug their parser
/// in through [`MarkupParser`] and rebuild their own document from the
/// source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupDocument {
    /// The paragraphs of the document, in order.
    pub paragraphs: Vec<String>,
}

impl MarkupDocument {
    /// The document flattened back to plain text.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

/// Parses abstract markup source into a document.
///
/// The resolver consumes this as a seam so hosts supply their real markup
/// parser and tests supply stubs.
pub trait MarkupParser: Send {
    /// Parse markup source text into a document.
    fn parse(&self, source: &str) -> MarkupDocument;
}

/// Default markup parser: plain text split into paragraphs on blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl MarkupParser for PlainTextParser {
    fn parse(&self, source: &str) -> MarkupDocument {
        MarkupDocument {
            paragraphs: source
                .split("\n\n")
                .map(str::trim)
                .filter(|paragraph| !paragraph.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}
