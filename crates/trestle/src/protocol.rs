//! Wire types exchanged with a resolver peer.
//!
//! Every message is one UTF-8 JSON value per line, terminated by `\n`.
//! Requests and responses are tagged unions encoded as single-key objects
//! whose key names the variant (`{"topic":...}`, `{"errorMessage":...}`); a
//! value with an unknown key, or more than one key, does not decode.
//! Embedded newlines only ever appear as escape sequences inside string
//! literals, so line framing and JSON framing agree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::SourceLanguage;

/// A request sent to the resolver peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    /// Resolve a topic URL.
    Topic(String),
    /// Resolve a symbol by its precise identifier.
    Symbol(String),
    /// Resolve an asset by name within a bundle.
    #[serde(rename_all = "camelCase")]
    Asset {
        /// The name of the asset.
        asset_name: String,
        /// The bundle the asset belongs to.
        bundle_identifier: String,
    },
}

impl Request {
    /// Encode this request as one newline-terminated JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnableToEncodeRequest`] carrying this request's
    /// description when encoding fails.
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).map_err(|source| Error::UnableToEncodeRequest {
            description: self.to_string(),
            source,
        })?;
        line.push('\n');
        Ok(line)
    }

    /// Decode a request from one line.
    ///
    /// This is the peer-side half of the wire contract, exposed so test
    /// peers written against this crate read requests the same way real
    /// ones must.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTypeOfRequest`] when the line is not a
    /// single-key request object.
    pub fn from_line(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end_matches('\n')).map_err(|_| Error::UnknownTypeOfRequest)
    }
}

impl fmt::Display for Request {
    /// The human-readable description used in error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic(url) => write!(f, "topic: '{url}'"),
            Self::Symbol(precise_identifier) => write!(f, "symbol: '{precise_identifier}'"),
            Self::Asset {
                asset_name,
                bundle_identifier,
            } => write!(f, "asset: '{asset_name}' in bundle '{bundle_identifier}'"),
        }
    }
}

/// A reply received from the resolver peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    /// The peer's one-time bundle identifier announcement. Only legal as
    /// the very first reply from a resolver process.
    BundleIdentifier(String),
    /// The peer could not fulfill the request.
    ErrorMessage(String),
    /// The reply to a topic or symbol request.
    ResolvedInformation(ResolvedInformation),
    /// The reply to an asset request.
    Asset(DataAsset),
}

impl Response {
    /// Decode a response from one line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnableToDecodeResponse`] carrying the raw line when
    /// it is not a single-key response object.
    pub fn from_line(line: &str) -> Result<Self> {
        let trimmed = line.trim_end_matches('\n');
        serde_json::from_str(trimmed)
            .map_err(|source| Error::undecodable_response(trimmed.as_bytes(), source))
    }

    /// The wire name of this response's variant, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::BundleIdentifier(_) => "bundleIdentifier",
            Self::ErrorMessage(_) => "errorMessage",
            Self::ResolvedInformation(_) => "resolvedInformation",
            Self::Asset(_) => "asset",
        }
    }
}

/// Everything the peer knows about one resolved topic or symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInformation {
    /// What kind of entity resolved.
    pub kind: EntityKind,
    /// The canonical external URL the host should link to.
    pub url: String,
    /// Plain-text title.
    pub title: String,
    /// Plain-text markup source of the abstract.
    #[serde(rename = "abstract")]
    pub abstract_summary: String,
    /// The primary source language.
    pub language: SourceLanguage,
    /// All languages the entity is available in.
    pub available_languages: BTreeSet<SourceLanguage>,
    /// Per-platform availability, in the peer's order.
    #[serde(default)]
    pub platforms: Option<Vec<PlatformAvailability>>,
    /// Syntax-highlighted declaration tokens, for symbols that have them.
    #[serde(default)]
    pub declaration_fragments: Option<Vec<DeclarationFragment>>,
}

/// The kind of a resolved entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityKind {
    /// Display name, e.g. `"Class"`.
    pub name: String,
    /// Stable identifier, e.g. `"class"`.
    pub id: String,
    /// Whether the entity is a symbol (as opposed to a conceptual topic).
    pub is_symbol: bool,
}

/// Availability of a symbol on one platform.
///
/// Version fields are strings on the wire; they are parsed tolerantly
/// during entity projection and dropped individually when unparseable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAvailability {
    /// The platform name as the peer spells it, e.g. `"iOS"`.
    pub name: String,
    /// The version the symbol was introduced in.
    #[serde(default)]
    pub introduced: Option<String>,
    /// The version the symbol was deprecated in.
    #[serde(default)]
    pub deprecated: Option<String>,
    /// The version the symbol was obsoleted in.
    #[serde(default)]
    pub obsoleted: Option<String>,
    /// The replacement the symbol was renamed to.
    #[serde(default)]
    pub renamed: Option<String>,
    /// Deprecated on this platform regardless of version.
    #[serde(default)]
    pub unconditionally_deprecated: Option<bool>,
    /// Unavailable on this platform altogether.
    #[serde(default)]
    pub unconditionally_unavailable: Option<bool>,
}

/// One token of a syntax-highlighted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationFragment {
    /// Token kind, e.g. `"keyword"`, `"identifier"`.
    pub kind: String,
    /// The token text.
    pub spelling: String,
    /// The precise identifier of the symbol the token refers to, if any.
    #[serde(default)]
    pub precise_identifier: Option<String>,
}

/// A resolved asset: URLs for each variant the peer has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAsset {
    /// Variant trait (e.g. `"1x"`, `"2x"`, `"dark"`) to URL.
    #[serde(default)]
    pub variants: BTreeMap<String, String>,
    /// Per-variant metadata, keyed the same way as `variants`.
    #[serde(default)]
    pub metadata: BTreeMap<String, AssetMetadata>,
}

/// Metadata attached to one asset variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    /// Alternative text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
}
