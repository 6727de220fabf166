//! Projection of resolver replies into host-facing documentation entities.
//!
//! Projection is pure: it depends only on the cached reply and the markup
//! parser, never on further I/O.

use std::collections::BTreeSet;

use crate::protocol::{DeclarationFragment, EntityKind, PlatformAvailability, ResolvedInformation};
use crate::types::{MarkupDocument, MarkupParser, ResolvedReference, SourceLanguage, Version};

/// The canonical availability domain identifier for Mac Catalyst.
///
/// Peers spell the platform `"Mac Catalyst"`; the availability model uses
/// the canonical identifier. All other platform names pass through as-is.
const MAC_CATALYST_DOMAIN: &str = "macCatalyst";

/// A skeletal documentation node built from one resolver reply.
///
/// Carries just enough for the host to render a link, a title, an
/// abstract, and (for symbols) a declaration with availability.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentationNode {
    /// The canonical reference this node was resolved for.
    pub reference: ResolvedReference,
    /// The kind of the resolved entity.
    pub kind: EntityKind,
    /// The primary source language.
    pub source_language: SourceLanguage,
    /// All languages the entity is available in.
    pub available_source_languages: BTreeSet<SourceLanguage>,
    /// The conceptual name, derived from the reply's title.
    pub name: String,
    /// The abstract, parsed from its markup source.
    pub abstract_section: MarkupDocument,
    /// The symbol semantic, present exactly when the kind is a symbol.
    pub semantic: Option<SymbolSemantic>,
    /// The names of the platforms the reply declared, in the peer's order.
    pub platform_names: Option<Vec<String>>,
}

/// A sparse symbol semantic: kind, title, declaration, availability.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSemantic {
    /// The symbol's kind.
    pub kind: EntityKind,
    /// The symbol's title.
    pub title: String,
    /// Syntax-highlighted declaration tokens, when the peer supplied them.
    pub declaration_fragments: Option<Vec<DeclarationFragment>>,
    /// Per-platform availability, one entry per declared platform.
    pub availability: Vec<Availability>,
}

/// Availability of a symbol in one platform domain.
///
/// Only the fields the wire carries are populated; everything else a
/// richer availability model might have stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// The availability domain, e.g. `"iOS"` or `"macCatalyst"`.
    pub domain: String,
    /// The version the symbol was introduced in.
    pub introduced: Option<Version>,
    /// The version the symbol was deprecated in.
    pub deprecated: Option<Version>,
    /// The version the symbol was obsoleted in.
    pub obsoleted: Option<Version>,
    /// The replacement the symbol was renamed to.
    pub renamed: Option<String>,
    /// Deprecated in this domain regardless of version.
    pub is_unconditionally_deprecated: bool,
    /// Unavailable in this domain altogether.
    pub is_unconditionally_unavailable: bool,
}

/// Build a documentation node from a reply and the reference minted for it.
pub(crate) fn project_node(
    reference: ResolvedReference,
    information: &ResolvedInformation,
    markup: &dyn MarkupParser,
) -> DocumentationNode {
    let semantic = information
        .kind
        .is_symbol
        .then(|| project_symbol(information));

    DocumentationNode {
        kind: information.kind.clone(),
        source_language: information.language.clone(),
        available_source_languages: information.available_languages.clone(),
        name: information.title.clone(),
        abstract_section: markup.parse(&information.abstract_summary),
        semantic,
        platform_names: information
            .platforms
            .as_ref()
            .map(|platforms| platforms.iter().map(|p| p.name.clone()).collect()),
        reference,
    }
}

fn project_symbol(information: &ResolvedInformation) -> SymbolSemantic {
    SymbolSemantic {
        kind: information.kind.clone(),
        title: information.title.clone(),
        declaration_fragments: information.declaration_fragments.clone(),
        availability: information
            .platforms
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(availability_entry)
            .collect(),
    }
}

fn availability_entry(platform: &PlatformAvailability) -> Availability {
    Availability {
        domain: availability_domain(&platform.name),
        introduced: parse_version(platform.introduced.as_deref()),
        deprecated: parse_version(platform.deprecated.as_deref()),
        obsoleted: parse_version(platform.obsoleted.as_deref()),
        renamed: platform.renamed.clone(),
        is_unconditionally_deprecated: platform.unconditionally_deprecated.unwrap_or(false),
        is_unconditionally_unavailable: platform.unconditionally_unavailable.unwrap_or(false),
    }
}

fn availability_domain(name: &str) -> String {
    if name == "Mac Catalyst" {
        MAC_CATALYST_DOMAIN.to_string()
    } else {
        name.to_string()
    }
}

/// Unparseable versions become absent; the entry itself is kept.
fn parse_version(text: Option<&str>) -> Option<Version> {
    text.and_then(Version::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlainTextParser;

    fn swift() -> SourceLanguage {
        SourceLanguage::new("Swift", "swift")
    }

    fn class_kind() -> EntityKind {
        EntityKind {
            name: "Class".to_string(),
            id: "class".to_string(),
            is_symbol: true,
        }
    }

    fn article_kind() -> EntityKind {
        EntityKind {
            name: "Article".to_string(),
            id: "article".to_string(),
            is_symbol: false,
        }
    }

    fn information(kind: EntityKind, platforms: Option<Vec<PlatformAvailability>>) -> ResolvedInformation {
        ResolvedInformation {
            kind,
            url: "https://x/Foo/Bar".to_string(),
            title: "Bar".to_string(),
            abstract_summary: "A class.\n\nWith details.".to_string(),
            language: swift(),
            available_languages: [swift()].into_iter().collect(),
            platforms,
            declaration_fragments: None,
        }
    }

    fn platform(name: &str, introduced: Option<&str>) -> PlatformAvailability {
        PlatformAvailability {
            name: name.to_string(),
            introduced: introduced.map(String::from),
            deprecated: None,
            obsoleted: None,
            renamed: None,
            unconditionally_deprecated: None,
            unconditionally_unavailable: None,
        }
    }

    fn reference() -> ResolvedReference {
        ResolvedReference::new("com.example.Docs", "/Foo/Bar", None, swift())
    }

    #[test]
    fn non_symbol_kind_projects_without_a_semantic() {
        let info = information(article_kind(), None);

        let node = project_node(reference(), &info, &PlainTextParser);

        assert!(node.semantic.is_none());
        assert_eq!(node.name, "Bar");
        assert_eq!(node.platform_names, None);
        assert_eq!(
            node.abstract_section.paragraphs,
            vec!["A class.".to_string(), "With details.".to_string()]
        );
    }

    #[test]
    fn symbol_kind_projects_one_availability_entry_per_platform() {
        let info = information(
            class_kind(),
            Some(vec![
                platform("iOS", Some("13.0")),
                platform("macOS", Some("10.15")),
            ]),
        );

        let node = project_node(reference(), &info, &PlainTextParser);

        let semantic = node.semantic.expect("symbol reply must project a semantic");
        assert_eq!(semantic.availability.len(), 2);
        assert_eq!(semantic.title, "Bar");
        assert_eq!(
            node.platform_names,
            Some(vec!["iOS".to_string(), "macOS".to_string()])
        );
    }

    #[test]
    fn symbol_without_platforms_projects_empty_availability() {
        let info = information(class_kind(), None);

        let node = project_node(reference(), &info, &PlainTextParser);

        assert!(node.semantic.unwrap().availability.is_empty());
    }

    #[test]
    fn mac_catalyst_maps_to_canonical_domain() {
        let info = information(
            class_kind(),
            Some(vec![platform("Mac Catalyst", Some("13.5")), platform("iOS", None)]),
        );

        let node = project_node(reference(), &info, &PlainTextParser);

        let availability = node.semantic.unwrap().availability;
        assert_eq!(availability[0].domain, "macCatalyst");
        assert_eq!(availability[0].introduced, Some(Version::new(13, 5, 0)));
        assert_eq!(availability[1].domain, "iOS");
    }

    #[test]
    fn unparseable_version_becomes_absent_but_entry_survives() {
        let mut entry = platform("iOS", Some("not-a-version"));
        entry.renamed = Some("NewBar".to_string());
        entry.unconditionally_deprecated = Some(true);
        let info = information(class_kind(), Some(vec![entry]));

        let node = project_node(reference(), &info, &PlainTextParser);

        let availability = node.semantic.unwrap().availability;
        assert_eq!(availability.len(), 1);
        assert_eq!(availability[0].introduced, None);
        assert_eq!(availability[0].renamed.as_deref(), Some("NewBar"));
        assert!(availability[0].is_unconditionally_deprecated);
        assert!(!availability[0].is_unconditionally_unavailable);
    }
}
