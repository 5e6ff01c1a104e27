use serde::{Deserialize, Serialize};

use crate::types::lenient;

/// Where a cited passage came from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A page of an indexed document.
    Pdf,
    /// A web search result.
    Web,
    /// Anything this client does not know about yet.
    #[default]
    #[serde(other)]
    Other,
}

/// A source the server consulted while answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLink {
    /// Document or web result.
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    pub kind: LinkKind,

    /// File name or page title; empty when the server sent none.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,

    /// Link to the source, relative to the server for documents.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub href: String,

    /// Page number for documents.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<u32>,
}

impl SourceLink {
    /// A one-line description suitable for a terminal listing.
    pub fn describe(&self) -> String {
        match (self.kind, self.page) {
            (LinkKind::Pdf, Some(page)) => format!("{} (p.{page}) {}", self.name, self.href),
            _ => format!("{} {}", self.name, self.href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn document_link() {
        let link: SourceLink = from_value(json!({
            "type": "pdf",
            "name": "AMM-32.pdf",
            "page": 12,
            "href": "/docs/AMM-32.pdf#page=12"
        }))
        .unwrap();
        assert_eq!(link.kind, LinkKind::Pdf);
        assert_eq!(link.page, Some(12));
        assert_eq!(link.describe(), "AMM-32.pdf (p.12) /docs/AMM-32.pdf#page=12");
    }

    #[test]
    fn web_link_with_null_page() {
        let link: SourceLink = from_value(json!({
            "type": "web",
            "name": "Tire pressure checks",
            "href": "https://example.com/tires",
            "page": null
        }))
        .unwrap();
        assert_eq!(link.kind, LinkKind::Web);
        assert_eq!(link.page, None);
        assert_eq!(link.describe(), "Tire pressure checks https://example.com/tires");
    }

    #[test]
    fn null_title_and_kind() {
        let link: SourceLink = from_value(json!({
            "type": null,
            "name": null,
            "href": "https://example.com/a"
        }))
        .unwrap();
        assert_eq!(link.kind, LinkKind::Other);
        assert_eq!(link.name, "");
        assert_eq!(link.href, "https://example.com/a");
    }

    #[test]
    fn unknown_kind() {
        let link: SourceLink = from_value(json!({
            "type": "video",
            "name": "walkthrough",
            "href": "/v/1"
        }))
        .unwrap();
        assert_eq!(link.kind, LinkKind::Other);
    }
}
