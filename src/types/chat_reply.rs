use serde::{Deserialize, Serialize};

use crate::types::lenient;
use crate::types::{ReplyMetrics, SourceLink};

/// A successful reply from `/api/chat`.
///
/// Only `answer` and `session_id` are required.  The remaining fields are
/// extras the server may add; they default when absent or malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    /// The assistant's answer, as markdown.
    pub answer: String,

    /// The session identifier to send with the next request.
    pub session_id: String,

    /// Policy label the server assigned to the question.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,

    /// Sources consulted for the answer.
    #[serde(
        default,
        deserialize_with = "lenient::skip_invalid",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<SourceLink>,

    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub metrics: Option<ReplyMetrics>,

    /// Token usage as reported by the upstream model; opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

impl ChatReply {
    /// Create a reply carrying only the required fields.
    pub fn new(answer: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            session_id: session_id.into(),
            label: None,
            links: Vec::new(),
            metrics: None,
            usage: None,
        }
    }

    /// Set the source links.
    pub fn with_links(mut self, links: Vec<SourceLink>) -> Self {
        self.links = links;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkKind;
    use serde_json::{from_value, json};

    #[test]
    fn minimal_reply() {
        let reply: ChatReply =
            from_value(json!({"answer": "**hello**", "session_id": "abc123"})).unwrap();
        assert_eq!(reply, ChatReply::new("**hello**", "abc123"));
    }

    #[test]
    fn full_server_reply() {
        let reply: ChatReply = from_value(json!({
            "session_id": "5d1c",
            "label": "maintenance",
            "answer": "## Short Overview\nCheck the tire.",
            "links": [
                {"type": "pdf", "name": "AMM.pdf", "page": 3, "href": "/docs/AMM.pdf#page=3"}
            ],
            "metrics": {"origin": "RAG", "runtime": {"total": 1.0, "hits": 5}},
            "usage": {"prompt_tokens": 10, "completion_tokens": 20}
        }))
        .unwrap();
        assert_eq!(reply.label.as_deref(), Some("maintenance"));
        assert_eq!(reply.links.len(), 1);
        assert_eq!(reply.links[0].kind, LinkKind::Pdf);
        assert_eq!(reply.metrics.as_ref().map(|m| m.runtime.hits), Some(5));
        assert!(reply.usage.is_some());
    }

    #[test]
    fn malformed_extras_do_not_lose_the_answer() {
        let reply: ChatReply = from_value(json!({
            "answer": "**hello**",
            "session_id": "abc123",
            "label": 3,
            "links": [
                {"type": "web", "name": null, "href": "", "page": null},
                "not a link",
                {"type": "pdf", "name": "AMM.pdf", "href": "/docs/AMM.pdf", "page": "seven"}
            ],
            "metrics": {"origin": "RAG", "runtime": "fast"}
        }))
        .unwrap();
        assert_eq!(reply.answer, "**hello**");
        assert_eq!(reply.session_id, "abc123");
        assert_eq!(reply.label, None);
        assert_eq!(reply.links.len(), 2);
        assert_eq!(reply.links[0].kind, LinkKind::Web);
        assert_eq!(reply.links[0].name, "");
        assert_eq!(reply.links[1].page, None);
        assert_eq!(reply.metrics, None);
    }

    #[test]
    fn links_of_the_wrong_shape_are_dropped() {
        let reply: ChatReply =
            from_value(json!({"answer": "a", "session_id": "s", "links": {"oops": 1}})).unwrap();
        assert!(reply.links.is_empty());
    }

    #[test]
    fn missing_session_id_is_rejected() {
        let reply = from_value::<ChatReply>(json!({"answer": "hi"}));
        assert!(reply.is_err());
    }
}
