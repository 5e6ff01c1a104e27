use serde::{Deserialize, Serialize};

/// The form fields posted to `/api/chat`.
///
/// `session_id` is left off the wire entirely until the server has issued one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The trimmed user message.
    pub message: String,

    /// The session identifier from the previous reply, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a request for a message with no session attached.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    /// Attach a session identifier.
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_without_session_omits_field() {
        let request = ChatRequest::new("hello");
        assert_eq!(to_value(&request).unwrap(), json!({"message": "hello"}));
    }

    #[test]
    fn request_with_session() {
        let request = ChatRequest::new("hello").with_session_id(Some("abc123".to_string()));
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"message": "hello", "session_id": "abc123"})
        );
    }
}
