use serde::{Deserialize, Serialize};

/// Timings the server reports for one answer, in seconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeMetrics {
    /// Wall time for the whole request.
    #[serde(default)]
    pub total: f64,

    /// Time spent in document retrieval.
    #[serde(default)]
    pub retrieval: f64,

    /// Time spent in the web search fallback.
    #[serde(default)]
    pub web: f64,

    /// Time spent waiting for the language model.
    #[serde(default)]
    pub llm: f64,

    /// Number of retrieved passages.
    #[serde(default)]
    pub hits: u32,

    /// Whether the web search fallback ran.
    #[serde(default)]
    pub fallback_used: bool,
}

/// Provenance and timing of an answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReplyMetrics {
    /// One of `RAG`, `LLM` or `RAG+LLM`.
    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub runtime: RuntimeMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn full_metrics() {
        let metrics: ReplyMetrics = from_value(json!({
            "origin": "RAG+LLM",
            "runtime": {
                "total": 2.5,
                "retrieval": 0.25,
                "web": 0.5,
                "llm": 1.75,
                "hits": 1,
                "fallback_used": true
            }
        }))
        .unwrap();
        assert_eq!(metrics.origin, "RAG+LLM");
        assert_eq!(metrics.runtime.hits, 1);
        assert!(metrics.runtime.fallback_used);
        assert_eq!(metrics.runtime.llm, 1.75);
    }

    #[test]
    fn partial_metrics() {
        let metrics: ReplyMetrics = from_value(json!({"origin": "LLM"})).unwrap();
        assert_eq!(metrics.runtime, RuntimeMetrics::default());
    }
}
