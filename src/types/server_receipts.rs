use serde::{Deserialize, Serialize};

/// Reply from `/api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: String,

    /// Where the server stored the document.
    #[serde(default)]
    pub saved: String,
}

/// Reply from `/api/reindex`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReindexReport {
    pub status: String,

    /// Index statistics; their shape is up to the server.
    #[serde(default)]
    pub stats: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn upload_receipt() {
        let receipt: UploadReceipt =
            from_value(json!({"status": "ok", "saved": "1 Dataset/AMM.pdf"})).unwrap();
        assert_eq!(receipt.status, "ok");
        assert_eq!(receipt.saved, "1 Dataset/AMM.pdf");
    }

    #[test]
    fn reindex_report() {
        let report: ReindexReport =
            from_value(json!({"status": "ok", "stats": {"files": 3, "chunks": 120}})).unwrap();
        assert_eq!(report.stats["chunks"], 120);
    }
}
