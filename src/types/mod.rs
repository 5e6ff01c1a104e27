// Public modules
pub mod chat_reply;
pub mod chat_request;
mod lenient;
pub mod reply_metrics;
pub mod server_receipts;
pub mod source_link;

// Re-exports
pub use chat_reply::ChatReply;
pub use chat_request::ChatRequest;
pub use reply_metrics::{ReplyMetrics, RuntimeMetrics};
pub use server_receipts::{ReindexReport, UploadReceipt};
pub use source_link::{LinkKind, SourceLink};
