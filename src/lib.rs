// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod markup;
pub mod observability;
pub mod render;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::{ChatBackend, TarmacClient};
pub use error::{Error, Result};
pub use markup::Markup;
pub use observability::register_biometrics;
pub use transcript::{Entry, Message, Origin, Transcript};
pub use types::*;
