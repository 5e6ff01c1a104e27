//! Chat application module for conversations with the assistant server.
//!
//! This module provides the session layer of the chat client and the pieces
//! of the `tarmac-chat` REPL built on top of it:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: the session context, its state machine, and exchanges
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{
    ChatSession, ExchangeState, Outcome, PendingExchange, SessionStats, Submission, WARNING_TEXT,
};
