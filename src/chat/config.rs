//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::transcript::DEFAULT_VIEWPORT_ROWS;

/// Command-line arguments for the tarmac-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the assistant server.
    #[arrrg(optional, "Server URL (default: $TARMAC_SERVER_URL or http://127.0.0.1:8000/)", "URL")]
    pub server: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Height of the transcript view in rows.
    #[arrrg(optional, "Transcript view height in rows (default: 24)", "ROWS")]
    pub rows: Option<usize>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Server URL.  `None` defers to the environment and then the default.
    pub server_url: Option<String>,

    /// Request timeout.  `None` leaves timing to the transport.
    pub timeout: Option<Duration>,

    /// Height of the transcript view in rows.
    pub viewport_rows: usize,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Server: from the environment
    /// - Timeout: none
    /// - View: 24 rows
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            server_url: None,
            timeout: None,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
            use_color: true,
        }
    }

    /// Sets the server URL.
    pub fn with_server_url(mut self, url: String) -> Self {
        self.server_url = Some(url);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the transcript view height.
    pub fn with_viewport_rows(mut self, rows: usize) -> Self {
        self.viewport_rows = rows;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            server_url: args.server,
            timeout: args.timeout_secs.map(Duration::from_secs),
            viewport_rows: args.rows.unwrap_or(DEFAULT_VIEWPORT_ROWS),
            use_color: !args.no_color,
        }
    }
}
