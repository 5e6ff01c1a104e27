//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the server.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the transcript but keep the session.
    Clear,

    /// Forget the session identifier and start over.
    New,

    /// Show the current session identifier.
    Session,

    /// List the sources cited by the last answer.
    Sources,

    /// Redraw the visible part of the transcript.
    Redraw,

    /// Upload a document to the server.
    Upload(String),

    /// Ask the server to rebuild its index.
    Reindex,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use tarmac::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/upload manuals/AMM-32.pdf").is_some());
/// assert!(parse_command("How do I change a tire?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "new" | "reset" => ChatCommand::New,
        "session" => ChatCommand::Session,
        "sources" | "links" => ChatCommand::Sources,
        "upload" => match argument {
            Some(path) => ChatCommand::Upload(path.to_string()),
            None => ChatCommand::Invalid("/upload requires a file path".to_string()),
        },
        "reindex" => ChatCommand::Reindex,
        "redraw" | "history" => ChatCommand::Redraw,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear the transcript (the session continues)
  /new                   Start a new session
  /session               Show the session identifier
  /sources               List the sources of the last answer
  /redraw                Redraw the transcript view
  /upload <file>         Upload a document to the server
  /reindex               Rebuild the server's document index
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
