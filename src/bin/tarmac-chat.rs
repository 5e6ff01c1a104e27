//! Interactive chat client for the maintenance-assistant server.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a server on localhost:8000 (or $TARMAC_SERVER_URL)
//! tarmac-chat
//!
//! # Talk to a specific server with a request timeout
//! tarmac-chat --server http://hangar.local:8000 --timeout-secs 120
//!
//! # Disable colors (useful for piping output)
//! tarmac-chat --no-color
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust them.
//! Type `/help` while chatting for the list of slash commands.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use tarmac::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, Submission,
    help_text, parse_command,
};
use tarmac::{ChatBackend, TarmacClient};

/// Main entry point for the tarmac-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("tarmac-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = TarmacClient::with_options(config.server_url.clone(), config.timeout)?;
    let mut session = ChatSession::with_viewport_rows(client, config.viewport_rows);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Maintenance Assistant ({})", session.backend().base_url());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Transcript cleared.");
                        }
                        ChatCommand::New => {
                            session.reset();
                            renderer.print_info("Started a new session.");
                        }
                        ChatCommand::Session => match session.session_id() {
                            Some(id) => renderer.print_info(&format!("Session: {id}")),
                            None => renderer.print_info("Session: (none yet)"),
                        },
                        ChatCommand::Sources => print_sources(&session, &mut renderer),
                        ChatCommand::Redraw => {
                            for entry in session.transcript().visible() {
                                renderer.print_entry(entry);
                            }
                        }
                        ChatCommand::Upload(path) => {
                            match session.backend().upload(&path).await {
                                Ok(receipt) => renderer
                                    .print_info(&format!("Uploaded {path} to {}", receipt.saved)),
                                Err(err) => {
                                    renderer.print_error(&format!("Upload failed: {err}"))
                                }
                            }
                        }
                        ChatCommand::Reindex => match session.backend().reindex().await {
                            Ok(report) => {
                                renderer.print_info(&format!("Reindexed: {}", report.stats))
                            }
                            Err(err) => renderer.print_error(&format!("Reindex failed: {err}")),
                        },
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => print_stats(&session),
                        ChatCommand::ShowConfig => print_config(&session, &config),
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // The prompt line already shows what the user typed.
                session.set_input(line);
                if let Submission::Sent(pending) = session.begin_submit() {
                    renderer.print_waiting();
                    let result = session.backend().chat(pending.request()).await;
                    session.complete(pending, result);
                    if let Some(entry) = session.transcript().last() {
                        renderer.print_entry(entry);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_sources(session: &ChatSession<TarmacClient>, renderer: &mut PlainTextRenderer) {
    let Some(reply) = session.last_reply() else {
        renderer.print_info("No answer yet.");
        return;
    };
    if reply.links.is_empty() {
        renderer.print_info("The last answer cited no sources.");
        return;
    }
    println!("    Sources:");
    for link in &reply.links {
        println!("      - {}", link.describe());
    }
    if let Some(metrics) = &reply.metrics {
        println!(
            "    Origin: {} ({} hits, {:.2}s total)",
            metrics.origin, metrics.runtime.hits, metrics.runtime.total
        );
    }
}

fn print_stats(session: &ChatSession<TarmacClient>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    match stats.session_id {
        Some(ref id) => println!("      Session: {id}"),
        None => println!("      Session: (none yet)"),
    }
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Requests: {} ({} answered, {} failed)",
        stats.total_requests, stats.total_answered, stats.total_failed
    );
    if let Some(label) = session.last_reply().and_then(|r| r.label.as_deref()) {
        println!("      Last label: {label}");
    }
}

fn print_config(session: &ChatSession<TarmacClient>, config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Server: {}", session.backend().base_url());
    match session.backend().timeout() {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs()),
        None => println!("      Timeout: (none)"),
    }
    println!("      View rows: {}", config.viewport_rows);
    println!(
        "      Color: {}",
        if config.use_color { "on" } else { "off" }
    );
}
