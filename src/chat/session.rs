//! Core chat session management.
//!
//! A [`ChatSession`] is the context object for one conversation: it owns the
//! backend, the session identifier the server hands out, the text being
//! composed, and the transcript.  An exchange is split into a synchronous
//! half ([`ChatSession::begin_submit`]) and a completion half
//! ([`ChatSession::complete`]); [`ChatSession::submit`] runs both around the
//! network call.

use std::time::Instant;

use crate::client::ChatBackend;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_ANSWERED, CHAT_BUSY, CHAT_EXCHANGE_DURATION, CHAT_FAILED, CHAT_IGNORED, CHAT_SUBMISSIONS,
};
use crate::transcript::{DEFAULT_VIEWPORT_ROWS, Message, Transcript};
use crate::types::{ChatReply, ChatRequest};

/// Text appended in place of an answer when an exchange fails.
pub const WARNING_TEXT: &str = "⚠️ Error fetching response.";

/// Whether a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingResponse,
}

/// A request that has been recorded in the transcript but not yet answered.
#[derive(Debug)]
pub struct PendingExchange {
    request: ChatRequest,
    started: Instant,
    generation: u64,
}

impl PendingExchange {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// What [`ChatSession::begin_submit`] did with the composed text.
#[derive(Debug)]
pub enum Submission {
    /// The input was empty after trimming; nothing happened.
    Ignored,
    /// A request is already in flight; the input was left in the composer.
    Busy,
    /// The user message was appended and a request must be sent.
    Sent(PendingExchange),
}

/// How a submission ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Empty input; no request was made.
    Ignored,
    /// Refused because another request was in flight.
    Busy,
    /// The answer was appended.
    Answered,
    /// The warning was appended; the error is what went wrong.
    Failed(Error),
    /// The session was reset while the request was in flight; the result
    /// was dropped.
    Stale,
}

impl Outcome {
    /// Returns true if an answer was appended.
    pub fn is_answered(&self) -> bool {
        matches!(self, Outcome::Answered)
    }

    /// Returns true if the warning was appended.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The server-issued session identifier, if any.
    pub session_id: Option<String>,
    /// The number of entries in the transcript.
    pub message_count: usize,
    /// Requests sent.
    pub total_requests: u64,
    /// Requests that produced an answer.
    pub total_answered: u64,
    /// Requests that ended with the warning.
    pub total_failed: u64,
}

/// A chat conversation with one server.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    session_id: Option<String>,
    input: String,
    transcript: Transcript,
    state: ExchangeState,
    generation: u64,
    last_reply: Option<ChatReply>,
    request_count: u64,
    answered_count: u64,
    failed_count: u64,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new chat session over the given backend.
    pub fn new(backend: B) -> Self {
        Self::with_viewport_rows(backend, DEFAULT_VIEWPORT_ROWS)
    }

    /// Creates a new chat session whose transcript is shown `rows` high.
    pub fn with_viewport_rows(backend: B, rows: usize) -> Self {
        Self {
            backend,
            session_id: None,
            input: String::new(),
            transcript: Transcript::with_viewport_rows(rows),
            state: ExchangeState::Idle,
            generation: 0,
            last_reply: None,
            request_count: 0,
            answered_count: 0,
            failed_count: 0,
        }
    }

    /// Returns the backend requests are sent to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The text currently being composed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the text being composed.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns the server-issued session identifier, if one is held.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The transcript, for scrolling and resizing.
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Returns whether a request is in flight.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// The most recent successful reply, with its sources and metrics.
    pub fn last_reply(&self) -> Option<&ChatReply> {
        self.last_reply.as_ref()
    }

    /// Start submitting the composed text.
    ///
    /// On [`Submission::Sent`] the caller must pass the pending exchange and
    /// the backend's result to [`ChatSession::complete`].
    pub fn begin_submit(&mut self) -> Submission {
        let message = self.input.trim();
        if message.is_empty() {
            CHAT_IGNORED.click();
            return Submission::Ignored;
        }
        if self.state == ExchangeState::AwaitingResponse {
            CHAT_BUSY.click();
            tracing::debug!("submission refused while a request is in flight");
            return Submission::Busy;
        }
        let message = message.to_string();
        self.transcript.push(Message::user(message.clone()));
        self.input.clear();
        self.state = ExchangeState::AwaitingResponse;
        self.request_count += 1;
        CHAT_SUBMISSIONS.click();
        Submission::Sent(PendingExchange {
            request: ChatRequest::new(message).with_session_id(self.session_id.clone()),
            started: Instant::now(),
            generation: self.generation,
        })
    }

    /// Finish an exchange started by [`ChatSession::begin_submit`].
    ///
    /// Results of exchanges begun before the last [`ChatSession::reset`] are
    /// dropped without touching the session.
    pub fn complete(&mut self, pending: PendingExchange, result: Result<ChatReply>) -> Outcome {
        CHAT_EXCHANGE_DURATION.add(pending.started.elapsed().as_secs_f64());
        if pending.generation != self.generation {
            tracing::debug!("dropping reply to a request from a previous session");
            return Outcome::Stale;
        }
        self.state = ExchangeState::Idle;
        match result {
            Ok(reply) => {
                self.session_id = Some(reply.session_id.clone()).filter(|id| !id.is_empty());
                self.transcript.push(Message::assistant(reply.answer.clone()));
                self.last_reply = Some(reply);
                self.answered_count += 1;
                CHAT_ANSWERED.click();
                Outcome::Answered
            }
            Err(err) => {
                match &err {
                    Error::Api {
                        status_code, body, ..
                    } => {
                        tracing::error!(status = status_code, body = %body, "chat error");
                    }
                    _ => tracing::error!(error = %err, "chat request failed"),
                }
                self.transcript.push(Message::assistant(WARNING_TEXT));
                self.failed_count += 1;
                CHAT_FAILED.click();
                Outcome::Failed(err)
            }
        }
    }

    /// Submit the composed text and wait for the exchange to finish.
    pub async fn submit(&mut self) -> Outcome {
        match self.begin_submit() {
            Submission::Ignored => Outcome::Ignored,
            Submission::Busy => Outcome::Busy,
            Submission::Sent(pending) => {
                let result = self.backend.chat(pending.request()).await;
                self.complete(pending, result)
            }
        }
    }

    /// Compose `text` and submit it.
    pub async fn send(&mut self, text: &str) -> Outcome {
        self.set_input(text);
        self.submit().await
    }

    /// Clear the transcript but keep the conversation going.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Forget the session identifier and the transcript.
    ///
    /// A request still in flight is abandoned: its result will be dropped and
    /// the session is immediately ready for a new submission.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ExchangeState::Idle;
        self.session_id = None;
        self.last_reply = None;
        self.transcript.clear();
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.session_id.clone(),
            message_count: self.transcript.len(),
            total_requests: self.request_count,
            total_answered: self.answered_count,
            total_failed: self.failed_count,
        }
    }
}
