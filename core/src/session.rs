//! Conversation Session
//!
//! Mediates every interaction with the model provider for one mounted chat
//! view: holds the visible history, keeps turns in order and turns provider
//! failures into visible messages instead of errors.
//!
//! # Admission control
//!
//! The session handle lives in a one-deep slot. While a request is
//! outstanding the handle is away (moved into the request task) and the slot
//! holds the receiver for its result, so "loading" is simply "the slot is
//! in flight". A submit that finds the slot in flight is dropped, never
//! queued.
//!
//! # Optimistic history
//!
//! The user's message is appended before the request is issued and is never
//! rolled back. A failed request appends a fixed apology in place of the
//! reply.
//!
//! Requests run on the ambient tokio runtime; [`ConversationSession::submit`]
//! must be called from within one.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::backend::{ChatConfig, ChatHandle, ChatProvider};
use crate::messages::ChatMessage;
use crate::persona::{GREETING, INIT_ERROR_MESSAGE, TURN_ERROR_MESSAGE};

/// Everything a session is initialized with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Provider-facing chat configuration
    pub chat: ChatConfig,
    /// Seed greeting shown as the first model turn
    pub greeting: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            greeting: GREETING.to_string(),
        }
    }
}

/// Result of a submit attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The user turn was appended and a request is in flight
    Sent,
    /// Nothing happened
    Ignored(IgnoreReason),
}

/// Why a submit was a no-op
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Text was empty or whitespace only
    Blank,
    /// A request is already in flight
    Busy,
    /// No session handle exists (initialization failed)
    NoHandle,
}

/// What the request task hands back: the handle plus the reply
struct TurnOutcome {
    handle: Box<dyn ChatHandle>,
    result: anyhow::Result<String>,
}

/// Where the session handle currently is
enum HandleSlot {
    /// Never created, or lost with a crashed request task
    Unset,
    /// Ready for the next turn
    Idle(Box<dyn ChatHandle>),
    /// Away in a request task
    InFlight(oneshot::Receiver<TurnOutcome>),
}

/// A conversation with one session handle
pub struct ConversationSession {
    /// Visible history, in display order
    messages: Vec<ChatMessage>,
    /// The session handle, or where it went
    slot: HandleSlot,
    /// User-visible error, if any
    error: Option<String>,
    /// Model the handle was opened for
    model: Option<String>,
}

impl ConversationSession {
    /// Open a chat and seed the greeting
    ///
    /// Never fails: if the provider cannot open a chat the session is
    /// returned without a handle, with an empty history and the error state
    /// set.
    pub fn initialize(provider: &dyn ChatProvider, config: &SessionConfig) -> Self {
        match provider.create_chat(&config.chat) {
            Ok(handle) => {
                tracing::info!(
                    provider = provider.name(),
                    model = %config.chat.model,
                    "Chat session initialized"
                );
                Self {
                    messages: vec![ChatMessage::model(config.greeting.clone())],
                    slot: HandleSlot::Idle(handle),
                    error: None,
                    model: Some(config.chat.model.clone()),
                }
            }
            Err(e) => {
                tracing::error!(
                    provider = provider.name(),
                    error = %e,
                    "Failed to initialize chat session"
                );
                Self {
                    messages: Vec::new(),
                    slot: HandleSlot::Unset,
                    error: Some(INIT_ERROR_MESSAGE.to_string()),
                    model: None,
                }
            }
        }
    }

    /// Visible history, oldest first
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.slot, HandleSlot::InFlight(_))
    }

    /// Current user-visible error
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a session handle exists (idle or in flight)
    #[must_use]
    pub fn has_handle(&self) -> bool {
        !matches!(self.slot, HandleSlot::Unset)
    }

    /// Model the session was opened for
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Whether `submit(text)` would send right now
    #[must_use]
    pub fn can_submit(&self, text: &str) -> bool {
        !text.trim().is_empty() && matches!(self.slot, HandleSlot::Idle(_))
    }

    /// Begin a user turn
    ///
    /// Appends the user message and issues the request in the background.
    /// Blank text, an in-flight request or a missing handle make this a
    /// silent no-op.
    pub fn submit(&mut self, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::Ignored(IgnoreReason::Blank);
        }

        let mut handle = match std::mem::replace(&mut self.slot, HandleSlot::Unset) {
            HandleSlot::Idle(handle) => handle,
            other => {
                let reason = match &other {
                    HandleSlot::InFlight(_) => IgnoreReason::Busy,
                    _ => IgnoreReason::NoHandle,
                };
                self.slot = other;
                tracing::debug!(?reason, "Submit ignored");
                return Submission::Ignored(reason);
            }
        };

        self.error = None;
        self.messages.push(ChatMessage::user(text));

        let (tx, rx) = oneshot::channel();
        let text = text.to_string();
        tokio::spawn(async move {
            let result = handle.send_message(&text).await;
            // Receiver is gone if the view unmounted; the result is dropped
            let _ = tx.send(TurnOutcome { handle, result });
        });

        self.slot = HandleSlot::InFlight(rx);
        tracing::debug!(history = self.messages.len(), "Turn submitted");
        Submission::Sent
    }

    /// Apply the in-flight reply if it has arrived
    ///
    /// Returns true if the history changed.
    pub fn poll_reply(&mut self) -> bool {
        let HandleSlot::InFlight(rx) = &mut self.slot else {
            return false;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                self.finish(Some(outcome));
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                self.finish(None);
                true
            }
        }
    }

    /// Wait for the in-flight reply and apply it
    ///
    /// Returns false if nothing was in flight.
    pub async fn wait_reply(&mut self) -> bool {
        let HandleSlot::InFlight(rx) = &mut self.slot else {
            return false;
        };

        let outcome = rx.await.ok();
        self.finish(outcome);
        true
    }

    /// Send a user turn and wait for the model turn
    pub async fn send_turn(&mut self, text: &str) -> Submission {
        let submission = self.submit(text);
        if submission == Submission::Sent {
            self.wait_reply().await;
        }
        submission
    }

    fn finish(&mut self, outcome: Option<TurnOutcome>) {
        match outcome {
            Some(TurnOutcome { handle, result }) => {
                self.slot = HandleSlot::Idle(handle);
                match result {
                    Ok(reply) => self.messages.push(ChatMessage::model(reply)),
                    Err(e) => {
                        tracing::error!(error = %e, "Model turn failed");
                        self.record_turn_failure();
                    }
                }
            }
            None => {
                tracing::error!("Request task ended without a reply; session handle lost");
                self.slot = HandleSlot::Unset;
                self.record_turn_failure();
            }
        }
    }

    fn record_turn_failure(&mut self) {
        self.messages.push(ChatMessage::model(TURN_ERROR_MESSAGE));
        self.error = Some(TURN_ERROR_MESSAGE.to_string());
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("messages", &self.messages.len())
            .field("loading", &self.is_loading())
            .field("has_handle", &self.has_handle())
            .field("error", &self.error)
            .finish()
    }
}
