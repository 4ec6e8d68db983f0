//! Conversation controller for the sales assistant.
//!
//! Turns the draft into a question, keeps the message log ordered, and makes
//! sure at most one question is in flight.

use std::sync::Arc;
use std::time::Duration;

use salesdash_core::conversation::{ConversationState, PendingQuestion, SubmitRejection};
use salesdash_core::service::AskService;
use tokio::sync::watch;

use crate::deadline::with_deadline;

const ASK_ENDPOINT: &str = "ask";

/// How a call to [`ConversationController::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no request was issued.
    Rejected(SubmitRejection),
    /// The assistant's answer was appended. Carries the answer text.
    Answered(String),
    /// The apology was appended; `last_error` holds the raw failure.
    Failed,
    /// The conversation was reset while the request was in flight. The
    /// request was cancelled and nothing was appended.
    Discarded,
}

/// Owns the [`ConversationState`] and talks to the ask endpoint.
///
/// Cloning is cheap and every clone drives the same conversation. State changes
/// run as closures under the watch channel's lock, so the pending check and the
/// pending flag are set atomically even on a multi-threaded runtime.
#[derive(Clone)]
pub struct ConversationController {
    ask_service: Arc<dyn AskService>,
    request_timeout: Duration,
    state: Arc<watch::Sender<ConversationState>>,
}

impl ConversationController {
    pub fn new(ask_service: Arc<dyn AskService>, request_timeout: Duration) -> Self {
        let (state, _) = watch::channel(ConversationState::new());
        Self {
            ask_service,
            request_timeout,
            state: Arc::new(state),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    /// Replaces the draft buffer.
    pub fn update_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|state| state.update_draft(text));
    }

    /// Submits the current draft and waits for the answer.
    ///
    /// The user message is appended before the request is sent. Failures never
    /// propagate; they end up in the log as an apology and in `last_error`.
    /// A [`ConversationController::reset`] while waiting drops the request, so
    /// at most one ask is ever outstanding.
    pub async fn submit(&self) -> SubmitOutcome {
        let pending = match self.begin() {
            Ok(pending) => pending,
            Err(rejection) => {
                tracing::debug!(target: "conversation", "Submit rejected: {:?}", rejection);
                return SubmitOutcome::Rejected(rejection);
            }
        };

        tracing::info!(
            target: "conversation",
            "Asking question ({} chars)",
            pending.question.chars().count()
        );

        let mut state_rx = self.state.subscribe();
        let request = with_deadline(
            ASK_ENDPOINT,
            self.request_timeout,
            self.ask_service.ask(&pending.question),
        );

        let result = tokio::select! {
            result = request => result,
            _ = state_rx.wait_for(|state| state.epoch() != pending.epoch) => {
                tracing::debug!(target: "conversation", "Ask request cancelled by reset");
                return SubmitOutcome::Discarded;
            }
        };

        match result {
            Ok(answer) => {
                if self.apply(|state| state.complete(&pending, answer.clone())) {
                    SubmitOutcome::Answered(answer)
                } else {
                    tracing::debug!(
                        target: "conversation",
                        "Dropping answer from a reset conversation"
                    );
                    SubmitOutcome::Discarded
                }
            }
            Err(e) => {
                tracing::warn!(target: "conversation", "Ask request failed: {}", e);
                if self.apply(|state| state.fail(&pending, e.to_string())) {
                    SubmitOutcome::Failed
                } else {
                    SubmitOutcome::Discarded
                }
            }
        }
    }

    /// Clears the log and returns to idle.
    ///
    /// An answer still in flight is dropped when it arrives.
    pub fn reset(&self) {
        self.state.send_modify(|state| state.clear());
        tracing::debug!(target: "conversation", "Conversation reset");
    }

    fn begin(&self) -> Result<PendingQuestion, SubmitRejection> {
        let mut outcome = Err(SubmitRejection::EmptyDraft);
        self.state.send_if_modified(|state| {
            outcome = state.begin_submit();
            outcome.is_ok()
        });
        outcome
    }

    fn apply<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&mut ConversationState) -> bool,
    {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            applied = transition(state);
            applied
        });
        applied
    }
}
