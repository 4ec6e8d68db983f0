//! Conversation state and its transitions.
//!
//! All transitions are plain synchronous methods so a controller can run them
//! under a single lock. The asynchronous part (the ask request itself) lives in
//! the application layer.

use serde::{Deserialize, Serialize};

use super::message::ConversationMessage;

/// Text shown to the user when a question could not be answered.
///
/// The raw failure is kept in [`ConversationState::last_error`] instead.
pub const APOLOGY_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Lifecycle of the single ask request a conversation may have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Exactly one ask request is outstanding.
    Pending,
    /// The last request failed. Cleared by the next accepted submission.
    Failed,
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitRejection {
    /// The draft is empty or whitespace only.
    EmptyDraft,
    /// Another question is still waiting for its answer.
    RequestPending,
}

/// An accepted question, tagged with the epoch it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub question: String,
    pub epoch: u64,
}

/// Everything the chat UI needs to render the conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Append-only log in display order.
    pub messages: Vec<ConversationMessage>,
    /// Input buffer not yet submitted.
    pub draft_text: String,
    pub request_status: RequestStatus,
    /// Raw text of the most recent failure, for diagnostics only.
    pub last_error: Option<String>,
    /// Bumped by [`ConversationState::clear`]; answers from older epochs are dropped.
    #[serde(skip)]
    epoch: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_pending(&self) -> bool {
        self.request_status == RequestStatus::Pending
    }

    /// Replaces the draft buffer.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    /// Accepts the current draft as a question.
    ///
    /// On success the user message is appended, the draft is cleared and the
    /// state becomes `Pending`. On rejection nothing changes.
    pub fn begin_submit(&mut self) -> Result<PendingQuestion, SubmitRejection> {
        if self.is_pending() {
            return Err(SubmitRejection::RequestPending);
        }

        let question = self.draft_text.trim();
        if question.is_empty() {
            return Err(SubmitRejection::EmptyDraft);
        }
        let question = question.to_string();

        self.messages.push(ConversationMessage::user(question.clone()));
        self.draft_text.clear();
        self.request_status = RequestStatus::Pending;

        Ok(PendingQuestion {
            question,
            epoch: self.epoch,
        })
    }

    /// Records the answer for a pending question.
    ///
    /// Returns `false` (and changes nothing) when the question belongs to an
    /// earlier epoch or nothing is pending.
    pub fn complete(&mut self, pending: &PendingQuestion, answer: impl Into<String>) -> bool {
        if !self.accepts(pending) {
            return false;
        }
        self.messages.push(ConversationMessage::assistant(answer));
        self.request_status = RequestStatus::Idle;
        true
    }

    /// Records a failure for a pending question.
    ///
    /// The user sees [`APOLOGY_MESSAGE`]; `raw_error` goes to `last_error`.
    /// The user message appended by `begin_submit` is kept.
    pub fn fail(&mut self, pending: &PendingQuestion, raw_error: impl Into<String>) -> bool {
        if !self.accepts(pending) {
            return false;
        }
        self.messages.push(ConversationMessage::assistant(APOLOGY_MESSAGE));
        self.last_error = Some(raw_error.into());
        self.request_status = RequestStatus::Failed;
        true
    }

    /// Drops the whole log and starts a new epoch.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.draft_text.clear();
        self.last_error = None;
        self.request_status = RequestStatus::Idle;
        self.epoch += 1;
    }

    fn accepts(&self, pending: &PendingQuestion) -> bool {
        self.is_pending() && pending.epoch == self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageRole;

    #[test]
    fn test_begin_submit_trims_and_clears_draft() {
        let mut state = ConversationState::new();
        state.update_draft("  What is Q3 revenue?  ");

        let pending = state.begin_submit().unwrap();

        assert_eq!(pending.question, "What is Q3 revenue?");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, MessageRole::User);
        assert_eq!(state.messages[0].text, "What is Q3 revenue?");
        assert!(state.draft_text.is_empty());
        assert_eq!(state.request_status, RequestStatus::Pending);
    }

    #[test]
    fn test_whitespace_draft_is_rejected_without_change() {
        let mut state = ConversationState::new();
        for draft in ["", "   ", "\n\t"] {
            state.update_draft(draft);
            assert_eq!(state.begin_submit(), Err(SubmitRejection::EmptyDraft));
        }
        assert!(state.messages.is_empty());
        assert_eq!(state.request_status, RequestStatus::Idle);
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let mut state = ConversationState::new();
        state.update_draft("first");
        state.begin_submit().unwrap();

        state.update_draft("second");
        assert_eq!(state.begin_submit(), Err(SubmitRejection::RequestPending));
        assert_eq!(state.messages.len(), 1);
        // Draft is left for the user to send later.
        assert_eq!(state.draft_text, "second");
    }

    #[test]
    fn test_failure_keeps_user_message_and_hides_raw_error() {
        let mut state = ConversationState::new();
        state.update_draft("hello");
        let pending = state.begin_submit().unwrap();

        assert!(state.fail(&pending, "HTTP 500 from /api/ai: traceback"));

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].text, "hello");
        assert_eq!(state.messages[1].text, APOLOGY_MESSAGE);
        assert_eq!(state.request_status, RequestStatus::Failed);
        assert_eq!(
            state.last_error.as_deref(),
            Some("HTTP 500 from /api/ai: traceback")
        );
    }

    #[test]
    fn test_failed_is_cleared_by_next_accepted_submit() {
        let mut state = ConversationState::new();
        state.update_draft("one");
        let pending = state.begin_submit().unwrap();
        state.fail(&pending, "boom");

        state.update_draft("two");
        state.begin_submit().unwrap();
        assert_eq!(state.request_status, RequestStatus::Pending);
    }

    #[test]
    fn test_answer_from_previous_epoch_is_ignored() {
        let mut state = ConversationState::new();
        state.update_draft("before reset");
        let stale = state.begin_submit().unwrap();

        state.clear();
        assert!(!state.complete(&stale, "late answer"));
        assert!(!state.fail(&stale, "late failure"));
        assert!(state.messages.is_empty());
        assert_eq!(state.request_status, RequestStatus::Idle);
    }

    #[test]
    fn test_complete_twice_only_applies_once() {
        let mut state = ConversationState::new();
        state.update_draft("q");
        let pending = state.begin_submit().unwrap();

        assert!(state.complete(&pending, "a"));
        assert!(!state.complete(&pending, "a again"));
        assert_eq!(state.messages.len(), 2);
    }
}
