//! Collapsible chat widget wrapping a [`ConversationController`].

use std::sync::Arc;

use salesdash_core::config::HistoryPolicy;
use salesdash_core::disclosure::DisclosureState;
use tokio::sync::watch;

use crate::conversation_controller::ConversationController;

/// Open/expanded state of the chat panel plus the conversation it shows.
#[derive(Clone)]
pub struct ChatWidget {
    conversation: ConversationController,
    disclosure: Arc<watch::Sender<DisclosureState>>,
    history_on_close: HistoryPolicy,
}

impl ChatWidget {
    pub fn new(conversation: ConversationController, history_on_close: HistoryPolicy) -> Self {
        let (disclosure, _) = watch::channel(DisclosureState::new());
        Self {
            conversation,
            disclosure: Arc::new(disclosure),
            history_on_close,
        }
    }

    pub fn conversation(&self) -> &ConversationController {
        &self.conversation
    }

    pub fn history_on_close(&self) -> HistoryPolicy {
        self.history_on_close
    }

    pub fn state(&self) -> DisclosureState {
        *self.disclosure.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisclosureState> {
        self.disclosure.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    pub fn toggle_open(&self) {
        let mut closed = false;
        self.disclosure.send_modify(|state| {
            let was_open = state.is_open();
            state.toggle_open();
            closed = was_open && !state.is_open();
        });
        if closed {
            self.on_closed();
        }
    }

    /// Opens the panel if it is closed. No effect otherwise.
    pub fn open(&self) {
        self.disclosure.send_if_modified(|state| {
            if state.is_open() {
                return false;
            }
            state.open();
            true
        });
    }

    /// Only meaningful while open.
    pub fn toggle_expand(&self) {
        self.disclosure.send_if_modified(|state| {
            let before = *state;
            state.toggle_expand();
            *state != before
        });
    }

    pub fn dismiss(&self) {
        let mut closed = false;
        self.disclosure.send_if_modified(|state| {
            closed = state.is_open();
            state.dismiss();
            closed
        });
        if closed {
            self.on_closed();
        }
    }

    /// Host callback for an interaction outside the panel. Returns whether the
    /// panel was dismissed.
    pub fn on_outside_interaction(&self) -> bool {
        let mut dismissed = false;
        self.disclosure.send_if_modified(|state| {
            dismissed = state.on_outside_interaction();
            dismissed
        });
        if dismissed {
            self.on_closed();
        }
        dismissed
    }

    fn on_closed(&self) {
        match self.history_on_close {
            HistoryPolicy::Preserve => {
                tracing::debug!(target: "chat", "Chat closed, history kept");
            }
            HistoryPolicy::Discard => {
                tracing::debug!(target: "chat", "Chat closed, discarding history");
                self.conversation.reset();
            }
        }
    }
}
