//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `state`: Conversation state and transitions (`ConversationState`, `RequestStatus`)

mod message;
mod state;

pub use message::{ConversationMessage, MessageRole};
pub use state::{
    APOLOGY_MESSAGE, ConversationState, PendingQuestion, RequestStatus, SubmitRejection,
};
