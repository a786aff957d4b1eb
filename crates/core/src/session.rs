//! Per-session mutable state: the selected customer and the chat history.
//!
//! A `SessionState` is owned by exactly one session. Nothing here is shared,
//! so no locking is involved; callers pass it by `&mut` into each operation.

use serde::{Deserialize, Serialize};

use crate::message::{Conversation, Message};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    selected_customer: Option<String>,
    conversation: Conversation,
}

impl SessionState {
    /// An empty session: no selection, no messages.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_customer(&self) -> Option<&str> {
        self.selected_customer.as_deref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.conversation.push(Message::user(text));
    }

    pub fn append_assistant_message(&mut self, text: impl Into<String>) {
        self.conversation.push(Message::assistant(text));
    }

    /// Clear the history. The selection is left alone.
    pub fn reset(&mut self) {
        tracing::debug!(cleared = self.conversation.len(), "Conversation reset");
        self.conversation.clear();
    }

    pub fn select_customer(&mut self, customer_id: impl Into<String>) {
        self.selected_customer = Some(customer_id.into());
    }

    /// Clear the selection together with the history.
    pub fn clear_selection(&mut self) {
        self.selected_customer = None;
        self.reset();
    }
}
