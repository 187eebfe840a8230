//! The conversation log an agent reasons over.

use mini_agent_model::{ModelMessage, Role};

/// An append-only, ordered log of the messages in one run.
///
/// Historical entries are never removed or rewritten.
#[derive(Clone, Default, Debug)]
pub struct Memory {
    messages: Vec<ModelMessage>,
}

impl Memory {
    /// Appends a message.
    #[inline]
    pub fn add(&mut self, message: ModelMessage) {
        self.messages.push(message);
    }

    /// Returns the messages ready to be sent to the model, oldest first.
    ///
    /// [`ModelMessage`] serializes to the wire shape directly, so this is
    /// an owned copy of the log.
    #[inline]
    pub fn snapshot(&self) -> Vec<ModelMessage> {
        self.messages.clone()
    }

    /// Returns all messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing has been added yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the content of the first user message.
    pub fn first_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|msg| msg.role() == Role::User)
            .and_then(ModelMessage::content)
    }

    /// Returns the most recent non-empty assistant text.
    pub fn last_assistant_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .filter(|msg| msg.role() == Role::Assistant)
            .filter_map(ModelMessage::content)
            .find(|content| !content.is_empty())
    }
}
