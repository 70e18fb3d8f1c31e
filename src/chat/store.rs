use super::message::{Message, MessageId};
use tracing::trace;

/// Ordered conversation. Messages are only ever appended; `reset` is the
/// single way history goes away.
#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// A store seeded with the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::welcome()],
        }
    }

    pub fn append(&mut self, message: Message) {
        trace!(id = %message.id(), user = message.is_user(), "append message");
        self.messages.push(message);
    }

    /// Rewrites the text of `id` in place. Returns `false` when no such
    /// message exists.
    pub fn replace_text(&mut self, id: MessageId, new_text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id() == id) {
            Some(message) => {
                message.text = new_text.into();
                true
            }
            None => false,
        }
    }

    pub fn message_following(&self, id: MessageId) -> Option<&Message> {
        let index = self.position(id)?;
        self.messages.get(index + 1)
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::welcome());
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
