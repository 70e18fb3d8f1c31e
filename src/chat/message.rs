use std::fmt;
use uuid::Uuid;

/// Greeting shown at startup and after every reset.
pub const WELCOME_TEXT: &str =
    "Hey! I'm here to chat, guide, or just listen — whatever's on your mind 💬";

/// Opaque identity of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Seen,
}

impl MessageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "Sent",
            MessageStatus::Delivered => "Delivered",
            MessageStatus::Seen => "Seen",
        }
    }
}

/// A single chat bubble. Only `text` changes after creation, and only
/// through an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    pub text: String,
    is_user: bool,
    pub status: MessageStatus,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn welcome() -> Self {
        Self::assistant(WELCOME_TEXT)
    }

    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            is_user,
            status: MessageStatus::Sent,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }
}
