pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::chat::ChatCoordinator;
pub use dispatcher::create_command_registry;

/// State shared between the chat loop and slash commands.
pub struct ChatSession {
    pub chat: ChatCoordinator,
    pub should_continue: bool,
}

impl ChatSession {
    pub fn new(chat: ChatCoordinator) -> Self {
        Self {
            chat,
            should_continue: true,
        }
    }
}
