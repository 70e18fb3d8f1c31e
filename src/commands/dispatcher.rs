use super::{
    ChatSession,
    handler::{
        CancelCommand, CopyCommand, EditCommand, HelpCommand, HistoryCommand, QuitCommand,
        ResetCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::HeartTalkError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Runs a `/command args...` line. The leading slash is optional.
    pub fn dispatch_line(
        &self,
        line: &str,
        session: &mut ChatSession,
    ) -> Result<Option<String>, HeartTalkError> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.split_first() {
            Some((command, args)) => self.execute(command, args, session),
            None => Ok(None),
        }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        session: &mut ChatSession,
    ) -> Result<Option<String>, HeartTalkError> {
        self.registry.execute(command, args, session)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("reset", ResetCommand);
    registry.register("edit", EditCommand);
    registry.register("cancel", CancelCommand);
    registry.register("history", HistoryCommand);
    registry.register("copy", CopyCommand);

    CommandDispatcher::new(Arc::new(registry))
}
