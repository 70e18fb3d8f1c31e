use super::ChatSession;
use crate::chat::Message;
use crate::core::error::HeartTalkError;
use crate::display;

use console::style;

pub trait CommandHandler {
    fn execute(&self, session: &mut ChatSession, args: &[&str]) -> Result<Option<String>, HeartTalkError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ResetCommand;
pub struct EditCommand;
pub struct CancelCommand;
pub struct HistoryCommand;
pub struct CopyCommand;

/// Resolves a 1-based message number as shown next to each bubble.
fn message_at<'a>(
    session: &'a ChatSession,
    arg: Option<&&str>,
) -> Result<(usize, &'a Message), String> {
    let Some(raw) = arg else {
        return Err("Please specify a message number".to_string());
    };
    let number: usize = raw
        .trim_start_matches('#')
        .parse()
        .map_err(|_| format!("Not a message number: {}", raw))?;
    number
        .checked_sub(1)
        .and_then(|index| session.chat.messages().get(index))
        .map(|message| (number, message))
        .ok_or_else(|| format!("No message #{}", number))
}

impl CommandHandler for QuitCommand {
    fn execute(&self, session: &mut ChatSession, _args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        session.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(&self, _session: &mut ChatSession, _args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            EditCommand.help().to_string(),
            CancelCommand.help().to_string(),
            CopyCommand.help().to_string(),
            HistoryCommand.help().to_string(),
            ResetCommand.help().to_string(),
            HelpCommand.help().to_string(),
            QuitCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ResetCommand {
    fn execute(&self, session: &mut ChatSession, _args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        session.chat.reset();
        let conversation =
            display::render_conversation(&session.chat.snapshot(), display::bubble_width());
        Ok(Some(format!("Conversation reset.\n\n{}", conversation)))
    }

    fn help(&self) -> &'static str {
        "/reset - Start over with a fresh conversation"
    }
}

impl CommandHandler for EditCommand {
    fn execute(&self, session: &mut ChatSession, args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        let (number, id) = match message_at(session, args.first()) {
            Ok((number, message)) if message.is_user() => (number, message.id()),
            Ok((number, _)) => return Ok(Some(format!("Message #{} is not yours to edit", number))),
            Err(reason) => return Ok(Some(reason)),
        };

        session.chat.begin_edit(id);
        Ok(Some(format!(
            "Editing #{}. Revise the text and press Enter, or /cancel.",
            number
        )))
    }

    fn help(&self) -> &'static str {
        "/edit <n> - Revise one of your messages"
    }
}

impl CommandHandler for CancelCommand {
    fn execute(&self, session: &mut ChatSession, _args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        if session.chat.editing().is_none() {
            return Ok(Some("Nothing to cancel.".to_string()));
        }
        session.chat.cancel_edit();
        Ok(Some("Edit cancelled.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/cancel - Stop editing a message"
    }
}

impl CommandHandler for HistoryCommand {
    fn execute(&self, session: &mut ChatSession, _args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        Ok(Some(display::render_conversation(
            &session.chat.snapshot(),
            display::bubble_width(),
        )))
    }

    fn help(&self) -> &'static str {
        "/history - Show the whole conversation"
    }
}

impl CommandHandler for CopyCommand {
    fn execute(&self, session: &mut ChatSession, args: &[&str]) -> Result<Option<String>, HeartTalkError> {
        match message_at(session, args.first()) {
            Ok((_, message)) => Ok(Some(message.text.clone())),
            Err(reason) => Ok(Some(reason)),
        }
    }

    fn help(&self) -> &'static str {
        "/copy <n> - Print the raw text of a message"
    }
}
