use crate::chat::{ChatCoordinator, CompletionOutcome, Dispatch, MessageId, SubmitOutcome};
use crate::cli::Args;
use crate::commands::{ChatSession, dispatcher::CommandDispatcher};
use crate::core::error::HeartTalkError;
use crate::display;
use crate::input;
use crate::service::ServiceStatus;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing::debug;

pub struct Application {
    pub args: Args,
    pub session: ChatSession,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, chat: ChatCoordinator, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            session: ChatSession::new(chat),
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), HeartTalkError> {
        let piped = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| HeartTalkError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let one_shot = match (self.args.message.clone(), piped) {
            (Some(message), Some(context)) => Some(format!("{}\n\n{}", context.trim(), message)),
            (Some(message), None) => Some(message),
            (None, Some(context)) => Some(context),
            (None, None) => None,
        };

        match one_shot {
            Some(text) => self.handle_single_message(&text).await,
            None => self.handle_chat_mode().await,
        }
    }

    /// Sends one message, prints the reply and returns.
    async fn handle_single_message(&mut self, text: &str) -> Result<(), HeartTalkError> {
        let chat = &mut self.session.chat;
        match chat.submit(text) {
            SubmitOutcome::Sent {
                dispatch: Dispatch::Requested(_),
                ..
            } => {}
            SubmitOutcome::Sent {
                dispatch: Dispatch::Unavailable,
                ..
            } => {
                let reason = match chat.service() {
                    ServiceStatus::Unavailable(reason) => reason.clone(),
                    ServiceStatus::Ready(_) => "service unavailable".to_string(),
                };
                return Err(HeartTalkError::NoReply(reason));
            }
            SubmitOutcome::Ignored => {
                return Err(HeartTalkError::Input("Nothing to send".to_string()));
            }
            other => {
                debug!(?other, "unexpected outcome for a fresh conversation");
                return Err(HeartTalkError::NoReply("message was not sent".to_string()));
            }
        }

        match chat.next_completion().await {
            Some(CompletionOutcome::Replied(id)) => {
                if let Some(message) = chat.store().get(id) {
                    println!("{}", message.text);
                }
                Ok(())
            }
            Some(CompletionOutcome::Failed(reason)) => Err(HeartTalkError::NoReply(reason)),
            None => Err(HeartTalkError::NoReply("request was dropped".to_string())),
        }
    }

    async fn handle_chat_mode(&mut self) -> Result<(), HeartTalkError> {
        let width = display::bubble_width();
        println!(
            "{}\n",
            display::render_conversation(&self.session.chat.snapshot(), width)
        );
        if let ServiceStatus::Unavailable(reason) = self.session.chat.service() {
            display::display_error(&format!("Replies are disabled: {}", reason));
        }
        display::display_notice("Type '/help' for commands. Press Ctrl+D or type /quit to exit.");

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let initial = match self.session.chat.editing() {
                Some(_) => self.session.chat.input().to_string(),
                None => String::new(),
            };
            let Some(line) = input::read_input(&mut editor, &initial)? else {
                break;
            };

            if line.trim_start().starts_with('/') {
                match self
                    .command_dispatcher
                    .dispatch_line(&line, &mut self.session)
                {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => display::display_error(&e.to_string()),
                }

                if !self.session.should_continue {
                    break;
                }
                continue;
            }

            self.session.chat.set_input(line);
            let outcome = self.session.chat.submit_input();
            self.handle_submit(outcome).await;
        }

        input::save_history(&mut editor)?;
        Ok(())
    }

    async fn handle_submit(&mut self, outcome: SubmitOutcome) {
        let dispatch = match outcome {
            SubmitOutcome::Ignored => {
                if self.session.chat.editing().is_some() {
                    display::display_notice("Still editing. Type the new text or /cancel.");
                }
                return;
            }
            SubmitOutcome::Busy => {
                display::display_notice("Still waiting for the previous reply.");
                return;
            }
            SubmitOutcome::Sent { message, dispatch } => {
                self.print_message(message);
                dispatch
            }
            SubmitOutcome::Edited { message, dispatch } => {
                display::display_notice("Message updated.");
                self.print_message(message);
                dispatch
            }
        };

        match dispatch {
            Dispatch::Requested(_) => self.await_reply().await,
            Dispatch::Skipped => {}
            Dispatch::Unavailable => {
                display::display_error("No reply: the chat service is not configured.")
            }
        }
    }

    async fn await_reply(&mut self) {
        let term = console::Term::stdout();
        let _ = term.write_line(&display::typing_indicator());

        let outcome = tokio::select! {
            outcome = self.session.chat.next_completion() => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };
        let _ = term.clear_last_lines(1);

        match outcome {
            Some(Some(CompletionOutcome::Replied(id))) => self.print_message(id),
            Some(Some(CompletionOutcome::Failed(reason))) => {
                display::display_error(&format!("No reply: {}", reason))
            }
            Some(None) => {}
            None => {
                self.session.chat.cancel();
                display::display_notice("Request cancelled.");
            }
        }
    }

    fn print_message(&self, id: MessageId) {
        let store = self.session.chat.store();
        if let (Some(position), Some(message)) = (store.position(id), store.get(id)) {
            println!(
                "\n{}\n",
                display::render_message(position + 1, message, display::bubble_width())
            );
        }
    }
}
