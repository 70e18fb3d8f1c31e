use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::HeartTalkError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};
use tracing::debug;

/// Completes `/command` names; plain chat text gets no completion.
pub struct CommandCompleter {
    commands: CommandDispatcher,
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(typed) = line.get(..pos).and_then(|l| l.strip_prefix('/')) else {
            return Ok((pos, Vec::new()));
        };
        if typed.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let mut matches: Vec<Pair> = self
            .commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect();
        matches.sort_by(|a, b| a.display.cmp(&b.display));

        Ok((1, matches))
    }
}

pub struct ChatHelper {
    completer: CommandCompleter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            completer: CommandCompleter { commands },
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

pub type ChatEditor = Editor<ChatHelper, FileHistory>;

pub fn create_editor(commands: CommandDispatcher) -> Result<ChatEditor, HeartTalkError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor: ChatEditor = Editor::with_config(config)?;
    editor.set_helper(Some(ChatHelper::new(commands)));

    let history_path = Config::history_path();
    if let Err(e) = editor.load_history(&history_path) {
        debug!(path = %history_path.display(), error = %e, "no input history loaded");
    }

    Ok(editor)
}

/// Reads one line. `initial` pre-fills the line, used while revising a
/// message. Returns `None` on Ctrl-C or Ctrl-D.
pub fn read_input(
    editor: &mut ChatEditor,
    initial: &str,
) -> Result<Option<String>, HeartTalkError> {
    let prompt = if initial.is_empty() {
        style("> ").bold().cyan().to_string()
    } else {
        style("edit> ").bold().yellow().to_string()
    };

    match editor.readline_with_initial(&prompt, (initial, "")) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.as_str())?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn save_history(editor: &mut ChatEditor) -> Result<(), HeartTalkError> {
    let history_path = Config::history_path();
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor.save_history(&history_path)?;
    Ok(())
}
