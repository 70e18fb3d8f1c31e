use crate::chat::{ChatSnapshot, Message};
use console::style;

const MIN_WIDTH: usize = 30;
const MAX_WIDTH: usize = 100;

/// Width available for chat bubbles in the current terminal.
pub fn bubble_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    terminal_width.saturating_sub(4).clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Render one message. `number` is the 1-based position shown to the user
/// and accepted by `/edit` and `/copy`.
pub fn render_message(number: usize, message: &Message, width: usize) -> String {
    let text_width = width.saturating_sub(4).max(10);
    let lines = wrap_text(&message.text, text_width);
    let mut out = Vec::with_capacity(lines.len() + 2);

    if message.is_user() {
        let header = format!("#{number} You");
        out.push(right_align(
            &style(&header).bold().cyan().to_string(),
            header.chars().count(),
            width,
        ));
        for line in &lines {
            let len = line.chars().count();
            out.push(right_align(&style(line).white().to_string(), len, width));
        }
        let status = format!("✓ {}", message.status.label());
        out.push(right_align(
            &style(&status).dim().to_string(),
            status.chars().count(),
            width,
        ));
    } else {
        out.push(style(format!("#{number} AI")).bold().dim().to_string());
        for line in &lines {
            out.push(format!("  {}", line));
        }
    }

    out.join("\n")
}

pub fn render_conversation(snapshot: &ChatSnapshot, width: usize) -> String {
    snapshot
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| render_message(i + 1, message, width))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn typing_indicator() -> String {
    style("AI is typing…").dim().italic().to_string()
}

pub fn display_notice(text: &str) {
    println!("{}", style(text).yellow());
}

pub fn display_error(text: &str) {
    eprintln!("{} {}", style("✗").bold().red(), style(text).red());
}

fn right_align(styled: &str, visible_len: usize, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(visible_len)), styled)
}

/// Wraps on whitespace, keeping explicit line breaks. Words longer than
/// `max_len` are split.
pub fn wrap_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_len {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_len);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > max_len {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
