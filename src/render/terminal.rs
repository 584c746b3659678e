//! Terminal render surface.
//!
//! DESIGN
//! ======
//! Entries are printed as labelled, gutter-aligned blocks. Bold spans use ANSI
//! emphasis via `colored`; everything else is written verbatim. The typing
//! placeholder is a full line that is erased from below once the reply
//! arrives, so it never lands in scrollback. Lines echoed while it is showing
//! are erased as they are submitted, keeping the placeholder directly above
//! the cursor. Choice chips are numbered; the REPL maps a typed
//! number back to the chip text through `active_choices`.
//!
//! Write failures are logged and swallowed: rendering must never fail a turn.

use std::io::Write;

use colored::Colorize;

use super::{ChoiceSet, Content, RenderSurface, Role};
use crate::markup::Markup;

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;

const TYPING_TEXT: &str = "…";
const PROMPT: &str = "> ";
const ERASE_PREVIOUS_LINE: &str = "\x1b[1A\x1b[2K";
const ERASE_TYPING: &str = "\r\x1b[1A\x1b[2K";

pub struct TerminalSurface<W: Write> {
    out: W,
    typing: bool,
    input_enabled: bool,
    choices: ChoiceSet,
    prompt_open: bool,
    /// Replace the raw echoed input line with the formatted user entry.
    overwrite_echo: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            typing: false,
            input_enabled: true,
            choices: ChoiceSet::default(),
            prompt_open: false,
            overwrite_echo: false,
        }
    }

    /// Enable when input is echoed by an interactive terminal.
    #[must_use]
    pub fn with_overwrite_echo(mut self, enabled: bool) -> Self {
        self.overwrite_echo = enabled;
        self
    }

    /// Choices under the most recent bot entry, if it had any.
    #[must_use]
    pub fn active_choices(&self) -> &ChoiceSet {
        &self.choices
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Record that a line was read. Echoing terminals already moved to a new
    /// line; otherwise the open prompt is terminated here.
    pub fn line_submitted(&mut self) {
        if self.typing && self.overwrite_echo {
            self.emit(ERASE_PREVIOUS_LINE);
        }
        if self.prompt_open && !self.overwrite_echo {
            self.emit("\n");
        }
        self.prompt_open = false;
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(error) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!(%error, "terminal write failed");
        }
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn append_entry(&mut self, role: Role, content: Content) {
        let mut block = String::new();
        if self.typing {
            block.push_str(ERASE_TYPING);
            self.typing = false;
        }
        if role == Role::User && self.overwrite_echo {
            block.push_str(ERASE_PREVIOUS_LINE);
        } else if self.prompt_open {
            block.push('\n');
        }
        self.prompt_open = false;
        if role == Role::Bot {
            self.choices = ChoiceSet::default();
        }
        format_entry(&mut block, role, &content);
        self.emit(&block);
    }

    fn show_typing(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        let line = format!("{} {}\n", gutter(Role::Bot), TYPING_TEXT.dimmed());
        self.emit(&line);
    }

    fn hide_typing(&mut self) {
        if !self.typing {
            return;
        }
        self.typing = false;
        self.emit(ERASE_TYPING);
    }

    fn render_choices(&mut self, choices: &[String]) {
        if choices.is_empty() {
            return;
        }
        self.choices = ChoiceSet::new(choices);
        let chips = self
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| format!("[{}] {}", index + 1, choice.cyan()))
            .collect::<Vec<_>>()
            .join("  ");
        let line = format!("{} {chips}\n", continuation());
        self.emit(&line);
    }

    fn clear_input(&mut self) {
        // Line input is consumed as it is read; nothing to clear.
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {
        if self.input_enabled && !self.prompt_open {
            self.prompt_open = true;
            self.emit(PROMPT);
        }
    }
}

// =============================================================================
// FORMATTING
// =============================================================================

fn gutter(role: Role) -> String {
    let label = format!("{:>4} │", role.as_str());
    match role {
        Role::User => label.green().to_string(),
        Role::Bot => label.blue().to_string(),
    }
}

fn continuation() -> String {
    format!("{:>4} │", "").dimmed().to_string()
}

fn format_entry(block: &mut String, role: Role, content: &Content) {
    match content {
        Content::Literal(text) => {
            for (index, line) in text.split('\n').enumerate() {
                let prefix = if index == 0 { gutter(role) } else { continuation() };
                push_line(block, &prefix, line);
            }
        }
        Content::Markup(markup) => format_markup(block, role, markup),
    }
}

fn format_markup(block: &mut String, role: Role, markup: &Markup) {
    for (index, spans) in markup.lines().iter().enumerate() {
        let prefix = if index == 0 { gutter(role) } else { continuation() };
        let body: String = spans
            .iter()
            .map(|span| if span.bold { span.text.bold().to_string() } else { span.text.clone() })
            .collect();
        push_line(block, &prefix, &body);
    }
}

fn push_line(block: &mut String, prefix: &str, body: &str) {
    block.push_str(prefix);
    if !body.is_empty() {
        block.push(' ');
        block.push_str(body);
    }
    block.push('\n');
}
