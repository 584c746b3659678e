//! Render surface — where transcript entries become visible.
//!
//! DESIGN
//! ======
//! The turn controller never touches an output device directly. It drives a
//! `RenderSurface`, which owns the visible transcript, the transient typing
//! placeholder, quick-reply choice chips and the input affordance. Surfaces
//! are pure rendering: they know nothing about the network.
//!
//! Two implementations ship with the crate: `Transcript` keeps everything in
//! memory (tests, embedding UIs) and `TerminalSurface` writes to a terminal.

pub mod terminal;
pub mod transcript;

pub use terminal::TerminalSurface;
pub use transcript::{InputState, Transcript, TranscriptEntry};

use crate::markup::Markup;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

// =============================================================================
// ROLE / CONTENT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Entry body. User input is always `Literal`; only bot replies carry markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Literal(String),
    Markup(Markup),
}

impl Content {
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    #[must_use]
    pub fn markup(source: &str) -> Self {
        Self::Markup(Markup::parse(source))
    }

    /// True when nothing visible would render.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Literal(text) => text.trim().is_empty(),
            Self::Markup(markup) => markup.is_blank(),
        }
    }

    /// Visible text with styling removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Markup(markup) => markup.plain_text(),
        }
    }
}

// =============================================================================
// CHOICE SET
// =============================================================================

/// Quick-reply options attached to one bot entry.
///
/// Choices are addressed 1-based, matching how they are shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    choices: Vec<String>,
}

impl ChoiceSet {
    #[must_use]
    pub fn new(choices: &[String]) -> Self {
        Self { choices: choices.to_vec() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn get(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.choices.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(String::as_str)
    }
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

/// Output side of the chat UI, driven by the turn controller.
pub trait RenderSurface {
    /// Append a durable transcript entry and scroll it into view.
    fn append_entry(&mut self, role: Role, content: Content);

    /// Show the typing placeholder. Idempotent.
    fn show_typing(&mut self);

    /// Remove the typing placeholder, if present.
    fn hide_typing(&mut self);

    /// Attach quick-reply choices to the most recent bot entry.
    /// An empty slice renders nothing.
    fn render_choices(&mut self, choices: &[String]);

    fn clear_input(&mut self);

    fn set_input_enabled(&mut self, enabled: bool);

    fn focus_input(&mut self);
}
