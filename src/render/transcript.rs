//! In-memory render surface.
//!
//! Holds exactly what a UI would show: ordinal-numbered entries, at most one
//! typing placeholder (never part of the entry list), choice sets attached to
//! bot entries, the input affordance and the scroll anchor.

use super::{ChoiceSet, Content, RenderSurface, Role};

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

/// One durable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub ordinal: usize,
    pub role: Role,
    pub content: Content,
    pub choices: ChoiceSet,
}

/// State of the text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub value: String,
    pub enabled: bool,
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self { value: String::new(), enabled: true, focused: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    typing: bool,
    input: InputState,
    scroll_anchor: Option<usize>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable input, for callers that model keystrokes.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Ordinal of the entry currently scrolled into view.
    #[must_use]
    pub fn scroll_anchor(&self) -> Option<usize> {
        self.scroll_anchor
    }

    /// Choices shown under the most recent bot entry.
    #[must_use]
    pub fn active_choices(&self) -> Option<&ChoiceSet> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.role == Role::Bot)
            .map(|entry| &entry.choices)
            .filter(|choices| !choices.is_empty())
    }
}

impl RenderSurface for Transcript {
    fn append_entry(&mut self, role: Role, content: Content) {
        let ordinal = self.entries.len();
        self.entries.push(TranscriptEntry { ordinal, role, content, choices: ChoiceSet::default() });
        self.scroll_anchor = Some(ordinal);
    }

    fn show_typing(&mut self) {
        self.typing = true;
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn render_choices(&mut self, choices: &[String]) {
        if choices.is_empty() {
            return;
        }
        let Some(entry) = self.entries.iter_mut().rev().find(|entry| entry.role == Role::Bot) else {
            tracing::debug!(count = choices.len(), "no bot entry to attach choices to");
            return;
        };
        entry.choices = ChoiceSet::new(choices);
        self.scroll_anchor = Some(entry.ordinal);
    }

    fn clear_input(&mut self) {
        self.input.value.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input.enabled = enabled;
        if !enabled {
            self.input.focused = false;
        }
    }

    fn focus_input(&mut self) {
        if self.input.enabled {
            self.input.focused = true;
        }
    }
}
