//! Conversation store — the server-issued session identifier.
//!
//! DESIGN
//! ======
//! The endpoint correlates turns through an opaque `session_id`. The client
//! starts without one, adopts whatever the first successful reply hands back,
//! and sends it unchanged from then on. Adoption is monotonic: an absent or
//! empty value never clears a known identifier.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

/// Holds the current session identifier, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStore {
    session_id: Option<String>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current identifier, or `None` before the first successful exchange.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Adopt `new_id` when it carries a non-empty value.
    ///
    /// Returns `true` when the stored identifier changed.
    pub fn set(&mut self, new_id: Option<&str>) -> bool {
        let Some(candidate) = new_id.filter(|id| !id.is_empty()) else {
            return false;
        };
        if self.session_id.as_deref() == Some(candidate) {
            return false;
        }
        self.session_id = Some(candidate.to_owned());
        true
    }
}
