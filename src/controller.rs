//! Turn controller — one request/response exchange per user turn.
//!
//! DESIGN
//! ======
//! The controller owns the conversation store, the turn lock and the render
//! surface. `submit_turn` accepts a candidate message, refuses it when empty
//! or when a turn is already in flight, and otherwise runs the exchange:
//!
//! ```text
//! UNLOCKED --accepted submit--> LOCKED --reply | failure | unwind--> UNLOCKED
//! ```
//!
//! All operations take `&self`. The runtime is a single event-loop thread, so
//! interior mutability (`Cell`, `RefCell`) is enough, and two submissions can
//! still be polled concurrently, which is exactly what the lock guards
//! against. No `RefCell` borrow is held across the network await.
//!
//! LIVENESS
//! ========
//! Lock release, input re-enable and focus run in `TurnGuard::drop`, so they
//! happen on success, on failure, and when the transport future panics.

use std::cell::{Cell, Ref, RefCell, RefMut};

use tracing::{debug, info, warn};

use crate::net::{ChatReply, ChatRequest, ChatTransport, ExchangeError, FailureKind};
use crate::opener::LinkOpener;
use crate::render::{Content, RenderSurface, Role};
use crate::session::ConversationStore;

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

pub const DEFAULT_GREETING: &str =
    "Hola! En què t'ajudo a comprar avui? Ex: «Vull eliminar una colònia de formigues».";
pub const DEFAULT_EMPTY_REPLY: &str = "(sense resposta)";
pub const DEFAULT_EXCHANGE_FAILED: &str = "No he pogut contactar amb la botiga. Torna-ho a provar en un moment.";

// =============================================================================
// TYPES
// =============================================================================

/// Fixed texts the controller renders on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnMessages {
    /// Shown when a successful reply has no usable `reply` text.
    pub empty_reply: String,
    /// Shown for every failed exchange.
    pub exchange_failed: String,
}

impl Default for TurnMessages {
    fn default() -> Self {
        Self { empty_reply: DEFAULT_EMPTY_REPLY.to_owned(), exchange_failed: DEFAULT_EXCHANGE_FAILED.to_owned() }
    }
}

/// What `submit_turn` did with a candidate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Empty after trimming; nothing rendered, nothing sent.
    Rejected,
    /// Another turn was in flight; nothing rendered, nothing sent.
    Busy,
    /// The endpoint replied and the reply was rendered.
    Replied,
    /// The exchange failed and the error text was rendered.
    Failed(FailureKind),
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct TurnController<T, R, O> {
    transport: T,
    surface: RefCell<R>,
    opener: O,
    store: RefCell<ConversationStore>,
    locked: Cell<bool>,
    messages: TurnMessages,
}

impl<T, R, O> TurnController<T, R, O>
where
    T: ChatTransport,
    R: RenderSurface,
    O: LinkOpener,
{
    /// A controller with no session, the lock released and default texts.
    #[must_use]
    pub fn new(transport: T, surface: R, opener: O) -> Self {
        Self {
            transport,
            surface: RefCell::new(surface),
            opener,
            store: RefCell::new(ConversationStore::new()),
            locked: Cell::new(false),
            messages: TurnMessages::default(),
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: TurnMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Render the opening bot message and hand focus to the user.
    pub fn greet(&self, text: &str) {
        let mut surface = self.surface.borrow_mut();
        surface.append_entry(Role::Bot, Content::markup(text));
        surface.focus_input();
    }

    /// Submit `candidate` as the user's next message.
    pub async fn submit_turn(&self, candidate: &str) -> TurnOutcome {
        let message = candidate.trim();
        if message.is_empty() {
            debug!("empty submission ignored");
            return TurnOutcome::Rejected;
        }
        if self.locked.get() {
            debug!("turn in flight; submission ignored");
            return TurnOutcome::Busy;
        }

        {
            let mut surface = self.surface.borrow_mut();
            surface.append_entry(Role::User, Content::literal(message));
            surface.clear_input();
        }
        let _guard = TurnGuard::acquire(&self.locked, &self.surface);
        self.surface.borrow_mut().show_typing();

        let request = ChatRequest::new(message, self.store.borrow().get());
        info!(session_id = ?request.session_id, chars = message.chars().count(), "chat turn started");

        match self.transport.exchange(&request).await {
            Ok(reply) => {
                self.apply_reply(reply);
                TurnOutcome::Replied
            }
            Err(error) => {
                self.apply_failure(&error);
                TurnOutcome::Failed(error.kind())
            }
        }
    }

    /// Selecting a quick-reply choice is the same as typing it.
    pub async fn select_choice(&self, choice: &str) -> TurnOutcome {
        self.submit_turn(choice).await
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.store.borrow().get().map(str::to_owned)
    }

    /// Borrow the surface. Do not hold across an await.
    pub fn surface(&self) -> Ref<'_, R> {
        self.surface.borrow()
    }

    /// Mutably borrow the surface. Do not hold across an await.
    pub fn surface_mut(&self) -> RefMut<'_, R> {
        self.surface.borrow_mut()
    }

    // -------------------------------------------------------------------------
    // PATHS
    // -------------------------------------------------------------------------

    fn apply_reply(&self, reply: ChatReply) {
        let mut surface = self.surface.borrow_mut();
        surface.hide_typing();

        if self.store.borrow_mut().set(reply.session_id.as_deref()) {
            info!(session_id = ?reply.session_id, "session adopted");
        }

        let content = reply
            .reply_text()
            .map(Content::markup)
            .filter(|content| !content.is_blank())
            .unwrap_or_else(|| Content::markup(&self.messages.empty_reply));
        surface.append_entry(Role::Bot, content);
        surface.render_choices(reply.choices());
        drop(surface);

        if reply.done {
            info!("endpoint marked conversation done");
        }
        if let Some(payload) = &reply.payload {
            debug!(%payload, "reply payload");
        }
        if let Some(url) = reply.checkout_url() {
            match self.opener.open(url) {
                Ok(()) => info!(url, "checkout handoff"),
                Err(error) => warn!(url, %error, "checkout link not opened"),
            }
        }
    }

    fn apply_failure(&self, error: &ExchangeError) {
        warn!(code = error.error_code(), %error, "chat turn failed");
        if let ExchangeError::Status { body, .. } = error {
            debug!(%body, "error response body");
        }
        let mut surface = self.surface.borrow_mut();
        surface.hide_typing();
        surface.append_entry(Role::Bot, Content::markup(&self.messages.exchange_failed));
    }
}

// =============================================================================
// TURN GUARD
// =============================================================================

/// Holds the turn lock for the lifetime of one exchange.
struct TurnGuard<'a, R: RenderSurface> {
    locked: &'a Cell<bool>,
    surface: &'a RefCell<R>,
}

impl<'a, R: RenderSurface> TurnGuard<'a, R> {
    fn acquire(locked: &'a Cell<bool>, surface: &'a RefCell<R>) -> Self {
        locked.set(true);
        surface.borrow_mut().set_input_enabled(false);
        Self { locked, surface }
    }
}

impl<R: RenderSurface> Drop for TurnGuard<'_, R> {
    fn drop(&mut self) {
        self.locked.set(false);
        // A borrow can only be outstanding here while unwinding from a
        // surface call; skip rendering rather than double-panic.
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => {
                surface.hide_typing();
                surface.set_input_enabled(true);
                surface.focus_input();
            }
            Err(_) => warn!("render surface busy during turn cleanup"),
        }
    }
}
