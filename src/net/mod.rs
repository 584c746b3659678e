//! Network layer — the chat endpoint contract and its HTTP transport.
//!
//! DESIGN
//! ======
//! `types` holds the wire shapes and pure parsing; `client` holds the
//! `ChatTransport` seam the turn controller depends on, plus the reqwest
//! implementation used in production.

pub mod client;
pub mod types;

pub use client::{ChatTransport, ExchangeError, FailureKind, HttpChatClient};
pub use types::{ChatReply, ChatRequest, parse_reply};
