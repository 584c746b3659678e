//! # chatcart
//!
//! Client-side controller for a conversational shopping endpoint. Renders a
//! message thread, forwards user text to `POST /chat`, and renders the reply,
//! including quick-reply choices and an optional checkout handoff.
//!
//! The interesting part is the turn lifecycle in [`controller`]: exactly one
//! exchange in flight, a typing placeholder while waiting, clean recovery from
//! network and parse failures, and a server-assigned session identifier kept
//! consistent across turns.

pub mod config;
pub mod controller;
pub mod markup;
pub mod net;
pub mod opener;
pub mod render;
pub mod repl;
pub mod session;

pub use controller::{TurnController, TurnMessages, TurnOutcome};
