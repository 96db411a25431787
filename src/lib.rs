//! Masquerade is a terminal chat client where every reply comes from a
//! selectable personality.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the personality registry, session state, configuration,
//!   credentials and the completion client.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`commands`] implements the slash commands typed into the chat input.
//! - [`api`] defines the chat completion payloads sent over the wire.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`], which
//! builds a [`core::conversation::ConversationController`] and dispatches into
//! [`ui::chat_loop`] or one of the non-interactive commands.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
