//! Terminal UI for interactive chat sessions.
//!
//! - [`chat_loop`]: reads terminal events and drives the
//!   [`crate::core::conversation::ConversationController`].
//! - [`renderer`], [`scroll`] and [`markdown`]: frame composition.
//! - [`state`] and [`picker`]: input box, scrolling and the personality chooser.
//!
//! This layer only presents and captures interaction; the conversation rules
//! live in [`crate::core`].

pub mod chat_loop;
pub mod lifecycle;
pub mod markdown;
pub mod picker;
pub mod renderer;
pub mod scroll;
pub mod state;
