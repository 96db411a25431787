//! Domain logic: personalities, session state, the completion client and the
//! controller that ties them together. Nothing in here touches the terminal.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod display;
pub mod message;
pub mod personality;
pub mod providers;
pub mod session;
