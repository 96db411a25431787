//! TUI-less "say" command

use std::error::Error;

use crate::core::completion::{CompletionClient, CompletionError};
use crate::core::conversation::{ChatError, ConversationController, SubmitOutcome};

/// Joins the words given on the command line; `None` when nothing was typed.
pub fn prompt_text(words: &[String]) -> Option<String> {
    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        None
    } else {
        Some(prompt)
    }
}

pub fn exit_with_usage() -> ! {
    eprintln!("Usage: masquerade say <prompt>");
    std::process::exit(1);
}

/// Sends one message with the session's personality and returns the reply.
pub async fn say_once<C: CompletionClient>(
    chat: &mut ConversationController<C>,
    prompt: &str,
) -> Result<Option<String>, ChatError> {
    match chat.submit(prompt).await? {
        SubmitOutcome::Replied(reply) => Ok(Some(reply)),
        SubmitOutcome::Ignored => Ok(None),
    }
}

pub async fn run_say<C: CompletionClient>(
    mut chat: ConversationController<C>,
    prompt: String,
) -> Result<(), Box<dyn Error>> {
    match say_once(&mut chat, &prompt).await {
        Ok(Some(reply)) => {
            println!("{reply}");
            Ok(())
        }
        Ok(None) => exit_with_usage(),
        Err(err) => {
            eprintln!("{}", error_report(&err));
            std::process::exit(1);
        }
    }
}

/// Error text for stderr. API failures carry the formatted response body
/// under the one-line summary.
pub fn error_report(err: &ChatError) -> String {
    match err {
        ChatError::Completion(api @ CompletionError::Api { .. }) => {
            format!("❌ Error: {err}\n\n{}", api.detail())
        }
        _ => format!("❌ Error: {err}"),
    }
}
