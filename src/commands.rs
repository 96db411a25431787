//! Slash commands typed into the chat input.

use crate::core::completion::CompletionClient;
use crate::core::conversation::ConversationController;
use crate::core::personality::Personality;

pub const HELP_TEXT: &str = "Enter send • Alt+Enter newline • Ctrl+P pick personality • \
PgUp/PgDn scroll • Ctrl+C quit • /personality <key> (/p) switch • /personalities list • \
/help • /quit";

/// Transient feedback shown in the status line. Never part of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn switched_to(personality: &Personality) -> Self {
        Notice::Info(format!(
            "{} Now talking to {}",
            personality.avatar, personality.display_name
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue(Notice),
    OpenPicker,
    Quit,
    ProcessAsMessage(String),
}

pub fn process_input<C: CompletionClient>(
    chat: &mut ConversationController<C>,
    input: &str,
) -> CommandResult {
    let trimmed = input.trim();
    let mut parts = trimmed.split_whitespace();
    let Some(command) = parts.next().filter(|word| word.starts_with('/')) else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "/personality" | "/p" => match args.as_slice() {
            [] => CommandResult::OpenPicker,
            [key] => match chat.select_personality(key) {
                Ok(personality) => CommandResult::Continue(Notice::switched_to(personality)),
                Err(err) => CommandResult::Continue(Notice::Error(err.to_string())),
            },
            _ => CommandResult::Continue(Notice::Error(
                "Usage: /personality <key>".to_string(),
            )),
        },
        "/personalities" => {
            let current = chat.session().selected_personality();
            let listing = chat
                .registry()
                .iter()
                .map(|p| {
                    if p.id == current {
                        format!("[{} {}]", p.avatar, p.id)
                    } else {
                        format!("{} {}", p.avatar, p.id)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            CommandResult::Continue(Notice::Info(listing))
        }
        "/help" => CommandResult::Continue(Notice::Info(HELP_TEXT.to_string())),
        "/quit" | "/exit" => CommandResult::Quit,
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::CompletionError;
    use crate::core::personality::PersonalityRegistry;
    use async_trait::async_trait;

    struct NeverCalled;

    #[async_trait]
    impl CompletionClient for NeverCalled {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            panic!("slash commands must not reach the completion client");
        }
    }

    fn chat() -> ConversationController<NeverCalled> {
        ConversationController::new(PersonalityRegistry::builtin(), "pirate", NeverCalled)
            .expect("pirate is built in")
    }

    #[test]
    fn plain_text_is_a_message() {
        let mut chat = chat();
        assert_eq!(
            process_input(&mut chat, "How do I get rich?"),
            CommandResult::ProcessAsMessage("How do I get rich?".to_string())
        );
    }

    #[test]
    fn personality_command_switches_and_reports() {
        let mut chat = chat();

        let result = process_input(&mut chat, "/p cat");

        assert_eq!(
            result,
            CommandResult::Continue(Notice::Info("😺 Now talking to Cat".to_string()))
        );
        assert_eq!(chat.session().selected_personality(), "cat");
        assert!(chat.transcript().is_empty());
    }

    #[test]
    fn unknown_personality_is_a_loud_error() {
        let mut chat = chat();

        let result = process_input(&mut chat, "/personality ninja");

        match result {
            CommandResult::Continue(notice) => {
                assert!(notice.is_error());
                assert!(notice.text().contains("Personality 'ninja' not found"));
            }
            other => panic!("expected error notice, got {other:?}"),
        }
        assert_eq!(chat.session().selected_personality(), "pirate");
    }

    #[test]
    fn bare_personality_command_opens_picker() {
        let mut chat = chat();
        assert_eq!(process_input(&mut chat, "/personality"), CommandResult::OpenPicker);
    }

    #[test]
    fn personalities_marks_current_entry() {
        let mut chat = chat();
        chat.select_personality("gym").expect("gym");

        match process_input(&mut chat, "/personalities") {
            CommandResult::Continue(Notice::Info(listing)) => {
                assert!(listing.contains("[💪 gym]"));
                assert!(listing.contains("😺 cat"));
            }
            other => panic!("expected listing, got {other:?}"),
        }
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut chat = chat();
        assert_eq!(process_input(&mut chat, "/quit"), CommandResult::Quit);
        assert_eq!(
            process_input(&mut chat, "/shrug"),
            CommandResult::ProcessAsMessage("/shrug".to_string())
        );
    }
}
