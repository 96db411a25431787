//! Applies UI events to a session.
//!
//! The controller owns the personality registry, the session state and the
//! completion client. It reacts to exactly two inputs: a personality
//! selection and a submitted message.

use std::error::Error;
use std::fmt;
use tracing::{error, info};

use crate::core::completion::{CompletionClient, CompletionError};
use crate::core::display::{render_transcript, DisplayTurn};
use crate::core::message::Turn;
use crate::core::personality::{Personality, PersonalityRegistry, UnknownPersonality};
use crate::core::session::SessionState;

#[derive(Debug)]
pub enum ChatError {
    UnknownPersonality(UnknownPersonality),
    Completion(CompletionError),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::UnknownPersonality(err) => write!(f, "{err}"),
            ChatError::Completion(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::UnknownPersonality(err) => Some(err),
            ChatError::Completion(err) => Some(err),
        }
    }
}

impl From<UnknownPersonality> for ChatError {
    fn from(err: UnknownPersonality) -> Self {
        ChatError::UnknownPersonality(err)
    }
}

impl From<CompletionError> for ChatError {
    fn from(err: CompletionError) -> Self {
        ChatError::Completion(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended and no request was made.
    Ignored,
    /// Both turns were appended; carries the assistant's reply.
    Replied(String),
}

/// A user turn that has been recorded and is waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub personality: String,
    pub system_prompt: String,
    pub user_message: String,
}

pub struct ConversationController<C> {
    registry: PersonalityRegistry,
    session: SessionState,
    client: C,
}

impl<C: CompletionClient> ConversationController<C> {
    /// Starts a session on `initial_personality`, which must be registered.
    pub fn new(
        registry: PersonalityRegistry,
        initial_personality: &str,
        client: C,
    ) -> Result<Self, UnknownPersonality> {
        let key = registry.lookup(initial_personality)?.id.clone();
        Ok(Self {
            registry,
            session: SessionState::new(key),
            client,
        })
    }

    pub fn registry(&self) -> &PersonalityRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transcript(&self) -> &[Turn] {
        self.session.transcript()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn current_personality(&self) -> &Personality {
        self.registry
            .lookup(self.session.selected_personality())
            .expect("selected personality is always registered")
    }

    /// Switches personality. The transcript is left as it is; an unknown key
    /// leaves the current selection in place.
    pub fn select_personality(&mut self, key: &str) -> Result<&Personality, UnknownPersonality> {
        let personality = self.registry.lookup(key).inspect_err(|err| {
            error!(requested = %err.requested, "unknown personality selected");
        })?;
        info!(personality = %personality.id, "personality selected");
        self.session.set_selected_personality(personality.id.clone());
        Ok(personality)
    }

    /// Records the user turn and returns what must be sent, or `None` for
    /// blank input.
    pub fn stage(&mut self, text: &str) -> Option<CompletionRequest> {
        if text.trim().is_empty() {
            return None;
        }

        let personality = self.current_personality();
        let request = CompletionRequest {
            personality: personality.id.clone(),
            system_prompt: personality.system_prompt.clone(),
            user_message: text.to_string(),
        };
        self.session.append(Turn::user(text));
        info!(personality = %request.personality, "message submitted");
        Some(request)
    }

    /// Performs the blocking call for a staged request.
    pub async fn resolve(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.client
            .complete(&request.system_prompt, &request.user_message)
            .await
    }

    /// Appends the assistant turn on success. On failure the user turn stays
    /// and no assistant turn is added.
    pub fn record_reply(
        &mut self,
        result: Result<String, CompletionError>,
    ) -> Result<String, ChatError> {
        match result {
            Ok(reply) => {
                self.session.append(Turn::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                error!(error = %err, "completion failed");
                Err(ChatError::Completion(err))
            }
        }
    }

    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome, ChatError> {
        let Some(request) = self.stage(text) else {
            return Ok(SubmitOutcome::Ignored);
        };
        let result = self.resolve(&request).await;
        self.record_reply(result).map(SubmitOutcome::Replied)
    }

    pub fn render(&self) -> Vec<DisplayTurn> {
        render_transcript(self.session.transcript(), self.current_personality())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::USER_AVATAR;
    use crate::core::message::TurnRole;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted client that records every call it receives.
    #[derive(Default)]
    struct MockClient {
        calls: Mutex<Vec<(String, String)>>,
        replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    }

    impl MockClient {
        fn replying(replies: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(
            &self,
            system_prompt: &str,
            user_message: &str,
        ) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_message.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("echo: {user_message}")))
        }
    }

    fn two_personality_registry() -> PersonalityRegistry {
        PersonalityRegistry::from_personalities(vec![
            Personality {
                id: "pirate".to_string(),
                display_name: "Pirate".to_string(),
                system_prompt: "You are a pirate...".to_string(),
                avatar: "🏴‍☠️".to_string(),
            },
            Personality {
                id: "cat".to_string(),
                display_name: "Cat".to_string(),
                system_prompt: "You are a cat...".to_string(),
                avatar: "😺".to_string(),
            },
        ])
    }

    fn controller(client: MockClient) -> ConversationController<MockClient> {
        ConversationController::new(two_personality_registry(), "pirate", client)
            .expect("pirate is registered")
    }

    #[tokio::test]
    async fn pirate_scenario_records_both_turns() {
        let mut chat = controller(MockClient::replying(vec![Ok(
            "Arrr, save yer doubloons!".to_string()
        )]));

        chat.select_personality("pirate").expect("select pirate");
        let outcome = chat.submit("How do I get rich?").await.expect("submit");

        assert_eq!(
            outcome,
            SubmitOutcome::Replied("Arrr, save yer doubloons!".to_string())
        );
        assert_eq!(
            chat.transcript(),
            &[
                Turn::user("How do I get rich?"),
                Turn::assistant("Arrr, save yer doubloons!"),
            ]
        );
        let rendered = chat.render();
        assert_eq!(rendered[0].avatar, USER_AVATAR);
        assert_eq!(rendered[1].avatar, "🏴‍☠️");
    }

    #[tokio::test]
    async fn request_uses_selected_system_prompt_exactly() {
        let mut chat = controller(MockClient::default());

        chat.select_personality("cat").expect("select cat");
        chat.submit("Should I nap?").await.expect("submit");

        assert_eq!(
            chat.client().calls(),
            vec![("You are a cat...".to_string(), "Should I nap?".to_string())]
        );
    }

    #[tokio::test]
    async fn blank_submissions_are_ignored_without_calls() {
        let mut chat = controller(MockClient::default());

        for text in ["", "   ", "\n\t "] {
            let outcome = chat.submit(text).await.expect("blank submit is not an error");
            assert_eq!(outcome, SubmitOutcome::Ignored);
        }

        assert!(chat.transcript().is_empty());
        assert_eq!(chat.client().calls().len(), 0);
    }

    #[tokio::test]
    async fn successful_submissions_alternate_user_then_assistant() {
        let mut chat = controller(MockClient::default());
        let n = 4;

        for i in 0..n {
            chat.submit(&format!("message {i}")).await.expect("submit");
        }

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2 * n);
        for (index, turn) in transcript.iter().enumerate() {
            let expected = if index % 2 == 0 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            };
            assert_eq!(turn.role, expected, "turn {index}");
        }
        assert_eq!(transcript[6].content, "message 3");
        assert_eq!(transcript[7].content, "echo: message 3");
    }

    #[tokio::test]
    async fn switching_personality_keeps_existing_turns() {
        let mut chat = controller(MockClient::default());
        chat.submit("first").await.expect("submit");
        let before = chat.transcript().to_vec();
        assert_eq!(chat.render()[1].avatar, "🏴‍☠️");

        chat.select_personality("cat").expect("select cat");

        assert_eq!(chat.transcript(), before.as_slice());
        assert_eq!(chat.session().selected_personality(), "cat");
        let rendered = chat.render();
        assert_eq!(rendered[0].content, "first");
        assert_eq!(rendered[1].avatar, "😺");
    }

    #[tokio::test]
    async fn transport_error_keeps_user_turn_only() {
        let mut chat = controller(MockClient::replying(vec![Err(
            CompletionError::EmptyResponse,
        )]));

        let err = chat.submit("hello?").await.expect_err("failure is surfaced");

        assert!(matches!(
            err,
            ChatError::Completion(CompletionError::EmptyResponse)
        ));
        assert_eq!(chat.transcript(), &[Turn::user("hello?")]);
        assert_eq!(chat.client().calls().len(), 1);
    }

    #[test]
    fn unknown_personality_is_rejected_and_selection_kept() {
        let mut chat = controller(MockClient::default());

        let err = chat.select_personality("ninja").unwrap_err();

        assert_eq!(err.requested, "ninja");
        assert_eq!(err.available, vec!["pirate", "cat"]);
        assert_eq!(chat.session().selected_personality(), "pirate");
    }

    #[test]
    fn selection_stores_canonical_key() {
        let mut chat = controller(MockClient::default());
        chat.select_personality("CAT").expect("case-insensitive");
        assert_eq!(chat.session().selected_personality(), "cat");
    }

    #[test]
    fn new_rejects_unregistered_initial_personality() {
        let result =
            ConversationController::new(two_personality_registry(), "gym", MockClient::default());
        assert!(result.is_err());
    }

    #[test]
    fn stage_records_user_turn_before_the_call() {
        let mut chat = controller(MockClient::default());

        let request = chat.stage("Ahoy").expect("non-blank text is staged");

        assert_eq!(request.system_prompt, "You are a pirate...");
        assert_eq!(request.user_message, "Ahoy");
        assert_eq!(chat.transcript(), &[Turn::user("Ahoy")]);
        assert!(chat.client().calls().is_empty());
        assert!(chat.stage("  ").is_none());
    }
}
