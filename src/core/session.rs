use crate::core::message::Turn;

/// Per-session state: the selected personality and the transcript.
///
/// The transcript only grows; nothing here removes or reorders turns. The
/// selected key is only ever written by the conversation controller after it
/// has been checked against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    selected_personality: String,
    transcript: Vec<Turn>,
}

impl SessionState {
    pub fn new(selected_personality: impl Into<String>) -> Self {
        Self {
            selected_personality: selected_personality.into(),
            transcript: Vec::new(),
        }
    }

    pub fn selected_personality(&self) -> &str {
        &self.selected_personality
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub(crate) fn set_selected_personality(&mut self, key: impl Into<String>) {
        self.selected_personality = key.into();
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }
}
