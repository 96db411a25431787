use crate::core::message::{Turn, TurnRole};
use crate::core::personality::Personality;

/// Glyph shown next to every user turn.
pub const USER_AVATAR: &str = "🧑";

/// One row of the rendered conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTurn {
    pub role: TurnRole,
    pub content: String,
    pub avatar: String,
}

/// Projects the transcript into display rows, in transcript order.
///
/// Assistant rows take the avatar of `current`, not of the personality that
/// answered at the time, so switching personality re-skins earlier replies.
pub fn render_transcript(transcript: &[Turn], current: &Personality) -> Vec<DisplayTurn> {
    transcript
        .iter()
        .map(|turn| DisplayTurn {
            role: turn.role,
            content: turn.content.clone(),
            avatar: match turn.role {
                TurnRole::User => USER_AVATAR.to_string(),
                TurnRole::Assistant => current.avatar.clone(),
            },
        })
        .collect()
}
