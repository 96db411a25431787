//! Terminal event loop for the chat screen.
//!
//! One request is in flight at most: a submitted message is staged, a frame
//! showing the pending state is drawn, and the loop awaits the reply before
//! reading further input.

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tracing::{debug, error, info};

use crate::commands::{process_input, CommandResult, Notice};
use crate::core::completion::CompletionClient;
use crate::core::conversation::ConversationController;
use crate::ui::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::ui::picker::PickerState;
use crate::ui::renderer::ui;
use crate::ui::state::UiState;

const MOUSE_SCROLL_ROWS: u16 = 3;

/// What the loop must do after a key has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Send(String),
    Quit,
}

pub async fn run_chat<C: CompletionClient>(
    mut chat: ConversationController<C>,
    mut state: UiState,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    info!(personality = %chat.session().selected_personality(), "chat started");

    let result = event_loop(&mut terminal, &mut chat, &mut state).await;

    restore_terminal(&mut terminal)?;
    info!(turns = chat.transcript().len(), "chat ended");
    result
}

async fn event_loop<C: CompletionClient>(
    terminal: &mut ChatTerminal,
    chat: &mut ConversationController<C>,
    state: &mut UiState,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, chat, state))?;

        if state.exit_requested {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match handle_key(chat, state, key) {
                    LoopAction::Continue => {}
                    LoopAction::Quit => state.exit_requested = true,
                    LoopAction::Send(text) => send_message(terminal, chat, state, &text).await?,
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => state.scroll_up(MOUSE_SCROLL_ROWS),
                MouseEventKind::ScrollDown => state.scroll_down(MOUSE_SCROLL_ROWS),
                _ => {}
            },
            Event::Paste(text) => handle_paste(state, &text),
            _ => {}
        }
    }
}

async fn send_message<C: CompletionClient>(
    terminal: &mut ChatTerminal,
    chat: &mut ConversationController<C>,
    state: &mut UiState,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    let Some(request) = chat.stage(text) else {
        return Ok(());
    };

    state.pending = true;
    state.follow_bottom();
    terminal.draw(|f| ui(f, chat, state))?;

    let result = chat.resolve(&request).await;
    state.pending = false;

    match chat.record_reply(result) {
        Ok(reply) => {
            debug!(chars = reply.len(), "reply received");
            state.follow_bottom();
        }
        Err(err) => {
            error!(error = %err, "message failed");
            state.set_notice(Notice::Error(format!("❌ {err}")));
        }
    }
    Ok(())
}

/// Applies one key press to the UI and the conversation.
pub fn handle_key<C: CompletionClient>(
    chat: &mut ConversationController<C>,
    state: &mut UiState,
    key: KeyEvent,
) -> LoopAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return LoopAction::Quit;
    }

    if state.picker.is_some() {
        handle_picker_key(chat, state, key);
        return LoopAction::Continue;
    }

    match key.code {
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            open_picker(chat, state);
            LoopAction::Continue
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            state.insert_newline();
            LoopAction::Continue
        }
        KeyCode::Enter => submit_input(chat, state),
        KeyCode::PageUp => {
            state.scroll_up(state.page_height);
            LoopAction::Continue
        }
        KeyCode::PageDown => {
            state.scroll_down(state.page_height);
            LoopAction::Continue
        }
        _ => {
            state.apply_input(key);
            LoopAction::Continue
        }
    }
}

/// Pasted text goes to the input box; the picker takes no text.
fn handle_paste(state: &mut UiState, text: &str) {
    if state.picker.is_none() {
        state.insert_text(text);
    }
}

fn submit_input<C: CompletionClient>(
    chat: &mut ConversationController<C>,
    state: &mut UiState,
) -> LoopAction {
    if state.input_is_blank() {
        return LoopAction::Continue;
    }

    let input = state.take_input();
    state.clear_notice();
    match process_input(chat, &input) {
        CommandResult::Continue(notice) => {
            state.set_notice(notice);
            LoopAction::Continue
        }
        CommandResult::OpenPicker => {
            open_picker(chat, state);
            LoopAction::Continue
        }
        CommandResult::Quit => LoopAction::Quit,
        CommandResult::ProcessAsMessage(text) => LoopAction::Send(text),
    }
}

fn open_picker<C: CompletionClient>(chat: &ConversationController<C>, state: &mut UiState) {
    state.picker = Some(PickerState::for_personalities(
        chat.registry(),
        chat.session().selected_personality(),
    ));
}

fn handle_picker_key<C: CompletionClient>(
    chat: &mut ConversationController<C>,
    state: &mut UiState,
    key: KeyEvent,
) {
    let Some(picker) = state.picker.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Up => picker.move_up(),
        KeyCode::Down => picker.move_down(),
        KeyCode::Esc => state.picker = None,
        KeyCode::Enter => {
            let selected = picker.selected_id().map(str::to_string);
            state.picker = None;
            if let Some(id) = selected {
                let notice = match chat.select_personality(&id) {
                    Ok(personality) => Notice::switched_to(personality),
                    Err(err) => Notice::Error(err.to_string()),
                };
                state.set_notice(notice);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::CompletionError;
    use crate::core::personality::PersonalityRegistry;
    use async_trait::async_trait;

    struct NoNetwork;

    #[async_trait]
    impl CompletionClient for NoNetwork {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            Err(CompletionError::EmptyResponse)
        }
    }

    fn setup() -> (ConversationController<NoNetwork>, UiState) {
        let chat = ConversationController::new(PersonalityRegistry::builtin(), "pirate", NoNetwork)
            .expect("pirate is built in");
        (chat, UiState::new("m", true))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(
        chat: &mut ConversationController<NoNetwork>,
        state: &mut UiState,
        text: &str,
    ) {
        for ch in text.chars() {
            handle_key(chat, state, press(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn enter_sends_typed_message() {
        let (mut chat, mut state) = setup();
        type_text(&mut chat, &mut state, "Ahoy");

        let action = handle_key(&mut chat, &mut state, press(KeyCode::Enter));

        assert_eq!(action, LoopAction::Send("Ahoy".to_string()));
        assert!(state.input_is_blank());
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let (mut chat, mut state) = setup();
        type_text(&mut chat, &mut state, "   ");
        let action = handle_key(&mut chat, &mut state, press(KeyCode::Enter));
        assert_eq!(action, LoopAction::Continue);
        assert!(chat.transcript().is_empty());
    }

    #[test]
    fn alt_enter_inserts_newline() {
        let (mut chat, mut state) = setup();
        type_text(&mut chat, &mut state, "a");
        handle_key(
            &mut chat,
            &mut state,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT),
        );
        type_text(&mut chat, &mut state, "b");
        assert_eq!(state.input_text(), "a\nb");
    }

    #[test]
    fn ctrl_c_quits_even_with_picker_open() {
        let (mut chat, mut state) = setup();
        open_picker(&chat, &mut state);
        let action = handle_key(
            &mut chat,
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(action, LoopAction::Quit);
    }

    #[test]
    fn picker_selection_switches_personality() {
        let (mut chat, mut state) = setup();
        handle_key(
            &mut chat,
            &mut state,
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL),
        );
        assert!(state.picker.is_some());

        handle_key(&mut chat, &mut state, press(KeyCode::Down));
        handle_key(&mut chat, &mut state, press(KeyCode::Enter));

        assert!(state.picker.is_none());
        assert_eq!(chat.session().selected_personality(), "cat");
        assert_eq!(
            state.notice,
            Some(Notice::Info("😺 Now talking to Cat".to_string()))
        );
    }

    #[test]
    fn escape_closes_picker_without_switching() {
        let (mut chat, mut state) = setup();
        open_picker(&chat, &mut state);
        handle_key(&mut chat, &mut state, press(KeyCode::Down));
        handle_key(&mut chat, &mut state, press(KeyCode::Esc));
        assert!(state.picker.is_none());
        assert_eq!(chat.session().selected_personality(), "pirate");
    }

    #[test]
    fn slash_command_sets_notice() {
        let (mut chat, mut state) = setup();
        type_text(&mut chat, &mut state, "/p ninja");
        let action = handle_key(&mut chat, &mut state, press(KeyCode::Enter));
        assert_eq!(action, LoopAction::Continue);
        assert!(state.notice.as_ref().is_some_and(Notice::is_error));
    }

    #[test]
    fn quit_command_quits() {
        let (mut chat, mut state) = setup();
        type_text(&mut chat, &mut state, "/quit");
        assert_eq!(
            handle_key(&mut chat, &mut state, press(KeyCode::Enter)),
            LoopAction::Quit
        );
    }

    #[test]
    fn paste_is_ignored_while_picker_is_open() {
        let (mut chat, mut state) = setup();
        open_picker(&chat, &mut state);
        handle_paste(&mut state, "hidden");
        assert!(state.input_is_blank());

        handle_key(&mut chat, &mut state, press(KeyCode::Esc));
        handle_paste(&mut state, "visible");
        assert_eq!(state.input_text(), "visible");
    }

    #[test]
    fn page_keys_scroll_by_page() {
        let (mut chat, mut state) = setup();
        state.max_scroll_offset = 40;
        state.scroll_offset = 40;
        state.page_height = 10;

        handle_key(&mut chat, &mut state, press(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 30);
        assert!(!state.auto_scroll);
        handle_key(&mut chat, &mut state, press(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 40);
        assert!(state.auto_scroll);
    }
}
