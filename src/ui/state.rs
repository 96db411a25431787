use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::{Input, TextArea};

use crate::commands::Notice;
use crate::ui::picker::PickerState;

const INPUT_TITLE: &str = "Message (Enter send, Alt+Enter newline, Ctrl+P personality, /help)";

/// Presentation state that lives beside the conversation controller.
pub struct UiState {
    textarea: TextArea<'static>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Set by the last drawn frame.
    pub max_scroll_offset: u16,
    pub page_height: u16,
    pub notice: Option<Notice>,
    pub picker: Option<PickerState>,
    pub pending: bool,
    pub markdown: bool,
    pub model: String,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(model: impl Into<String>, markdown: bool) -> Self {
        let mut state = Self {
            textarea: TextArea::default(),
            scroll_offset: 0,
            auto_scroll: true,
            max_scroll_offset: 0,
            page_height: 1,
            notice: None,
            picker: None,
            pending: false,
            markdown,
            model: model.into(),
            exit_requested: false,
        };
        state.configure_textarea();
        state
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Reset))
                .title(INPUT_TITLE),
        );
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_is_blank(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.trim().is_empty())
    }

    pub fn apply_input<I: Into<Input>>(&mut self, input: I) {
        self.textarea.input(input);
    }

    pub fn insert_text(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    /// Empties the input and returns what it held.
    pub fn take_input(&mut self) -> String {
        let text = self.input_text();
        self.textarea = TextArea::default();
        self.configure_textarea();
        text
    }

    /// Rows the input box needs, borders excluded. Grows up to six lines.
    pub fn input_height(&self) -> u16 {
        (self.textarea.lines().len() as u16).clamp(1, 6)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    /// Scrolling back to the bottom re-enables following new turns.
    pub fn scroll_down(&mut self, rows: u16) {
        let max_offset = self.max_scroll_offset;
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn follow_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
