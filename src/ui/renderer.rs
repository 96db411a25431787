use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::completion::CompletionClient;
use crate::core::conversation::ConversationController;
use crate::ui::picker::PickerState;
use crate::ui::scroll::ScrollCalculator;
use crate::ui::state::UiState;

const SIDEBAR_WIDTH: u16 = 24;

/// Screen regions for one frame.
pub struct ChatLayout {
    pub sidebar: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

impl ChatLayout {
    pub fn compute(area: Rect, input_height: u16) -> Self {
        let [sidebar, main] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .areas(area);
        let [transcript, input, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(input_height + 2),
                Constraint::Length(1),
            ])
            .areas(main);
        Self {
            sidebar,
            transcript,
            input,
            status,
        }
    }

    /// Rows available to transcript text (the title takes one).
    pub fn transcript_height(&self) -> u16 {
        self.transcript.height.saturating_sub(1)
    }
}

pub fn ui<C: CompletionClient>(
    f: &mut Frame,
    chat: &ConversationController<C>,
    state: &mut UiState,
) {
    let layout = ChatLayout::compute(f.area(), state.input_height());

    render_sidebar(f, layout.sidebar, chat);
    render_transcript(f, &layout, chat, state);
    f.render_widget(state.textarea(), layout.input);
    render_status(f, layout.status, state);

    if let Some(picker) = state.picker.as_ref() {
        render_picker(f, picker);
    }
}

fn render_sidebar<C: CompletionClient>(
    f: &mut Frame,
    area: Rect,
    chat: &ConversationController<C>,
) {
    let current = chat.session().selected_personality();
    let items: Vec<ListItem> = chat
        .registry()
        .iter()
        .map(|personality| {
            let style = if personality.id == current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} {}", personality.avatar, personality.display_name),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::RIGHT)
            .title("Personalities"),
    );
    f.render_widget(list, area);
}

fn render_transcript<C: CompletionClient>(
    f: &mut Frame,
    layout: &ChatLayout,
    chat: &ConversationController<C>,
    state: &mut UiState,
) {
    let area = layout.transcript;
    let lines = ScrollCalculator::build_display_lines(&chat.render(), state.markdown);
    let max_offset =
        ScrollCalculator::max_scroll_offset(&lines, area.width, layout.transcript_height());
    state.max_scroll_offset = max_offset;
    state.page_height = layout.transcript_height().max(1);
    state.scroll_offset = if state.auto_scroll {
        max_offset
    } else {
        state.scroll_offset.min(max_offset)
    };

    let personality = chat.current_personality();
    let title = format!(
        "Masquerade v{} • {} {} • {}",
        env!("CARGO_PKG_VERSION"),
        personality.avatar,
        personality.display_name,
        state.model
    );

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, state: &UiState) {
    let line = if state.pending {
        Line::from(Span::styled(
            "● Waiting for reply...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(notice) = state.notice.as_ref() {
        let style = if notice.is_error() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(Span::styled(notice.text().to_string(), style))
    } else {
        Line::from(Span::styled(
            "/help for commands",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_picker(f: &mut Frame, picker: &PickerState) {
    let height = (picker.items.len() as u16).saturating_add(2);
    let area = centered_rect(f.area(), 40, height);

    let items: Vec<ListItem> = picker
        .items
        .iter()
        .map(|item| ListItem::new(item.label.clone()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (↑/↓, Enter, Esc)", picker.title)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
