use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::core::display::DisplayTurn;
use crate::core::message::TurnRole;
use crate::ui::markdown::{render_markdown, render_plain};

/// Builds transcript lines and works out how far they scroll.
pub struct ScrollCalculator;

impl ScrollCalculator {
    pub fn build_display_lines(rows: &[DisplayTurn], markdown: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for row in rows {
            Self::add_turn_lines(&mut lines, row, markdown);
        }
        lines
    }

    fn add_turn_lines(lines: &mut Vec<Line<'static>>, row: &DisplayTurn, markdown: bool) {
        match row.role {
            TurnRole::User => {
                let style = Style::default().fg(Color::Cyan);
                let mut content = row.content.lines();
                let first = content.next().unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", row.avatar),
                        style.add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(first.to_string(), style),
                ]));
                for rest in content {
                    lines.push(Line::from(Span::styled(format!("   {rest}"), style)));
                }
            }
            TurnRole::Assistant => {
                let base = Style::default().fg(Color::White);
                let body = if markdown {
                    render_markdown(&row.content, base)
                } else {
                    render_plain(&row.content, base)
                };
                let mut body = body.into_iter();
                let mut first = vec![Span::styled(
                    format!("{} ", row.avatar),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                if let Some(line) = body.next() {
                    first.extend(line.spans);
                }
                lines.push(Line::from(first));
                lines.extend(body);
            }
        }
        lines.push(Line::from(""));
    }

    /// How many rows `lines` occupy once word-wrapped to `width` columns.
    pub fn calculate_wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
        lines.iter().fold(0u16, |total, line| {
            let text = line.to_string();
            let text = text.trim_end();
            let rows = if text.is_empty() || width == 0 {
                1
            } else {
                Self::calculate_word_wrapped_lines(text, width)
            };
            total.saturating_add(rows)
        })
    }

    fn calculate_word_wrapped_lines(text: &str, width: u16) -> u16 {
        let width = width as usize;
        let body = text.trim_start();
        // Leading indentation stays on the first row.
        let mut current = text[..text.len() - body.len()].width().min(width);
        let mut count = 1u16;
        let mut first_word = true;

        for word in body.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(!first_word);
            first_word = false;
            if current > 0 && current + gap + word_width > width {
                count = count.saturating_add(1);
                current = 0;
            } else {
                current += gap;
            }
            // A word wider than the whole line is broken across rows.
            if word_width > width {
                let extra = (word_width - 1) / width;
                count = count.saturating_add(extra as u16);
                current = word_width - extra * width;
            } else {
                current += word_width;
            }
        }

        count
    }

    pub fn max_scroll_offset(lines: &[Line<'_>], width: u16, height: u16) -> u16 {
        Self::calculate_wrapped_line_count(lines, width).saturating_sub(height)
    }
}
