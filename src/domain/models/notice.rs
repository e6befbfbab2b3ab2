#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use super::format_size;
use super::Attachment;
use crate::configuration::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Latest feedback for the operator, such as a validation error or the help
/// text. Replaced by the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Info,
            text: text.to_string(),
        };
    }

    pub fn error(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Error,
            text: text.to_string(),
        };
    }
}

pub fn status_line(settings: &Settings, waiting: bool) -> String {
    let mut mode = "Mode: mock replies".to_string();
    if !settings.mock && settings.base_url.trim().is_empty() {
        mode = "Mode: live, no base URL set".to_string();
    } else if !settings.mock {
        mode = format!(
            "Mode: live, {method} {base}{endpoint}",
            method = settings.method,
            base = settings.base_url.trim().trim_end_matches('/'),
            endpoint = settings.endpoint
        );
    }

    if waiting {
        return format!("{mode} | sending");
    }

    return mode;
}

pub fn pending_line(pending: &[Attachment]) -> Option<String> {
    if pending.is_empty() {
        return None;
    }

    let names = pending
        .iter()
        .map(|attachment| {
            return format!("{} ({})", attachment.name, format_size(attachment.size));
        })
        .collect::<Vec<String>>()
        .join(", ");

    return Some(format!("Attached: {names}"));
}

pub struct NoticePanel {}

impl NoticePanel {
    pub fn lines<'a>(
        settings: &Settings,
        waiting: bool,
        pending: &[Attachment],
        notice: Option<&Notice>,
    ) -> Vec<Line<'a>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![Line::from(Span::styled(status_line(settings, waiting), dim))];

        if let Some(text) = pending_line(pending) {
            lines.push(Line::from(Span::styled(text, dim)));
        }

        if let Some(notice) = notice {
            let mut style = Style::default();
            if notice.kind == NoticeKind::Error {
                style = style.fg(Color::Red);
            }

            for line in notice.text.lines() {
                lines.push(Line::from(Span::styled(line.to_string(), style)));
            }
        }

        return lines;
    }

    /// Rows the lines fill once wrapped inside a panel `width` columns wide.
    pub fn rows(lines: &[Line], width: u16) -> u16 {
        let inner_width = usize::from(width.saturating_sub(4)).max(1);
        let rows = lines
            .iter()
            .map(|line| return ((line.width() + inner_width - 1) / inner_width).max(1))
            .sum::<usize>();

        return u16::try_from(rows).unwrap_or(u16::MAX);
    }

    /// Panel height for `rows` of content plus borders, capped at `max_height`.
    pub fn height(rows: u16, max_height: u16) -> u16 {
        return rows.saturating_add(2).min(max_height.max(3));
    }

    /// How far the content can scroll when only `height` rows are available.
    pub fn max_scroll(rows: u16, height: u16) -> u16 {
        return rows.saturating_sub(height.saturating_sub(2));
    }

    pub fn render<B: Backend>(
        frame: &mut Frame<B>,
        rect: Rect,
        lines: Vec<Line>,
        scroll: u16,
        overflowing: bool,
    ) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::new(1, 1, 0, 0));
        if overflowing {
            block = block.title("Up/Down to scroll, Esc to dismiss");
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            rect,
        );
    }
}
