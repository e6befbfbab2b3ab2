use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry<'a> {
    content: String,
    lines: Vec<Line<'a>>,
}

/// Rendered transcript. Bubbles are cached per message id and rebuilt only
/// when the width or the message text changes.
pub struct BubbleList<'a> {
    cache: HashMap<String, BubbleCacheEntry<'a>>,
    order: Vec<String>,
    line_width: usize,
    lines_len: usize,
}

impl<'a> Default for BubbleList<'a> {
    fn default() -> BubbleList<'a> {
        return BubbleList {
            cache: HashMap::new(),
            order: vec![],
            line_width: 0,
            lines_len: 0,
        };
    }
}

impl<'a> BubbleList<'a> {
    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = messages
            .iter()
            .map(|message| return message.id.to_string())
            .collect();
        self.cache.retain(|id, _| return messages.iter().any(|message| return &message.id == id));

        self.lines_len = messages
            .iter()
            .map(|message| {
                if let Some(entry) = self.cache.get(&message.id) {
                    if entry.content == message.content {
                        return entry.lines.len();
                    }
                }

                let align = BubbleAlignment::for_role(message.role);
                let lines = Bubble::new(message, align, line_width)
                    .as_lines()
                    .into_iter()
                    .map(|line| return owned_line(&line))
                    .collect::<Vec<Line<'a>>>();
                let lines_len = lines.len();

                self.cache.insert(
                    message.id.to_string(),
                    BubbleCacheEntry {
                        content: message.content.to_string(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let lines: Vec<Line<'a>> = self
            .order
            .iter()
            .filter_map(|id| return self.cache.get(id))
            .flat_map(|entry| {
                return entry.lines.to_owned();
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}

/// Detaches a rendered line from the message it was built from.
fn owned_line<'a>(line: &Line<'_>) -> Line<'a> {
    let spans = line
        .spans
        .iter()
        .map(|span| return Span::styled(span.content.to_string(), span.style))
        .collect::<Vec<Span<'a>>>();

    return Line::from(spans);
}
