#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;
use crate::domain::models::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

impl BubbleAlignment {
    pub fn for_role(role: Role) -> BubbleAlignment {
        if role == Role::User {
            return BubbleAlignment::Right;
        }

        return BubbleAlignment::Left;
    }
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

/// One body line of a bubble, either message text or a dimmed caption.
struct BodyLine {
    text: String,
    caption: bool,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

fn char_len(text: &str) -> usize {
    return text.chars().count();
}

fn repeat_to(text: &str, total: usize, used: &[usize]) -> String {
    let used: usize = used.iter().sum();
    return text.repeat(total.saturating_sub(used));
}

/// Greedy word wrap on character counts. Words longer than the line are split.
fn wrap_text(line: &str, max_line_length: usize) -> Vec<String> {
    let mut wrapped = vec![];
    let mut current = String::new();

    for word in line.split(' ') {
        let mut word = word.to_string();

        while char_len(&word) > max_line_length {
            if !current.is_empty() {
                wrapped.push(current);
                current = String::new();
            }
            let head = word.chars().take(max_line_length).collect::<String>();
            word = word.chars().skip(max_line_length).collect::<String>();
            wrapped.push(head);
        }

        if current.is_empty() {
            current = word;
        } else if char_len(&current) + 1 + char_len(&word) <= max_line_length {
            current = format!("{current} {word}");
        } else {
            wrapped.push(current);
            current = word;
        }
    }

    wrapped.push(current);
    return wrapped;
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    fn body(&self) -> Vec<BodyLine> {
        let mut body = self
            .message
            .content
            .lines()
            .map(|line| {
                return BodyLine {
                    text: line.replace('\t', "    "),
                    caption: false,
                };
            })
            .collect::<Vec<BodyLine>>();

        if body.is_empty() {
            body.push(BodyLine {
                text: "".to_string(),
                caption: false,
            });
        }

        for attachment in self.message.attachments.iter() {
            body.push(BodyLine {
                text: attachment.caption(),
                caption: true,
            });
        }

        body.push(BodyLine {
            text: self.message.display_time(),
            caption: true,
        });

        return body;
    }

    pub fn as_lines(&self) -> Vec<Line<'a>> {
        let body = self.body();
        let max_line_length = self.get_max_line_length(&body);

        let lines = body
            .iter()
            .flat_map(|body_line| {
                return wrap_text(&body_line.text, max_line_length)
                    .into_iter()
                    .map(|text| {
                        let mut style = Style::default();
                        if body_line.caption {
                            style = style.fg(Color::DarkGray);
                        }
                        return self.text_to_line(Span::styled(text, style), max_line_length);
                    })
                    .collect::<Vec<Line<'a>>>();
            })
            .collect::<Vec<Line<'a>>>();

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn text_to_line(&self, span: Span<'a>, max_line_length: usize) -> Line<'a> {
        let line_str_len = char_len(&span.content);
        let fill = repeat_to(" ", max_line_length, &[line_str_len]);
        let formatted_line_length =
            line_str_len + fill.len() + Bubble::style_config().bubble_padding;

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string()), span];
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding = repeat_to(" ", self.window_max_width, &[formatted_line_length]);

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self, body: &[BodyLine]) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width).max(1);

        let longest = body
            .iter()
            .map(|line| return char_len(&line.text))
            .max()
            .unwrap_or_default();

        return longest
            .min(available)
            .max(char_len(self.message.role.label()));
    }

    fn wrap_lines_in_bubble(&self, lines: Vec<Line<'a>>, max_line_length: usize) -> Vec<Line<'a>> {
        let label = self.message.role.label();
        // Add 2 for the padding next to the vertical bars.
        let label_bar = "─".repeat(max_line_length + 2 - char_len(label));
        let top_bar = format!("╭{label}{label_bar}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let bar_bubble_padding = repeat_to(
            " ",
            self.window_max_width,
            &[max_line_length, Bubble::style_config().bubble_padding],
        );

        let (top, bottom) = match self.alignment {
            BubbleAlignment::Left => (
                format!("{top_bar}{bar_bubble_padding}"),
                format!("{bottom_bar}{bar_bubble_padding}"),
            ),
            BubbleAlignment::Right => (
                format!("{bar_bubble_padding}{top_bar}"),
                format!("{bar_bubble_padding}{bottom_bar}"),
            ),
        };

        let mut res = vec![self.highlight_line(top)];
        res.extend(lines);
        res.push(self.highlight_line(bottom));
        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'a> {
        if self.message.is_error() {
            return Span::styled(text, Style::default().fg(Color::Red));
        }
        if self.message.role == Role::System {
            return Span::styled(
                text,
                Style::default().fg(Color::Rgb(138, 85, 63)), // Brown
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'a> {
        return Line::from(self.highlight_span(text));
    }
}
