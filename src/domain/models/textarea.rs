use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

fn prompt_block<'a>(pending_attachments: usize) -> Block<'a> {
    let mut title = "Message the agent (Enter to send, /help for commands)".to_string();
    if pending_attachments == 1 {
        title = format!("{title} [1 attachment]");
    } else if pending_attachments > 1 {
        title = format!("{title} [{pending_attachments} attachments]");
    }

    return Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(title)
        .padding(Padding::new(1, 1, 0, 0));
}

impl<'a> TextArea {
    pub fn default() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(prompt_block(0));

        return textarea;
    }

    /// Keeps the prompt title in sync with the attachments queued for the
    /// next turn.
    pub fn set_pending_attachments(textarea: &mut tui_textarea::TextArea<'a>, count: usize) {
        textarea.set_block(prompt_block(count));
    }
}
