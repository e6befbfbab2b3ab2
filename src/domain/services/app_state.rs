#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use ratatui::prelude::Rect;
use strum::VariantNames;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Scroll;
use super::Session;
use crate::configuration::Resolution;
use crate::configuration::SettingsKey;
use crate::domain::models::format_size;
use crate::domain::models::Action;
use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::models::SlashCommand;

pub struct AppState<'a> {
    pub bubble_list: BubbleList<'a>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub notice: Option<Notice>,
    pub notice_max_scroll: u16,
    pub notice_scroll: u16,
    pub scroll: Scroll,
    pub session: Session,
    pub waiting_for_agent: bool,
}

impl<'a> AppState<'a> {
    /// Settings that could not be applied at startup are shown as the first
    /// notice.
    pub fn new(resolution: Resolution) -> AppState<'a> {
        let mut notice = None;
        if !resolution.warnings.is_empty() {
            let warnings = resolution
                .warnings
                .iter()
                .map(|warning| return format!("- {warning}"))
                .collect::<Vec<String>>()
                .join("\n");
            notice = Some(Notice::error(&format!(
                "Some configuration was ignored:\n{warnings}"
            )));
        }

        let mut app_state = AppState {
            bubble_list: BubbleList::default(),
            last_known_height: 0,
            last_known_width: 0,
            notice,
            notice_max_scroll: 0,
            notice_scroll: 0,
            scroll: Scroll::default(),
            session: Session::new(resolution.settings),
            waiting_for_agent: false,
        };
        app_state.sync_dependants();

        return app_state;
    }

    /// Returns `(should_break, should_continue)`. `should_continue` is true when
    /// the input was a command and must not be sent as a prompt.
    pub async fn handle_slash_commands(&mut self, input: &str) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, true));
        }

        if command.is_help() {
            self.notify(Some(Notice::info(&help_text())));
        } else if command.is_show_settings() {
            let settings = self.session.settings.redacted().to_pretty_json()?;
            self.notify(Some(Notice::info(&settings)));
        } else if command.is_set() {
            let notice = self.set_setting(&command);
            self.notify(Some(notice));
            self.sync_dependants();
        } else if command.is_attach() {
            let notice = self.attach(&command.rest(0)).await;
            self.notify(Some(notice));
        } else if command.is_detach() {
            let notice = self.detach(command.rest(0).trim());
            self.notify(Some(notice));
        } else if command.is_clear() {
            self.session.clear_conversation();
            self.notify(Some(Notice::info("Conversation cleared.")));
            self.sync_dependants();
            self.scroll.last();
        }

        return Ok((false, true));
    }

    fn set_setting(&mut self, command: &SlashCommand) -> Notice {
        let usage = format!(
            "Usage: /set KEY VALUE. Keys: {}.",
            SettingsKey::VARIANTS.join(", ")
        );
        let key = command
            .args
            .first()
            .and_then(|name| return SettingsKey::parse(name));
        let key = match key {
            Some(key) => key,
            None => return Notice::error(&usage),
        };

        let mut form = self.session.settings_form();
        if let Err(err) = form.set(key, &command.rest(1)) {
            return Notice::error(&err.to_string());
        }
        if let Err(err) = self.session.submit_settings(&form) {
            return Notice::error(&err.to_string());
        }

        return Notice::info(&format!("Updated {key}."));
    }

    async fn attach(&mut self, file_path: &str) -> Notice {
        if file_path.trim().is_empty() {
            return Notice::error("Usage: /attach PATH");
        }

        match self.session.attach_path(path::Path::new(file_path.trim())).await {
            Ok(attachment) => {
                return Notice::info(&format!(
                    "Attached {} ({}), it will be sent with your next message.",
                    attachment.name,
                    format_size(attachment.size)
                ));
            }
            Err(err) => return Notice::error(&err.to_string()),
        }
    }

    fn detach(&mut self, name: &str) -> Notice {
        if name.is_empty() {
            let count = self.session.pending_attachments().len();
            self.session.clear_attachments();
            return Notice::info(&format!("Removed {count} pending attachment(s)."));
        }

        match self.session.remove_attachment(name) {
            Ok(attachment) => return Notice::info(&format!("Removed {}.", attachment.name)),
            Err(err) => return Notice::error(&err.to_string()),
        }
    }

    /// Records the prompt and queues the turn. Returns false when the prompt
    /// was rejected, in which case the notice explains why.
    pub fn submit_prompt(
        &mut self,
        text: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        let payload = match self.session.submit_prompt(text) {
            Ok(payload) => payload,
            Err(err) => {
                self.notify(Some(Notice::error(&err.to_string())));
                return Ok(false);
            }
        };

        tx.send(Action::DispatchTurn(self.session.settings.clone(), payload))?;
        self.waiting_for_agent = true;
        self.notify(None);
        self.sync_dependants();
        self.scroll.last();

        return Ok(true);
    }

    pub fn handle_agent_reply(&mut self, message: Message) -> Result<()> {
        self.session.complete_turn(message)?;
        self.waiting_for_agent = false;
        self.sync_dependants();
        self.scroll.last();

        return Ok(());
    }

    fn notify(&mut self, notice: Option<Notice>) {
        self.notice = notice;
        self.notice_scroll = 0;
    }

    pub fn dismiss_notice(&mut self) {
        self.notify(None);
        self.notice_max_scroll = 0;
    }

    /// Records how far the notice can scroll at the current panel size.
    pub fn set_notice_max_scroll(&mut self, max_scroll: u16) {
        self.notice_max_scroll = max_scroll;
        self.notice_scroll = self.notice_scroll.min(max_scroll);
    }

    /// Scroll keys move the notice while it does not fit its panel.
    pub fn notice_overflows(&self) -> bool {
        return self.notice.is_some() && self.notice_max_scroll > 0;
    }

    pub fn scroll_notice_down(&mut self, rows: u16) {
        self.notice_scroll = self
            .notice_scroll
            .saturating_add(rows)
            .min(self.notice_max_scroll);
    }

    pub fn scroll_notice_up(&mut self, rows: u16) {
        self.notice_scroll = self.notice_scroll.saturating_sub(rows);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list.set_messages(
            self.session.conversation.messages(),
            self.last_known_width.into(),
        );

        let lines_len = u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(lines_len, self.last_known_height);

        if self.waiting_for_agent {
            self.scroll.last();
        }
    }
}
