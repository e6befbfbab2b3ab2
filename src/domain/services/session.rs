#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;

use super::Conversation;
use super::Dispatcher;
use crate::configuration::Settings;
use crate::configuration::SettingsForm;
use crate::domain::models::Attachment;
use crate::domain::models::Message;
use crate::domain::models::Payload;
use crate::domain::models::Role;

/// Everything one operator session owns: the active settings, the transcript
/// and the files queued for the next prompt.
#[derive(Debug)]
pub struct Session {
    pub settings: Settings,
    pub conversation: Conversation,
    pending_attachments: Vec<Attachment>,
}

impl Session {
    pub fn new(settings: Settings) -> Session {
        let conversation = Conversation::new(&settings.system_prompt);

        return Session {
            settings,
            conversation,
            pending_attachments: vec![],
        };
    }

    pub fn settings_form(&self) -> SettingsForm {
        return SettingsForm::from(&self.settings);
    }

    /// Validates the form and swaps in the new settings. On error neither the
    /// settings nor the transcript change.
    pub fn submit_settings(&mut self, form: &SettingsForm) -> Result<()> {
        let settings = form.submit()?;
        self.conversation.update_system_prompt(&settings.system_prompt);
        self.settings = settings;

        tracing::debug!(
            mock = self.settings.mock,
            method = %self.settings.method,
            "settings updated"
        );

        return Ok(());
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        return &self.pending_attachments;
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.pending_attachments.push(attachment);
    }

    pub async fn attach_path(&mut self, file_path: &path::Path) -> Result<&Attachment> {
        let attachment = Attachment::from_path(file_path).await?;
        self.pending_attachments.push(attachment);

        let last = self.pending_attachments.len() - 1;
        return Ok(&self.pending_attachments[last]);
    }

    pub fn clear_attachments(&mut self) {
        self.pending_attachments.clear();
    }

    /// Drops the first pending attachment called `name`.
    pub fn remove_attachment(&mut self, name: &str) -> Result<Attachment> {
        let index = self
            .pending_attachments
            .iter()
            .position(|attachment| return attachment.name == name);

        match index {
            Some(index) => return Ok(self.pending_attachments.remove(index)),
            None => bail!("No pending attachment named '{name}'."),
        }
    }

    /// Records the user message and hands back the payload for dispatch. The
    /// pending attachments move into the payload.
    pub fn submit_prompt(&mut self, text: &str) -> Result<Payload> {
        if text.trim().is_empty() && self.pending_attachments.is_empty() {
            bail!("Type a message or attach a file before sending.");
        }

        let attachments = self.pending_attachments.drain(..).collect::<Vec<Attachment>>();
        let summaries = attachments
            .iter()
            .map(|attachment| return attachment.summary())
            .collect();

        self.conversation
            .append(Message::with_attachments(Role::User, text, summaries))?;

        return Ok(Payload::build(&self.settings, text, attachments));
    }

    pub fn complete_turn(&mut self, reply: Message) -> Result<()> {
        return self.conversation.append(reply);
    }

    /// One full turn without a UI: submit, dispatch, record the reply.
    pub async fn run_turn(&mut self, text: &str, dispatcher: &Dispatcher) -> Result<Message> {
        let payload = self.submit_prompt(text)?;
        let reply = dispatcher.dispatch(&self.settings, &payload).await;
        self.complete_turn(reply.clone())?;

        return Ok(reply);
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.reset(&self.settings.system_prompt);
    }
}
