#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Message;
use crate::domain::models::Role;

/// Ordered transcript. A system message, if any, is always the first entry
/// and there is never more than one; every other entry is append-only.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: &str) -> Conversation {
        let mut conversation = Conversation::default();
        conversation.update_system_prompt(system_prompt);

        return conversation;
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.messages.is_empty();
    }

    pub fn last(&self) -> Option<&Message> {
        return self.messages.last();
    }

    pub fn system_message(&self) -> Option<&Message> {
        return self
            .messages
            .first()
            .filter(|message| return message.role == Role::System);
    }

    pub fn append(&mut self, message: Message) -> Result<()> {
        if message.role == Role::System {
            bail!("System messages can only be set through the system prompt");
        }

        self.messages.push(message);
        return Ok(());
    }

    /// Replaces, removes or inserts the leading system message. A blank prompt
    /// removes it.
    pub fn update_system_prompt(&mut self, system_prompt: &str) {
        let prompt = system_prompt.trim();
        let has_system = self.system_message().is_some();

        if has_system && prompt.is_empty() {
            self.messages.remove(0);
        } else if has_system {
            self.messages[0].content = prompt.to_string();
        } else if !prompt.is_empty() {
            self.messages.insert(0, Message::new(Role::System, prompt));
        }
    }

    /// Drops the whole transcript, keeping only a fresh system message.
    pub fn reset(&mut self, system_prompt: &str) {
        self.messages.clear();
        self.update_system_prompt(system_prompt);
    }
}
