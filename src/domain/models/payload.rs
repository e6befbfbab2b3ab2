#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;

use serde_derive::Serialize;

use super::now_timestamp;
use super::Attachment;
use crate::configuration::Settings;

/// Request body sent to the agent for one turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Payload {
    /// Sent as configured, an empty prompt included.
    pub system: String,
    pub input: String,
    pub attachments: Vec<Attachment>,
    pub temperature: f64,
    pub timestamp: String,
}

impl Payload {
    /// The user text is passed through untouched, empty or not.
    pub fn build(settings: &Settings, user_text: &str, attachments: Vec<Attachment>) -> Payload {
        return Payload {
            system: settings.system_prompt.to_string(),
            input: user_text.to_string(),
            attachments,
            temperature: settings.temperature,
            timestamp: now_timestamp(),
        };
    }
}
