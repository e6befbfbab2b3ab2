#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::AttachmentSummary;
use super::Role;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Ids sort in creation order within a process and stay unique across
/// processes thanks to the uuid suffix.
pub fn create_id() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1;
    let uuid = Uuid::new_v4().to_string();
    let suffix = uuid.split('-').next().unwrap_or_default();

    return format!("msg-{sequence:06}-{suffix}");
}

pub fn now_timestamp() -> String {
    return Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
    pub attachments: Vec<AttachmentSummary>,
    is_error: bool,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message::with_attachments(role, content, vec![]);
    }

    pub fn with_attachments(
        role: Role,
        content: &str,
        attachments: Vec<AttachmentSummary>,
    ) -> Message {
        return Message {
            id: create_id(),
            role,
            content: content.to_string(),
            timestamp: now_timestamp(),
            attachments,
            is_error: false,
        };
    }

    pub fn assistant(content: &str) -> Message {
        return Message::new(Role::Assistant, content);
    }

    /// Error replies are always authored by the assistant.
    pub fn assistant_error(content: &str) -> Message {
        let mut message = Message::new(Role::Assistant, content);
        message.is_error = true;
        return message;
    }

    pub fn is_error(&self) -> bool {
        return self.is_error;
    }

    /// `HH:MM:SS UTC`, or the raw timestamp if it can't be parsed.
    pub fn display_time(&self) -> String {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return parsed.with_timezone(&Utc).format("%H:%M:%S UTC").to_string();
        }

        return self.timestamp.to_string();
    }
}
