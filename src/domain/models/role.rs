use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Name shown on chat bubbles.
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => return "System",
            Role::User => return "You",
            Role::Assistant => return "Agent",
        }
    }
}
