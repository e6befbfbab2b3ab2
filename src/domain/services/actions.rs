#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Dispatcher;
use crate::domain::models::Action;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /set KEY VALUE - Changes one setting. Keys: base-url, endpoint, method, mock, api-key, temperature, extra-headers, system-prompt.
- /settings (/s) - Shows the current settings with the API key masked.
- /attach (/a) PATH - Queues a file for your next message.
- /detach (/d) [NAME] - Drops the queued file called NAME, or every queued file.
- /clear - Clears the conversation, keeping the system prompt.
- /quit /exit (/q) - Exit.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U / Page Up - Page up
- CTRL+D / Page Down - Page down
- Esc - Dismiss the notice. Scroll keys move a notice that does not fit.
- Enter - Send the message
- CTRL+C - Exit. Replies still in flight are dropped.
        "#;

    return text.trim().to_string();
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs turns one at a time until the action channel closes. Each turn is
    /// awaited before the next action is read.
    pub async fn start(
        dispatcher: Dispatcher,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::DispatchTurn(settings, payload) => {
                    let reply = dispatcher.dispatch(&settings, &payload).await;
                    tx.send(Event::AgentReply(reply))?;
                }
            }
        }

        return Ok(());
    }
}
