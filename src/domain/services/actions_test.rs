use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::help_text;
use super::ActionsService;
use crate::configuration::Settings;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Payload;
use crate::domain::services::Dispatcher;
use crate::infrastructure::transport::HttpTransport;

fn to_reply(event: Option<Event>) -> Result<Message> {
    match event {
        Some(Event::AgentReply(message)) => return Ok(message),
        _ => bail!("Wrong type from recv"),
    }
}

#[tokio::test]
async fn it_replies_to_each_turn_in_order() -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let settings = Settings::default();

    action_tx.send(Action::DispatchTurn(
        settings.clone(),
        Payload::build(&settings, "first", vec![]),
    ))?;
    action_tx.send(Action::DispatchTurn(
        settings.clone(),
        Payload::build(&settings, "second", vec![]),
    ))?;
    drop(action_tx);

    let dispatcher = Dispatcher::new(Box::<HttpTransport>::default());
    ActionsService::start(dispatcher, event_tx, &mut action_rx).await?;

    let first = to_reply(event_rx.recv().await)?;
    let second = to_reply(event_rx.recv().await)?;
    assert!(first.content.contains("first"));
    assert!(second.content.contains("second"));
    assert!(event_rx.recv().await.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_reports_failed_turns_as_replies() -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let mut settings = Settings::default();
    settings.mock = false;

    action_tx.send(Action::DispatchTurn(
        settings.clone(),
        Payload::build(&settings, "hello", vec![]),
    ))?;
    drop(action_tx);

    let dispatcher = Dispatcher::new(Box::<HttpTransport>::default());
    ActionsService::start(dispatcher, event_tx, &mut action_rx).await?;

    let reply = to_reply(event_rx.recv().await)?;
    assert!(reply.is_error());

    return Ok(());
}

#[test]
fn it_lists_every_command_in_help() {
    let help = help_text();

    for command in ["/set", "/settings", "/attach", "/detach", "/clear", "/quit", "/help"] {
        assert!(help.contains(command), "missing {command}");
    }
}
