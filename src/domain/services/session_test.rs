use std::io::Write;

use anyhow::Result;
use tempfile::NamedTempFile;

use super::Session;
use crate::configuration::Settings;
use crate::configuration::SettingsKey;
use crate::configuration::EXTRA_HEADERS_ERROR;
use crate::domain::models::Attachment;
use crate::domain::models::Role;
use crate::domain::models::TransportBox;
use crate::domain::services::Dispatcher;
use crate::infrastructure::transport::HttpTransport;

fn session() -> Session {
    let mut settings = Settings::default();
    settings.system_prompt = "Be brief.".to_string();
    return Session::new(settings);
}

fn offline_dispatcher() -> Dispatcher {
    let transport: TransportBox = Box::<HttpTransport>::default();
    return Dispatcher::new(transport);
}

#[test]
fn it_seeds_the_system_message() {
    let session = session();

    assert_eq!(session.conversation.len(), 1);
    assert_eq!(
        session.conversation.system_message().unwrap().content,
        "Be brief."
    );
}

#[test]
fn it_applies_submitted_settings() -> Result<()> {
    let mut session = session();
    let mut form = session.settings_form();
    form.set(SettingsKey::BaseUrl, " http://x.test ")?;
    form.set(SettingsKey::SystemPrompt, "Be thorough.")?;
    form.set(SettingsKey::Mock, "off")?;

    session.submit_settings(&form)?;

    assert_eq!(session.settings.base_url, "http://x.test");
    assert!(!session.settings.mock);
    assert_eq!(
        session.conversation.system_message().unwrap().content,
        "Be thorough."
    );

    return Ok(());
}

#[test]
fn it_keeps_everything_when_the_form_is_invalid() -> Result<()> {
    let mut session = session();
    session.submit_prompt("hello")?;
    let settings_before = session.settings.clone();
    let messages_before = session.conversation.messages().to_vec();

    let mut form = session.settings_form();
    form.set(SettingsKey::SystemPrompt, "")?;
    form.set(SettingsKey::ExtraHeaders, "[1, 2]")?;
    let res = session.submit_settings(&form);

    assert_eq!(res.unwrap_err().to_string(), EXTRA_HEADERS_ERROR);
    assert_eq!(session.settings, settings_before);
    assert_eq!(session.conversation.messages(), messages_before.as_slice());

    return Ok(());
}

#[test]
fn it_removes_the_system_message_when_cleared() -> Result<()> {
    let mut session = session();
    session.submit_prompt("hello")?;
    let mut form = session.settings_form();
    form.set(SettingsKey::SystemPrompt, "  ")?;

    session.submit_settings(&form)?;

    assert!(session.conversation.system_message().is_none());
    assert_eq!(session.conversation.messages()[0].content, "hello");

    return Ok(());
}

#[test]
fn it_rejects_blank_prompts_without_attachments() {
    let mut session = session();

    assert!(session.submit_prompt("   ").is_err());
    assert_eq!(session.conversation.len(), 1);
}

#[test]
fn it_accepts_blank_prompts_with_attachments() -> Result<()> {
    let mut session = session();
    session.attach(Attachment::from_bytes("a.txt", "text/plain", b"abc", None));

    let payload = session.submit_prompt("")?;

    assert_eq!(payload.input, "");
    assert_eq!(payload.attachments.len(), 1);

    return Ok(());
}

#[test]
fn it_drains_attachments_into_exactly_one_prompt() -> Result<()> {
    let mut session = session();
    session.attach(Attachment::from_bytes("a.txt", "text/plain", b"abc", None));
    session.attach(Attachment::from_bytes("b.csv", "text/csv", b"1,2", None));

    let first = session.submit_prompt("compare")?;
    let second = session.submit_prompt("again")?;

    assert_eq!(first.attachments.len(), 2);
    assert!(second.attachments.is_empty());
    assert!(session.pending_attachments().is_empty());

    let user = &session.conversation.messages()[1];
    assert_eq!(user.role, Role::User);
    assert_eq!(user.attachments.len(), 2);
    assert_eq!(user.attachments[0].name, "a.txt");
    assert_eq!(user.attachments[1].mime_type, "text/csv");

    return Ok(());
}

#[test]
fn it_clears_pending_attachments() {
    let mut session = session();
    session.attach(Attachment::from_bytes("a.txt", "text/plain", b"abc", None));

    session.clear_attachments();

    assert!(session.pending_attachments().is_empty());
}

#[test]
fn it_removes_one_pending_attachment_by_name() -> Result<()> {
    let mut session = session();
    session.attach(Attachment::from_bytes("a.txt", "text/plain", b"abc", None));
    session.attach(Attachment::from_bytes("b.csv", "text/csv", b"1,2", None));

    let removed = session.remove_attachment("a.txt")?;

    assert_eq!(removed.name, "a.txt");
    assert_eq!(session.pending_attachments().len(), 1);
    assert_eq!(session.pending_attachments()[0].name, "b.csv");

    let res = session.remove_attachment("a.txt");
    assert_eq!(
        res.unwrap_err().to_string(),
        "No pending attachment named 'a.txt'."
    );
    assert_eq!(session.pending_attachments().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_attaches_files_from_disk() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"quarterly numbers")?;
    let mut session = session();

    let attachment = session.attach_path(file.path()).await?;

    assert_eq!(attachment.size, 17);
    assert_eq!(session.pending_attachments().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_leaves_the_queue_alone_when_a_file_is_missing() {
    let mut session = session();

    let res = session
        .attach_path(std::path::Path::new("./does/not/exist.txt"))
        .await;

    assert!(res.is_err());
    assert!(session.pending_attachments().is_empty());
}

#[tokio::test]
async fn it_runs_a_mock_turn() -> Result<()> {
    let mut session = session();
    let dispatcher = offline_dispatcher();

    let reply = session.run_turn("Summarise Q3", &dispatcher).await?;

    assert!(!reply.is_error());
    assert!(reply.content.contains("Summarise Q3"));
    assert_eq!(session.conversation.len(), 3);
    assert_eq!(session.conversation.last().unwrap().id, reply.id);

    return Ok(());
}

#[tokio::test]
async fn it_records_failed_turns() -> Result<()> {
    let mut session = session();
    session.settings.mock = false;
    let dispatcher = offline_dispatcher();

    let reply = session.run_turn("hello", &dispatcher).await?;

    assert!(reply.is_error());
    assert_eq!(session.conversation.len(), 3);

    let next = session.run_turn("still here?", &dispatcher).await?;
    assert!(next.is_error());
    assert_eq!(session.conversation.len(), 5);

    return Ok(());
}

#[test]
fn it_clears_the_conversation() -> Result<()> {
    let mut session = session();
    session.submit_prompt("hello")?;

    session.clear_conversation();

    assert_eq!(session.conversation.len(), 1);
    assert_eq!(session.conversation.messages()[0].role, Role::System);

    return Ok(());
}
