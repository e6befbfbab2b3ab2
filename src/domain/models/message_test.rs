use chrono::DateTime;

use super::create_id;
use super::Message;
use crate::domain::models::Attachment;
use crate::domain::models::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::User, "Hi there!");

    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hi there!");
    assert!(msg.attachments.is_empty());
    assert!(!msg.is_error());
    assert!(DateTime::parse_from_rfc3339(&msg.timestamp).is_ok());
}

#[test]
fn it_keeps_content_verbatim() {
    let msg = Message::new(Role::User, "\tindented\n");
    assert_eq!(msg.content, "\tindented\n");
}

#[test]
fn it_executes_assistant_error() {
    let msg = Message::assistant_error("It broke!");

    assert_eq!(msg.role, Role::Assistant);
    assert!(msg.is_error());
    assert!(!Message::assistant("Fine").is_error());
}

#[test]
fn it_attaches_summaries() {
    let attachment = Attachment::from_bytes("a.txt", "text/plain", b"abc", None);
    let msg = Message::with_attachments(Role::User, "see file", vec![attachment.summary()]);

    assert_eq!(msg.attachments.len(), 1);
    assert_eq!(msg.attachments[0].name, "a.txt");
    assert_eq!(msg.attachments[0].size, 3);
}

#[test]
fn it_creates_distinct_ordered_ids() {
    let first = create_id();
    let second = create_id();

    assert_ne!(first, second);
    assert!(first.starts_with("msg-"));
    assert!(first[..10] < second[..10]);
}

#[test]
fn it_formats_display_time() {
    let mut msg = Message::new(Role::System, "Be brief.");

    msg.timestamp = "2024-03-01T09:15:30.250Z".to_string();
    assert_eq!(msg.display_time(), "09:15:30 UTC");

    msg.timestamp = "yesterday".to_string();
    assert_eq!(msg.display_time(), "yesterday");
}

#[test]
fn it_labels_roles() {
    assert_eq!(Role::System.label(), "System");
    assert_eq!(Role::User.label(), "You");
    assert_eq!(Role::Assistant.label(), "Agent");
    assert_eq!(Role::Assistant.to_string(), "assistant");
}
