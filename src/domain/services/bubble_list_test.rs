use super::BubbleList;
use crate::domain::models::Message;
use crate::domain::models::Role;

fn transcript() -> Vec<Message> {
    return vec![
        Message::new(Role::System, "Be brief."),
        Message::new(Role::User, "Hi there!"),
        Message::assistant("Hello! How can I help?"),
    ];
}

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::default();

    assert_eq!(bubble_list.cache.len(), 0);
    assert!(bubble_list.is_empty());
}

#[test]
fn it_caches_lines() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&transcript(), 50);

    assert_eq!(bubble_list.cache.len(), 3);
}

#[test]
fn it_returns_correct_length() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&transcript(), 50);

    // Each bubble is a top bar, one text line, the time caption and a bottom bar.
    assert_eq!(bubble_list.len(), 12);
}

#[test]
fn it_drops_removed_messages() {
    let mut messages = transcript();
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    messages.remove(0);
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert_eq!(bubble_list.len(), 8);
}

#[test]
fn it_rebuilds_edited_messages() {
    let mut messages = transcript();
    let mut bubble_list = BubbleList::default();
    bubble_list.set_messages(&messages, 50);

    messages[0].content = "Be brief.\nAnswer in English.".to_string();
    bubble_list.set_messages(&messages, 50);

    assert_eq!(bubble_list.len(), 13);
}

#[test]
fn it_rebuilds_on_resize() {
    let messages = vec![Message::assistant(
        "A reply long enough to wrap once the window becomes narrow enough.",
    )];
    let mut bubble_list = BubbleList::default();

    bubble_list.set_messages(&messages, 100);
    let wide = bubble_list.len();
    bubble_list.set_messages(&messages, 30);

    assert!(bubble_list.len() > wide);
}
