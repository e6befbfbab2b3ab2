use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// A reply from an agent that returns its whole transcript rather than a
/// single message.
pub fn transcript_reply_fixture() -> &'static str {
    return r#"
{
  "id": "run-42",
  "messages": [
    { "role": "system", "content": "You are terse." },
    { "role": "user", "content": "Summarise the attached report." },
    { "role": "assistant", "content": { "parts": ["not", "a", "string"] } },
    { "role": "assistant", "content": "The report covers Q3 revenue, up 12%." },
    { "role": "assistant", "content": "A later reply that should be ignored." }
  ],
  "content": "flat content loses to the transcript"
}
"#
    .trim();
}

/// Small config document exercising every recognised key plus one unknown.
pub fn config_fixture() -> &'static str {
    return r#"
{
  "baseUrl": "https://agents.example.test/",
  "endpoint": "v2/run",
  "method": "put",
  "mock": false,
  "apiKey": "sk-test",
  "temperature": 0.25,
  "extraHeaders": { "X-Team": "core", "X-Retry": 3, "X-Skip": null },
  "systemPrompt": "Answer in English.",
  "theme": "ignored"
}
"#
    .trim();
}
