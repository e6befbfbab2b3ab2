use std::io::Write;

use anyhow::Result;
use tempfile::Builder;

use super::format_size;
use super::Attachment;

#[test]
fn it_encodes_bytes_as_base64() {
    let attachment = Attachment::from_bytes("notes.txt", "text/plain", b"hello world", Some(1700000000000));

    assert_eq!(attachment.name, "notes.txt");
    assert_eq!(attachment.size, 11);
    assert_eq!(attachment.mime_type, "text/plain");
    assert_eq!(attachment.last_modified, Some(1700000000000));
    assert_eq!(attachment.base64, "aGVsbG8gd29ybGQ=");
}

#[test]
fn it_serializes_with_browser_field_names() -> Result<()> {
    let attachment = Attachment::from_bytes("a.bin", "application/octet-stream", &[0, 1, 2], None);
    let value = serde_json::to_value(&attachment)?;

    insta::assert_json_snapshot!(value, @r###"
    {
      "base64": "AAEC",
      "lastModified": null,
      "name": "a.bin",
      "size": 3,
      "type": "application/octet-stream"
    }
    "###);

    return Ok(());
}

#[test]
fn it_summarizes_without_the_payload() {
    let attachment = Attachment::from_bytes("report.pdf", "application/pdf", &[0; 2048], None);
    let summary = attachment.summary();

    assert_eq!(summary.name, "report.pdf");
    assert_eq!(summary.size, 2048);
    assert_eq!(summary.caption(), "+ report.pdf (2.0 KB)");
}

#[test]
fn it_formats_sizes() {
    assert_eq!(format_size(0), "0.0 KB");
    assert_eq!(format_size(1536), "1.5 KB");
}

#[tokio::test]
async fn it_loads_from_a_path() -> Result<()> {
    let mut file = Builder::new().suffix(".json").tempfile()?;
    file.write_all(b"{\"a\": 1}")?;

    let attachment = Attachment::from_path(file.path()).await?;

    assert_eq!(attachment.size, 8);
    assert_eq!(attachment.mime_type, "application/json");
    assert!(attachment.name.ends_with(".json"));
    assert!(attachment.last_modified.is_some());
    assert_eq!(attachment.base64, "eyJhIjogMX0=");

    return Ok(());
}

#[tokio::test]
async fn it_falls_back_to_octet_stream() -> Result<()> {
    let mut file = Builder::new().suffix(".zzunknown").tempfile()?;
    file.write_all(b"??")?;

    let attachment = Attachment::from_path(file.path()).await?;
    assert_eq!(attachment.mime_type, "application/octet-stream");

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_missing_files() {
    let res = Attachment::from_path(std::path::Path::new("./test/missing-file.txt")).await;

    assert!(res.is_err());
    assert!(res
        .unwrap_err()
        .to_string()
        .starts_with("Unable to read ./test/missing-file.txt"));
}
