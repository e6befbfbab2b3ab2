#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path;
use std::time::UNIX_EPOCH;

use anyhow::anyhow;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;

/// A file queued for the next prompt. The bytes are encoded once, when the
/// attachment is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: Option<i64>,
    pub base64: String,
}

/// What the transcript keeps of an attachment once it has been sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl AttachmentSummary {
    pub fn caption(&self) -> String {
        return format!("+ {} ({})", self.name, format_size(self.size));
    }
}

pub fn format_size(size: u64) -> String {
    return format!("{:.1} KB", size as f64 / 1024.0);
}

impl Attachment {
    pub fn from_bytes(
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        last_modified: Option<i64>,
    ) -> Attachment {
        return Attachment {
            name: name.to_string(),
            size: bytes.len() as u64,
            mime_type: mime_type.to_string(),
            last_modified,
            base64: b64.encode(bytes),
        };
    }

    pub async fn from_path(file_path: &path::Path) -> Result<Attachment> {
        let name = file_path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .ok_or_else(|| return anyhow!("{} is not a file", file_path.display()))?;

        let bytes = fs::read(file_path)
            .await
            .map_err(|err| return anyhow!("Unable to read {}: {err}", file_path.display()))?;

        let last_modified = fs::metadata(file_path)
            .await
            .ok()
            .and_then(|metadata| return metadata.modified().ok())
            .and_then(|modified| return modified.duration_since(UNIX_EPOCH).ok())
            .and_then(|elapsed| return i64::try_from(elapsed.as_millis()).ok());

        let mime_type = mime_guess::from_path(file_path)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(name = name.as_str(), size = bytes.len(), "attachment loaded");

        return Ok(Attachment::from_bytes(
            &name,
            &mime_type,
            &bytes,
            last_modified,
        ));
    }

    pub fn summary(&self) -> AttachmentSummary {
        return AttachmentSummary {
            name: self.name.to_string(),
            size: self.size,
            mime_type: self.mime_type.to_string(),
        };
    }
}
