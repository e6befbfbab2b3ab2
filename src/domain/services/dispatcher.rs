#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;

use super::normalize;
use super::parse_body;
use crate::configuration::normalize_endpoint;
use crate::configuration::Settings;
use crate::domain::models::AgentRequest;
use crate::domain::models::Message;
use crate::domain::models::Payload;
use crate::domain::models::TransportBox;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const MISSING_BASE_URL_ERROR: &str =
    "Request failed: set a base URL in the settings or enable mock mode.";

pub fn compose_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    return format!("{base}{endpoint}", endpoint = normalize_endpoint(endpoint));
}

/// Later entries win: extra headers may replace the content type or the
/// bearer token.
pub fn build_headers(settings: &Settings) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    let api_key = settings.api_key.trim();
    if !api_key.is_empty() {
        headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
    }

    // Header names are case-insensitive on the wire.
    for (key, value) in settings.extra_headers.iter() {
        headers.retain(|existing: &String, _| return !existing.eq_ignore_ascii_case(key));
        headers.insert(key.to_string(), value.to_string());
    }

    return headers;
}

pub fn mock_reply(payload: &Payload) -> String {
    let mut attachment_note = "No attachments supplied with this request.".to_string();
    if !payload.attachments.is_empty() {
        attachment_note = format!(
            "{count} attachment(s) received and available for analysis.",
            count = payload.attachments.len()
        );
    }

    let mut mode = "precise";
    if payload.temperature > 0.6 {
        mode = "creative";
    }

    return format!(
        "Received your instruction:\n{input}\n\n{attachment_note}\nCurrent mode: {mode}.",
        input = payload.input
    );
}

/// Turns one payload into one assistant reply, either fabricated locally or
/// fetched from the configured agent.
pub struct Dispatcher {
    transport: TransportBox,
}

impl Dispatcher {
    pub fn new(transport: TransportBox) -> Dispatcher {
        return Dispatcher { transport };
    }

    /// Never fails: every error becomes an error-flagged assistant message.
    pub async fn dispatch(&self, settings: &Settings, payload: &Payload) -> Message {
        if settings.mock {
            tracing::debug!(attachments = payload.attachments.len(), "Mock dispatch");
            return Message::assistant(&mock_reply(payload));
        }

        if settings.base_url.trim().is_empty() {
            tracing::error!("Dispatch attempted without a base URL");
            return Message::assistant_error(MISSING_BASE_URL_ERROR);
        }

        match self.request(settings, payload).await {
            Ok(content) => return Message::assistant(&content),
            Err(err) => {
                tracing::error!(error = ?err, "Agent request failed");
                return Message::assistant_error(&format!("Request failed: {err}"));
            }
        }
    }

    async fn request(&self, settings: &Settings, payload: &Payload) -> Result<String> {
        let request = AgentRequest {
            method: settings.method,
            url: compose_url(&settings.base_url, &settings.endpoint),
            headers: build_headers(settings),
            body: serde_json::to_string(payload)?,
            timeout: REQUEST_TIMEOUT,
        };
        let url = request.url.to_string();
        tracing::debug!(
            method = %request.method,
            url = %url,
            attachments = payload.attachments.len(),
            "Dispatching request"
        );

        let res = self.transport.send(request).await?;
        tracing::debug!(status = res.status, url = %url, "Agent responded");

        if !res.is_success() {
            let body = res.body.trim();
            if body.is_empty() {
                bail!("HTTP {status} from {url}", status = res.status);
            }
            bail!("HTTP {status} from {url}: {body}", status = res.status);
        }

        return Ok(normalize(&parse_body(&res.body)));
    }
}
