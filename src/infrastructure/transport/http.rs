#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::collections::BTreeMap;

use anyhow::anyhow;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use crate::domain::models::AgentRequest;
use crate::domain::models::AgentResponse;
use crate::domain::models::Transport;

/// Later entries replace earlier ones whose names differ only in case.
fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers.iter() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| return anyhow!("invalid header name '{key}'"))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| return anyhow!("invalid value for header '{key}'"))?;
        map.insert(name, value);
    }

    return Ok(map);
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> HttpTransport {
        return HttpTransport {
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[allow(clippy::implicit_return)]
    async fn send(&self, request: AgentRequest) -> Result<AgentResponse> {
        let method = reqwest::Method::from_bytes(request.method.to_string().as_bytes())
            .map_err(|_| return anyhow!("unsupported HTTP method {}", request.method))?;

        let req = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout)
            .headers(header_map(&request.headers)?)
            .body(request.body);

        let res = req.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        tracing::debug!(status, bytes = body.len(), "HTTP response");

        return Ok(AgentResponse { status, body });
    }
}
