use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::HttpMethod;

#[derive(Clone, Debug, PartialEq)]
pub struct AgentRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// JSON encoded payload.
    pub body: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentResponse {
    pub status: u16,
    pub body: String,
}

impl AgentResponse {
    pub fn is_success(&self) -> bool {
        return self.status < 400;
    }
}

#[async_trait]
pub trait Transport {
    /// Sends a single request to the agent, without retries.
    ///
    /// Only network-level failures (unreachable host, timeout, TLS) are
    /// returned as errors. HTTP error statuses come back as a normal
    /// `AgentResponse` so the caller decides how to present them.
    async fn send(&self, request: AgentRequest) -> Result<AgentResponse>;
}

pub type TransportBox = Box<dyn Transport + Send + Sync>;
