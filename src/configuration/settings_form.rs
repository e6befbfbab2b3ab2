#[cfg(test)]
#[path = "settings_form_test.rs"]
mod tests;

use std::collections::BTreeMap;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use serde_json::Value;
use strum::VariantNames;

use super::settings::headers_from_object;
use super::settings::is_truthy;
use super::settings::normalize_endpoint;
use super::HttpMethod;
use super::Settings;
use super::SettingsKey;

pub const EXTRA_HEADERS_ERROR: &str = "Extra headers must be a JSON object.";

const FALSY_TOKENS: [&str; 6] = ["0", "false", "f", "no", "n", "off"];

/// Operator-entered settings, one text field per setting. Nothing is validated
/// until `submit`.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsForm {
    pub base_url: String,
    pub endpoint: String,
    pub method: String,
    pub mock: bool,
    pub api_key: String,
    pub temperature: String,
    pub system_prompt: String,
    pub extra_headers: String,
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> SettingsForm {
        let extra_headers = serde_json::to_string(&settings.extra_headers)
            .unwrap_or_else(|_| return "{}".to_string());

        return SettingsForm {
            base_url: settings.base_url.to_string(),
            endpoint: settings.endpoint.to_string(),
            method: settings.method.to_string(),
            mock: settings.mock,
            api_key: settings.api_key.to_string(),
            temperature: settings.temperature.to_string(),
            system_prompt: settings.system_prompt.to_string(),
            extra_headers,
        };
    }
}

fn parse_toggle(text: &str) -> Result<bool> {
    let lowered = text.trim().to_lowercase();
    if lowered == "on" || is_truthy(&lowered) {
        return Ok(true);
    }
    if FALSY_TOKENS.contains(&lowered.as_str()) {
        return Ok(false);
    }

    bail!("'{text}' is not a valid toggle, use on or off.");
}

fn parse_extra_headers(text: &str) -> Result<BTreeMap<String, String>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(BTreeMap::new());
    }

    let parsed: Value = serde_json::from_str(text).map_err(|_| return anyhow!(EXTRA_HEADERS_ERROR))?;
    return headers_from_object(&parsed).map_err(|_| return anyhow!(EXTRA_HEADERS_ERROR));
}

impl SettingsForm {
    pub fn set(&mut self, key: SettingsKey, value: &str) -> Result<()> {
        match key {
            SettingsKey::BaseUrl => self.base_url = value.to_string(),
            SettingsKey::Endpoint => self.endpoint = value.to_string(),
            SettingsKey::Method => self.method = value.to_string(),
            SettingsKey::Mock => self.mock = parse_toggle(value)?,
            SettingsKey::ApiKey => self.api_key = value.to_string(),
            SettingsKey::Temperature => self.temperature = value.to_string(),
            SettingsKey::ExtraHeaders => self.extra_headers = value.to_string(),
            SettingsKey::SystemPrompt => self.system_prompt = value.to_string(),
        }

        return Ok(());
    }

    /// Validates every field and builds the settings record. Nothing is
    /// returned on error so callers can keep their current settings.
    pub fn submit(&self) -> Result<Settings> {
        let extra_headers = parse_extra_headers(&self.extra_headers)?;

        let method = HttpMethod::parse(&self.method).ok_or_else(|| {
            return anyhow!(
                "Method must be one of {}.",
                HttpMethod::VARIANTS.join(", ")
            );
        })?;

        let temperature = self
            .temperature
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| return (0.0..=1.0).contains(value))
            .ok_or_else(|| return anyhow!("Temperature must be a number between 0 and 1."))?;

        return Ok(Settings {
            base_url: self.base_url.trim().to_string(),
            endpoint: normalize_endpoint(&self.endpoint),
            method,
            mock: self.mock,
            api_key: self.api_key.trim().to_string(),
            temperature,
            extra_headers,
            system_prompt: self.system_prompt.trim().to_string(),
        });
    }
}
