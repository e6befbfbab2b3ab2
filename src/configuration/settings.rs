#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::env;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use serde_derive::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use strum::VariantNames;
use tokio::fs;

pub const DEFAULT_CONFIG_FILE: &str = "config/app-config.json";
pub const DEFAULT_ENDPOINT: &str = "/agent/invoke";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional and reliable assistant. Keep answers concise, and cite the uploaded material when it is relevant.";

const TRUTHY_TOKENS: [&str; 5] = ["1", "true", "t", "yes", "y"];
const REDACTED: &str = "********";

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display, Serialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Post,
    Get,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive lookup, so `patch` and `PATCH` both resolve.
    pub fn parse(text: &str) -> Option<HttpMethod> {
        let upper = text.trim().to_uppercase();
        return HttpMethod::iter().find(|e| return e.to_string() == upper);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingsKey {
    BaseUrl,
    Endpoint,
    Method,
    Mock,
    ApiKey,
    Temperature,
    ExtraHeaders,
    SystemPrompt,
}

impl SettingsKey {
    pub fn parse(text: &str) -> Option<SettingsKey> {
        let text = text.trim();
        return SettingsKey::iter().find(|e| return e.to_string() == text);
    }

    /// Key used in the JSON config file.
    pub fn config_name(&self) -> &'static str {
        match self {
            SettingsKey::BaseUrl => return "baseUrl",
            SettingsKey::Endpoint => return "endpoint",
            SettingsKey::Method => return "method",
            SettingsKey::Mock => return "mock",
            SettingsKey::ApiKey => return "apiKey",
            SettingsKey::Temperature => return "temperature",
            SettingsKey::ExtraHeaders => return "extraHeaders",
            SettingsKey::SystemPrompt => return "systemPrompt",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            SettingsKey::BaseUrl => return "AGENT_PORTAL_BASE_URL",
            SettingsKey::Endpoint => return "AGENT_PORTAL_ENDPOINT",
            SettingsKey::Method => return "AGENT_PORTAL_METHOD",
            SettingsKey::Mock => return "AGENT_PORTAL_USE_MOCK",
            SettingsKey::ApiKey => return "AGENT_PORTAL_API_KEY",
            SettingsKey::Temperature => return "AGENT_PORTAL_TEMPERATURE",
            SettingsKey::ExtraHeaders => return "AGENT_PORTAL_EXTRA_HEADERS",
            SettingsKey::SystemPrompt => return "AGENT_PORTAL_SYSTEM_PROMPT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_url: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub mock: bool,
    pub api_key: String,
    pub temperature: f64,
    pub extra_headers: BTreeMap<String, String>,
    pub system_prompt: String,
}

impl Default for Settings {
    fn default() -> Settings {
        return Settings {
            base_url: "".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            method: HttpMethod::default(),
            mock: true,
            api_key: "".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            extra_headers: BTreeMap::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        };
    }
}

/// Outcome of layering defaults, the config file and the environment. Inputs
/// that could not be applied are listed in `warnings`; resolution itself never
/// fails.
#[derive(Debug)]
pub struct Resolution {
    pub settings: Settings,
    pub warnings: Vec<String>,
}

fn record_warning(warnings: &mut Vec<String>, warning: String) {
    tracing::warn!(warning = warning.as_str(), "ignored configuration input");
    warnings.push(warning);
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => return "null",
        Value::Bool(_) => return "a boolean",
        Value::Number(_) => return "a number",
        Value::String(_) => return "a string",
        Value::Array(_) => return "an array",
        Value::Object(_) => return "an object",
    }
}

fn expect_str(value: &Value) -> Result<&str> {
    return value
        .as_str()
        .ok_or_else(|| return anyhow!("expected a string, found {}", json_kind(value)));
}

fn optional_str(value: &Value) -> Result<String> {
    if value.is_null() {
        return Ok("".to_string());
    }

    return Ok(expect_str(value)?.to_string());
}

fn parse_method(text: &str) -> Result<HttpMethod> {
    if let Some(method) = HttpMethod::parse(text) {
        return Ok(method);
    }

    bail!(
        "'{text}' is not a supported method, expected one of {}",
        HttpMethod::VARIANTS.join(", ")
    );
}

fn clamp_temperature(value: f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("temperature must be a finite number");
    }

    return Ok(value.clamp(0.0, 1.0));
}

pub fn is_truthy(text: &str) -> bool {
    return TRUTHY_TOKENS.contains(&text.trim().to_lowercase().as_str());
}

/// Endpoints always start with a slash; a blank endpoint is the root.
pub fn normalize_endpoint(text: &str) -> String {
    let endpoint = text.trim();
    if endpoint.is_empty() {
        return "/".to_string();
    }
    if endpoint.starts_with('/') {
        return endpoint.to_string();
    }

    return format!("/{endpoint}");
}

/// Coerces a JSON object into header pairs. Strings are kept verbatim, other
/// scalars use their JSON text, and `null` entries are dropped.
pub fn headers_from_object(value: &Value) -> Result<BTreeMap<String, String>> {
    let object = value
        .as_object()
        .ok_or_else(|| return anyhow!("expected a JSON object, found {}", json_kind(value)))?;

    let headers = object
        .iter()
        .filter_map(|(key, val)| {
            return match val {
                Value::Null => None,
                Value::String(text) => Some((key.to_string(), text.to_string())),
                other => Some((key.to_string(), other.to_string())),
            };
        })
        .collect::<BTreeMap<String, String>>();

    return Ok(headers);
}

fn headers_from_value(value: &Value) -> Result<BTreeMap<String, String>> {
    if let Some(text) = value.as_str() {
        let parsed: Value = serde_json::from_str(text)?;
        return headers_from_object(&parsed);
    }

    return headers_from_object(value);
}

async fn read_config_document(config_path: &path::Path) -> Result<Option<Map<String, Value>>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(config_path).await?;
    let doc: Value = serde_json::from_str(&text)?;
    match doc {
        Value::Object(map) => return Ok(Some(map)),
        other => bail!("expected a JSON object, found {}", json_kind(&other)),
    }
}

impl Settings {
    pub async fn resolve(config_path: &path::Path) -> Resolution {
        return Settings::resolve_with(config_path, |key| return env::var(key).ok()).await;
    }

    pub async fn resolve_with<F>(config_path: &path::Path, env_lookup: F) -> Resolution
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let mut warnings = vec![];

        match read_config_document(config_path).await {
            Ok(Some(doc)) => {
                settings.overlay_config(&doc, &mut warnings);
            }
            Ok(None) => {
                tracing::debug!(path = ?config_path, "no config file found, using defaults");
            }
            Err(err) => {
                record_warning(
                    &mut warnings,
                    format!(
                        "Config file {} was ignored: {err}",
                        config_path.to_string_lossy()
                    ),
                );
            }
        }

        for key in SettingsKey::iter() {
            if let Some(raw) = env_lookup(key.env_var()) {
                if let Err(err) = settings.apply_env(key, &raw) {
                    record_warning(
                        &mut warnings,
                        format!("Environment variable {} was ignored: {err}", key.env_var()),
                    );
                }
            }
        }

        let redacted = settings.redacted();
        tracing::debug!(
            base_url = redacted.base_url,
            endpoint = redacted.endpoint,
            method = redacted.method.to_string(),
            mock = redacted.mock,
            api_key = redacted.api_key,
            temperature = redacted.temperature,
            "settings"
        );

        return Resolution { settings, warnings };
    }

    fn overlay_config(&mut self, doc: &Map<String, Value>, warnings: &mut Vec<String>) {
        for (name, _) in doc.iter() {
            if !SettingsKey::iter().any(|key| return key.config_name() == name) {
                tracing::debug!(key = name.as_str(), "unknown config key");
            }
        }

        for key in SettingsKey::iter() {
            if let Some(value) = doc.get(key.config_name()) {
                if let Err(err) = self.apply_json(key, value) {
                    record_warning(
                        warnings,
                        format!("Config key '{}' was ignored: {err}", key.config_name()),
                    );
                }
            }
        }
    }

    /// Applies one key from the config document. On error the prior value is
    /// kept.
    pub fn apply_json(&mut self, key: SettingsKey, value: &Value) -> Result<()> {
        match key {
            SettingsKey::BaseUrl => {
                self.base_url = expect_str(value)?.to_string();
            }
            SettingsKey::Endpoint => {
                self.endpoint = normalize_endpoint(expect_str(value)?);
            }
            SettingsKey::Method => {
                self.method = parse_method(expect_str(value)?)?;
            }
            SettingsKey::Mock => {
                self.mock = value
                    .as_bool()
                    .ok_or_else(|| return anyhow!("expected a boolean, found {}", json_kind(value)))?;
            }
            SettingsKey::ApiKey => {
                self.api_key = optional_str(value)?;
            }
            SettingsKey::Temperature => {
                let temperature = value
                    .as_f64()
                    .ok_or_else(|| return anyhow!("expected a number, found {}", json_kind(value)))?;
                self.temperature = clamp_temperature(temperature)?;
            }
            SettingsKey::ExtraHeaders => {
                self.extra_headers = headers_from_value(value)?;
            }
            SettingsKey::SystemPrompt => {
                self.system_prompt = optional_str(value)?;
            }
        }

        return Ok(());
    }

    /// Applies one environment override. On error the prior value is kept.
    pub fn apply_env(&mut self, key: SettingsKey, raw: &str) -> Result<()> {
        match key {
            SettingsKey::Mock => {
                self.mock = is_truthy(raw);
            }
            SettingsKey::Temperature => {
                let temperature = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| return anyhow!("'{raw}' is not a number"))?;
                self.temperature = clamp_temperature(temperature)?;
            }
            SettingsKey::ExtraHeaders => {
                let parsed: Value = serde_json::from_str(raw)?;
                self.extra_headers = headers_from_object(&parsed)?;
            }
            SettingsKey::Method => {
                self.method = parse_method(raw)?;
            }
            SettingsKey::Endpoint => {
                self.endpoint = normalize_endpoint(raw);
            }
            SettingsKey::BaseUrl => {
                self.base_url = raw.to_string();
            }
            SettingsKey::ApiKey => {
                self.api_key = raw.to_string();
            }
            SettingsKey::SystemPrompt => {
                self.system_prompt = raw.to_string();
            }
        }

        return Ok(());
    }

    /// Copy that is safe to print or log.
    pub fn redacted(&self) -> Settings {
        let mut settings = self.clone();
        if !settings.api_key.is_empty() {
            settings.api_key = REDACTED.to_string();
        }

        return settings;
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        return Ok(serde_json::to_string_pretty(self)?);
    }

    pub fn serialize_default() -> Result<String> {
        return Settings::default().to_pretty_json();
    }
}
