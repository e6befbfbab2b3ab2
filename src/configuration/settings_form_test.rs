use anyhow::Result;

use super::SettingsForm;
use super::EXTRA_HEADERS_ERROR;
use crate::configuration::HttpMethod;
use crate::configuration::Settings;
use crate::configuration::SettingsKey;

#[test]
fn it_round_trips_current_settings() -> Result<()> {
    let settings = Settings::default();
    let form = SettingsForm::from(&settings);

    assert_eq!(form.extra_headers, "{}");
    assert_eq!(form.method, "POST");
    assert_eq!(form.submit()?, settings);

    return Ok(());
}

#[test]
fn it_trims_and_normalizes_fields() -> Result<()> {
    let mut form = SettingsForm::from(&Settings::default());
    form.set(SettingsKey::BaseUrl, "  http://x.test/  ")?;
    form.set(SettingsKey::Endpoint, "   ")?;
    form.set(SettingsKey::Method, "put")?;
    form.set(SettingsKey::ApiKey, " sk-1 ")?;
    form.set(SettingsKey::SystemPrompt, "  Be brief.  ")?;
    form.set(SettingsKey::Temperature, "0.2")?;

    let settings = form.submit()?;

    assert_eq!(settings.base_url, "http://x.test/");
    assert_eq!(settings.endpoint, "/");
    assert_eq!(settings.method, HttpMethod::Put);
    assert_eq!(settings.api_key, "sk-1");
    assert_eq!(settings.system_prompt, "Be brief.");
    assert_eq!(settings.temperature, 0.2);

    return Ok(());
}

#[test]
fn it_parses_mock_toggles() -> Result<()> {
    let mut form = SettingsForm::from(&Settings::default());

    form.set(SettingsKey::Mock, "off")?;
    assert!(!form.mock);
    form.set(SettingsKey::Mock, "on")?;
    assert!(form.mock);
    form.set(SettingsKey::Mock, "No")?;
    assert!(!form.mock);

    assert!(form.set(SettingsKey::Mock, "sometimes").is_err());
    assert!(!form.mock);

    return Ok(());
}

#[test]
fn it_accepts_blank_extra_headers() -> Result<()> {
    let mut form = SettingsForm::from(&Settings::default());
    form.set(SettingsKey::ExtraHeaders, "  ")?;

    assert!(form.submit()?.extra_headers.is_empty());

    return Ok(());
}

#[test]
fn it_coerces_extra_header_values() -> Result<()> {
    let mut form = SettingsForm::from(&Settings::default());
    form.set(SettingsKey::ExtraHeaders, r#"{"X-Count": 2, "X-Name": "a b", "X-Gone": null}"#)?;

    let settings = form.submit()?;

    assert_eq!(settings.extra_headers.len(), 2);
    assert_eq!(settings.extra_headers.get("X-Count"), Some(&"2".to_string()));
    assert_eq!(settings.extra_headers.get("X-Name"), Some(&"a b".to_string()));

    return Ok(());
}

#[test]
fn it_rejects_extra_headers_that_are_not_objects() -> Result<()> {
    for raw in ["[1, 2]", "{ broken", "\"X-A: b\"", "42"] {
        let mut form = SettingsForm::from(&Settings::default());
        form.set(SettingsKey::ExtraHeaders, raw)?;

        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), EXTRA_HEADERS_ERROR);
    }

    return Ok(());
}

#[test]
fn it_rejects_unknown_methods() -> Result<()> {
    let mut form = SettingsForm::from(&Settings::default());
    form.set(SettingsKey::Method, "TRACE")?;

    let err = form.submit().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Method must be one of POST, GET, PUT, PATCH, DELETE.");

    return Ok(());
}

#[test]
fn it_rejects_out_of_range_temperatures() -> Result<()> {
    for raw in ["1.2", "-0.1", "warm", ""] {
        let mut form = SettingsForm::from(&Settings::default());
        form.set(SettingsKey::Temperature, raw)?;
        assert!(form.submit().is_err(), "{raw} should be rejected");
    }

    return Ok(());
}
