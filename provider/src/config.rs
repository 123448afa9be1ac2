//! Provider configuration using Figment for layered merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled default URL
//! 2. `NETDATA_CLOUD_*` environment variables
//! 3. Explicit provider settings
//!
//! Empty strings count as unset at every layer.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use netdata_core::{NetdataClient, DEFAULT_BASE_URL};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProviderError;

pub const ENV_PREFIX: &str = "NETDATA_CLOUD_";

/// Settings written in the provider block. Both are optional there.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl ProviderSettings {
    fn without_empty(&self) -> Self {
        Self {
            url: non_empty(self.url.clone()),
            auth_token: non_empty(self.auth_token.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    auth_token: Option<String>,
}

/// Resolved configuration.
#[derive(Debug)]
pub struct ProviderConfig {
    pub url: String,
    pub auth_token: SecretString,
}

impl ProviderConfig {
    /// Resolve `settings` against the process environment.
    pub fn load(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::from_figment(env_figment(), settings)
    }

    /// Resolve `settings` on top of an already assembled lower layer.
    pub fn from_figment(base: Figment, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let raw: RawConfig = base
            .merge(Serialized::defaults(settings.without_empty()))
            .extract()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        let url = non_empty(raw.url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let auth_token = non_empty(raw.auth_token).ok_or_else(|| {
            ProviderError::Configuration(format!(
                "missing auth token: set auth_token in the provider block or {ENV_PREFIX}AUTH_TOKEN"
            ))
        })?;

        Ok(Self {
            url,
            auth_token: SecretString::from(auth_token),
        })
    }

    pub fn client(&self) -> NetdataClient {
        NetdataClient::new(&self.url, self.auth_token.expose_secret())
    }
}

/// `NETDATA_CLOUD_URL` and `NETDATA_CLOUD_AUTH_TOKEN`.
pub fn env_figment() -> Figment {
    Figment::new().merge(Env::prefixed(ENV_PREFIX).only(&["url", "auth_token"]))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Environment values that look like numbers or booleans are parsed as such;
/// take them back as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_layer(url: &str, token: &str) -> Figment {
        Figment::new().merge(Serialized::defaults(serde_json::json!({
            "url": url,
            "auth_token": token,
        })))
    }

    fn settings(url: Option<&str>, token: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            url: url.map(str::to_string),
            auth_token: token.map(str::to_string),
        }
    }

    #[test]
    fn explicit_settings_win() {
        let config = ProviderConfig::from_figment(
            env_layer("https://env.example", "env-token"),
            &settings(Some("https://explicit.example"), Some("explicit-token")),
        )
        .unwrap();
        assert_eq!(config.url, "https://explicit.example");
        assert_eq!(config.auth_token.expose_secret(), "explicit-token");
    }

    #[test]
    fn environment_fills_missing_settings() {
        let config = ProviderConfig::from_figment(
            env_layer("https://env.example", "env-token"),
            &settings(None, Some("")),
        )
        .unwrap();
        assert_eq!(config.url, "https://env.example");
        assert_eq!(config.auth_token.expose_secret(), "env-token");
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        let config =
            ProviderConfig::from_figment(env_layer("", "t"), &settings(Some(""), None)).unwrap();
        assert_eq!(config.url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        let err = ProviderConfig::from_figment(Figment::new(), &ProviderSettings::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(ref msg) if msg.contains("AUTH_TOKEN")));
    }

    #[test]
    fn numeric_token_is_kept_as_text() {
        let base = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "auth_token": 12345,
        })));
        let config = ProviderConfig::from_figment(base, &ProviderSettings::default()).unwrap();
        assert_eq!(config.auth_token.expose_secret(), "12345");
    }

    #[test]
    fn debug_output_redacts_token() {
        let config =
            ProviderConfig::from_figment(Figment::new(), &settings(None, Some("super-secret")))
                .unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
        assert_eq!(config.client().base_url(), DEFAULT_BASE_URL);
    }
}
