// Generation relay configuration and credentials
//
// The relay token is read from the environment only. It is never written to
// settings.json.

use std::env;

use crate::settings::Settings;

/// Environment variable holding the relay bearer token
pub const RELAY_KEY_ENV: &str = "TASKGRID_RELAY_KEY";

/// Source of the relay token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Token retrieved from environment variable
    Environment,
    /// No token found; requests go out unauthenticated
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of token lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

fn lookup_env(name: &str) -> KeyLookup {
    match env::var(name) {
        Ok(key) if !key.trim().is_empty() => KeyLookup {
            key: Some(key.trim().to_string()),
            source: KeySource::Environment,
        },
        _ => KeyLookup {
            key: None,
            source: KeySource::None,
        },
    }
}

/// Get the relay bearer token, if one is configured
pub fn get_relay_key() -> KeyLookup {
    lookup_env(RELAY_KEY_ENV)
}

/// Everything a relay client needs, resolved from settings and environment
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
    pub key_source: KeySource,
}

impl RelayConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let lookup = get_relay_key();
        Self {
            endpoint: settings.generation_endpoint.trim().to_string(),
            model: settings.generation_model.clone(),
            max_tokens: settings.generation_max_tokens,
            timeout_secs: settings.generation_timeout_secs,
            api_key: lookup.key,
            key_source: lookup.source,
        }
    }

    /// Load settings and resolve in one call
    pub fn load() -> Self {
        Self::from_settings(&Settings::load())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.model.is_empty()
    }
}
