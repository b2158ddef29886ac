use serde::Deserialize;
use std::{env, fs, time::Duration};
use thiserror::Error;
use url::Url;

use crate::use_cases::DEFAULT_SUBMIT_TIMEOUT;

// Runtime settings for the portal (backend location, keys, deadlines).

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const SUBMIT_TIMEOUT_MS: &str = "BOOKING_SUBMIT_TIMEOUT_MS";
pub const AUTH_REDIRECT_URL: &str = "AUTH_REDIRECT_URL";
pub const CONFIG_FILE: &str = "PORTAL_CONFIG";

// Deadline for auth and table calls; function calls use the submit timeout.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

// Optional TOML overlay; environment values win over it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    submit_timeout_ms: Option<u64>,
    auth_redirect_url: Option<String>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::File {
            path: CONFIG_FILE.to_string(),
            message: err.to_string(),
        })
    }

    fn read(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::File {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        toml::from_str(&contents).map_err(|err| ConfigError::File {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub supabase_url: Url,
    pub functions_url: Url,
    pub anon_key: String,
    pub submit_timeout: Duration,
    pub auth_redirect_url: Option<String>,
}

impl PortalConfig {
    // Process environment plus the optional file named by `PORTAL_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_FILE) {
            Ok(path) if !path.trim().is_empty() => FileConfig::read(path.trim())?,
            _ => FileConfig::default(),
        };
        Self::resolve(|key| env::var(key).ok(), file)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(lookup, FileConfig::default())
    }

    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        // Blank variables count as unset.
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_url = lookup(SUPABASE_URL)
            .or(file.supabase_url)
            .ok_or(ConfigError::Missing(SUPABASE_URL))?;
        let supabase_url = parse_url(SUPABASE_URL, raw_url.trim())?;
        let functions_url = functions_url(&supabase_url)?;

        let anon_key = lookup(SUPABASE_ANON_KEY)
            .or(file.anon_key)
            .map(|key| key.trim().to_string())
            .ok_or(ConfigError::Missing(SUPABASE_ANON_KEY))?;

        let submit_timeout = match lookup(SUBMIT_TIMEOUT_MS) {
            Some(raw) => Some(parse_millis(&raw)?),
            None => file.submit_timeout_ms,
        };
        let submit_timeout = match submit_timeout {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: SUBMIT_TIMEOUT_MS,
                    message: "must be greater than zero".to_string(),
                });
            }
            Some(millis) => Duration::from_millis(millis),
            None => DEFAULT_SUBMIT_TIMEOUT,
        };

        let auth_redirect_url = match lookup(AUTH_REDIRECT_URL).or(file.auth_redirect_url) {
            Some(raw) => Some(parse_url(AUTH_REDIRECT_URL, raw.trim())?.to_string()),
            None => None,
        };

        Ok(Self {
            supabase_url,
            functions_url,
            anon_key,
            submit_timeout,
            auth_redirect_url,
        })
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|err| ConfigError::Invalid {
        key,
        message: err.to_string(),
    })
}

fn parse_millis(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|err| ConfigError::Invalid {
            key: SUBMIT_TIMEOUT_MS,
            message: err.to_string(),
        })
}

// Hosted projects serve functions from the `functions.` subdomain; other
// hosts (local stacks) serve them under `/functions/v1`.
pub fn functions_url(supabase_url: &Url) -> Result<Url, ConfigError> {
    let raw = supabase_url.as_str();
    let derived = if raw.contains("supabase.co") {
        raw.replacen("supabase.co", "functions.supabase.co", 1)
    } else {
        format!("{}/functions/v1", raw.trim_end_matches('/'))
    };
    parse_url(SUPABASE_URL, &derived)
}
