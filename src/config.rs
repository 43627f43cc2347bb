//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use time::UtcOffset;

pub const API_URL_VAR: &str = "BRIGADEIRO_API_URL";
pub const UNIT_PRICE_VAR: &str = "BRIGADEIRO_UNIT_PRICE";
pub const PIX_KEY_VAR: &str = "BRIGADEIRO_PIX_KEY";
pub const STORAGE_PATH_VAR: &str = "BRIGADEIRO_STORAGE_PATH";
pub const UTC_OFFSET_VAR: &str = "BRIGADEIRO_UTC_OFFSET_HOURS";
pub const REQUEST_TIMEOUT_VAR: &str = "BRIGADEIRO_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "BRIGADEIRO_CONNECT_TIMEOUT_SECS";

/// Brasília time.
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = -3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const STORAGE_DIR: &str = "brigadeiro";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("no storage location: set BRIGADEIRO_STORAGE_PATH, XDG_STATE_HOME or HOME")]
    NoStorageDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Price of one box, in whole reais.
    pub unit_price: u64,
    pub pix_key: Option<String>,
    /// Key/value store file holding the session token.
    pub storage_path: PathBuf,
    /// Offset order dates are rendered in.
    pub display_offset: UtcOffset,
    pub timeouts: Timeouts,
}

/// Settings that need no backend: pricing and where the session lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub unit_price: u64,
    pub pix_key: Option<String>,
    pub storage_path: PathBuf,
}

impl LocalConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value does not parse or no storage
    /// location can be derived. `BRIGADEIRO_API_URL` is not consulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// # Errors
    ///
    /// Same as [`LocalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = non_blank(lookup);
        let unit_price = parse_or(lookup(UNIT_PRICE_VAR), UNIT_PRICE_VAR, 0_u64)?;
        let pix_key = lookup(PIX_KEY_VAR);
        let storage_path = match lookup(STORAGE_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_storage_path(&lookup)?,
        };
        Ok(Self { unit_price, pix_key, storage_path })
    }
}

impl ClientConfig {
    /// Build typed client config from the process environment.
    ///
    /// Required:
    /// - `BRIGADEIRO_API_URL`
    ///
    /// Optional:
    /// - `BRIGADEIRO_UNIT_PRICE`: default 0
    /// - `BRIGADEIRO_PIX_KEY`: pix key shown on the order screen
    /// - `BRIGADEIRO_STORAGE_PATH`: default `$XDG_STATE_HOME/brigadeiro/storage.json`,
    ///   falling back to `$HOME/.local/state/brigadeiro/storage.json`
    /// - `BRIGADEIRO_UTC_OFFSET_HOURS`: default -3
    /// - `BRIGADEIRO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BRIGADEIRO_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build config from an arbitrary variable lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = non_blank(lookup);

        let api_url = lookup(API_URL_VAR)
            .ok_or(ConfigError::Missing { var: API_URL_VAR })?
            .trim_end_matches('/')
            .to_owned();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid { var: API_URL_VAR, value: api_url });
        }

        let LocalConfig { unit_price, pix_key, storage_path } = LocalConfig::from_lookup(&lookup)?;
        let offset_hours = parse_or(lookup(UTC_OFFSET_VAR), UTC_OFFSET_VAR, DEFAULT_UTC_OFFSET_HOURS)?;
        let display_offset = UtcOffset::from_hms(offset_hours, 0, 0)
            .map_err(|_| ConfigError::Invalid { var: UTC_OFFSET_VAR, value: offset_hours.to_string() })?;
        let timeouts = Timeouts {
            request_secs: parse_or(lookup(REQUEST_TIMEOUT_VAR), REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(lookup(CONNECT_TIMEOUT_VAR), CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_url, unit_price, pix_key, storage_path, display_offset, timeouts })
    }
}

/// Read a process environment variable, treating non-UTF-8 values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn non_blank<F>(lookup: F) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn default_storage_path<F>(lookup: &F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = if let Some(state_home) = lookup("XDG_STATE_HOME") {
        PathBuf::from(state_home)
    } else if let Some(home) = lookup("HOME") {
        PathBuf::from(home).join(".local").join("state")
    } else {
        return Err(ConfigError::NoStorageDir);
    };
    Ok(base.join(STORAGE_DIR).join(STORAGE_FILE))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
