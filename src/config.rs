use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use log::{info, warn};
use thiserror::Error;

use crate::score::MAX_SUPPORTED;

pub const DEFAULT_VALIDATE_URL: &str = "http://127.0.0.1:3000/validate";
pub const DEFAULT_ROSTER: &str = "roster.json";
pub const DEFAULT_MAX_SCORE: u8 = 2;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings read once from the environment at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shared password the validation service compares against.
    pub password: Option<String>,
    /// Identifier of the spreadsheet script receiving the scores.
    pub script_id: Option<String>,
    pub validate_url: String,
    pub roster_path: PathBuf,
    pub max_score: u8,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            password: None,
            script_id: None,
            validate_url: DEFAULT_VALIDATE_URL.to_string(),
            roster_path: PathBuf::from(DEFAULT_ROSTER),
            max_score: DEFAULT_MAX_SCORE,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, the environment being
    /// the usual one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_score = parsed(&lookup, "FAIRJUDGE_MAX_SCORE", defaults.max_score)?;
        if max_score > MAX_SUPPORTED {
            return Err(ConfigError::Invalid {
                key: "FAIRJUDGE_MAX_SCORE",
                value: max_score.to_string(),
                reason: format!("scores above {MAX_SUPPORTED} cannot be typed"),
            });
        }

        Ok(Self {
            password: secret(&lookup, "FAIRJUDGE_PASSWORD"),
            script_id: secret(&lookup, "FAIRJUDGE_SCRIPT_ID"),
            validate_url: or_default(&lookup, "FAIRJUDGE_VALIDATE_URL", defaults.validate_url),
            roster_path: or_default(&lookup, "FAIRJUDGE_ROSTER", DEFAULT_ROSTER.to_string()).into(),
            max_score,
            port: parsed(&lookup, "FAIRJUDGE_PORT", defaults.port)?,
        })
    }

    /// Endpoint of the spreadsheet script, if one is configured.
    pub fn script_url(&self) -> Option<String> {
        self.script_id
            .as_ref()
            .map(|id| format!("https://script.google.com/macros/s/{id}/exec"))
    }
}

fn secret(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    let value = lookup(key).filter(|value| !value.trim().is_empty());
    if value.is_none() {
        warn!("{key} not set, every attempt depending on it will fail");
    }
    value
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: String) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default
    })
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
