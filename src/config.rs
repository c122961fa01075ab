//! Environment configuration. `.env` is loaded by `main` before this runs.

use crate::consts::env_keys;
use reqwest::Url;
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found")] Missing(&'static str),
    #[error("{key} is not a valid URL: {value}")] InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bot_token = require(env_keys::BOT_TOKEN)?;
        let api_url = require(env_keys::API_URL)?;
        if Url::parse(&api_url).is_err() {
            return Err(ConfigError::InvalidUrl { key: env_keys::API_URL, value: api_url });
        }

        Ok(Self { bot_token, api_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn reads_both_keys() {
        let env = vars(&[
            ("TELOXIDE_TOKEN", "123:abc"),
            ("TRANSLATOR_API_URL", "https://api.mymemory.translated.net/get"),
        ]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.api_url, "https://api.mymemory.translated.net/get");
    }

    #[test]
    fn missing_api_url_is_an_error() {
        let env = vars(&[("TELOXIDE_TOKEN", "123:abc"), ("TRANSLATOR_API_URL", "  ")]);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TRANSLATOR_API_URL")));
    }

    #[test]
    fn invalid_api_url_is_an_error() {
        let env = vars(&[("TELOXIDE_TOKEN", "t"), ("TRANSLATOR_API_URL", "not a url")]);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
