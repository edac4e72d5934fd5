use std::time::Duration;

use thiserror::Error;

use crate::http_client::DEFAULT_USER_AGENT;
use crate::retry::RetryConfig;

pub const DEFAULT_BASE_URL: &str = "https://elite.finviz.com";
pub const DEFAULT_EXPORT_PATH: &str = "/export.ashx";

pub const ENV_API_KEY: &str = "FINVIZ_API_KEY";
pub const ENV_BASE_URL: &str = "FINSCREEN_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "FINSCREEN_TIMEOUT_MS";
pub const ENV_RATE_LIMIT_MS: &str = "FINSCREEN_RATE_LIMIT_MS";
pub const ENV_MAX_RETRIES: &str = "FINSCREEN_MAX_RETRIES";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Connection settings for the screening service.
#[derive(Clone, PartialEq)]
pub struct ScreenerConfig {
    pub base_url: String,
    pub export_path: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    /// Pause taken before every fetch attempt; zero disables it.
    pub rate_limit_delay: Duration,
    pub retry: RetryConfig,
    pub user_agent: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            export_path: String::from(DEFAULT_EXPORT_PATH),
            api_key: None,
            timeout_ms: 30_000,
            rate_limit_delay: Duration::from_secs(1),
            retry: RetryConfig::default(),
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl std::fmt::Debug for ScreenerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenerConfig")
            .field("base_url", &self.base_url)
            .field("export_path", &self.export_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ScreenerConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            let base_url = base_url.trim().trim_end_matches('/');
            if base_url.is_empty() {
                return Err(ConfigError::Empty { var: ENV_BASE_URL });
            }
            config.base_url = base_url.to_owned();
        }
        if let Some(timeout_ms) = read_number(&lookup, ENV_TIMEOUT_MS)? {
            config.timeout_ms = timeout_ms;
        }
        if let Some(delay_ms) = read_number(&lookup, ENV_RATE_LIMIT_MS)? {
            config.rate_limit_delay = Duration::from_millis(delay_ms);
        }
        if let Some(max_retries) = read_number(&lookup, ENV_MAX_RETRIES)? {
            config.retry.max_retries =
                u32::try_from(max_retries).map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_MAX_RETRIES,
                    value: max_retries.to_string(),
                })?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn export_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.export_path)
    }
}

fn read_number<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (String::from(*key), String::from(*value)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_export_endpoint() {
        let config = ScreenerConfig::from_lookup(|_| None).expect("config");

        assert_eq!(config.export_url(), "https://elite.finviz.com/export.ashx");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.rate_limit_delay, Duration::from_secs(1));
        assert_eq!(config.retry.max_attempts(), 3);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = ScreenerConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, " secret "),
            (ENV_BASE_URL, "http://localhost:8080/"),
            (ENV_TIMEOUT_MS, "500"),
            (ENV_RATE_LIMIT_MS, "0"),
            (ENV_MAX_RETRIES, "5"),
        ]))
        .expect("config");

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.export_url(), "http://localhost:8080/export.ashx");
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.rate_limit_delay, Duration::ZERO);
        assert_eq!(config.retry.max_retries, 5);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = ScreenerConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "  ")])).expect("config");

        assert_eq!(config.api_key, None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = ScreenerConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "soon")]))
            .expect_err("must fail");

        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: ENV_TIMEOUT_MS,
                value: String::from("soon"),
            }
        );
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let config = ScreenerConfig::default().with_api_key("top-secret");

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
