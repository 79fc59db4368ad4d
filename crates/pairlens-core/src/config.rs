//! Fetch configuration, read from the environment with explicit overrides.
//!
//! | Variable | Default | Field |
//! |----------|---------|-------|
//! | `PAIRLENS_YAHOO_BASE_URL` | `https://query1.finance.yahoo.com` | [`FetchConfig::base_url`] |
//! | `PAIRLENS_TIMEOUT_MS` | `10000` | [`FetchConfig::timeout_ms`] |
//! | `YAHOO_COOKIE` | unset | [`FetchConfig::cookie`] |

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const BASE_URL_VAR: &str = "PAIRLENS_YAHOO_BASE_URL";
const TIMEOUT_VAR: &str = "PAIRLENS_TIMEOUT_MS";
const COOKIE_VAR: &str = "YAHOO_COOKIE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Sent verbatim as the `cookie` header. Never logged.
    pub cookie: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("pairlens/{}", env!("CARGO_PKG_VERSION")),
            cookie: None,
        }
    }
}

impl FetchConfig {
    /// Defaults overlaid with any recognised environment variables.
    /// Unparseable numeric values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_owned();
        }
        if let Some(timeout_ms) = lookup(TIMEOUT_VAR).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout_ms = timeout_ms;
        }
        config.cookie = lookup(COOKIE_VAR).filter(|v| !v.trim().is_empty());

        config
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}
