//! Service configuration.
//!
//! Defaults suit the live agency website. Every setting can be
//! overridden programmatically with the `with_*` methods or from `BOM_*`
//! environment variables via [`ServiceConfig::from_env`].

use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, MAX_TTL};
use crate::endpoints::DEFAULT_BASE_URL;
use crate::http::{ClientConfig, RetryPolicy};

/// Errors reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for [`WeatherService`](crate::service::WeatherService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root of the agency website.
    pub base_url: String,

    /// HTTP timeout and request spacing.
    pub client: ClientConfig,

    /// Result cache settings.
    pub cache: CacheConfig,

    /// Fail with `NoMatchingGroup` instead of searching the first letter
    /// group when no group covers the location.
    pub strict_letter_groups: bool,

    /// Retry budget for index and letter-group pages.
    pub navigation_retry: RetryPolicy,

    /// Retry budget for monthly CSV downloads.
    pub csv_retry: RetryPolicy,
}

impl ServiceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Enable or disable caching, keeping the other cache settings.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    pub fn with_strict_letter_groups(mut self, strict: bool) -> Self {
        self.strict_letter_groups = strict;
        self
    }

    pub fn with_retry(mut self, navigation: RetryPolicy, csv: RetryPolicy) -> Self {
        self.navigation_retry = navigation;
        self.csv_retry = csv;
        self
    }

    /// Defaults overridden by any `BOM_*` variables set in the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `BOM_*`
    /// variable name.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("BOM_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(enabled) = parse_var(&lookup, "BOM_CACHE_ENABLED", parse_bool)? {
            config.cache.enabled = enabled;
        }
        if let Some(ttl) = parse_var(&lookup, "BOM_CACHE_TTL_HOURS", parse_ttl_hours)? {
            config.cache.ttl = ttl;
        }
        if let Some(max) = parse_var(&lookup, "BOM_CACHE_MAX_ENTRIES", parse_number::<u64>)? {
            config.cache.max_capacity = max;
        }
        if let Some(secs) = parse_var(&lookup, "BOM_TIMEOUT_SECS", parse_number::<u64>)? {
            config.client.timeout_secs = secs;
        }

        let min_delay = parse_var(&lookup, "BOM_MIN_DELAY_SECS", parse_secs)?;
        let max_delay = parse_var(&lookup, "BOM_MAX_DELAY_SECS", parse_secs)?;
        if min_delay.is_some() || max_delay.is_some() {
            let min = min_delay.unwrap_or(config.client.min_delay);
            let max = max_delay.unwrap_or(config.client.max_delay);
            config.client = config.client.with_delay(min, max);
        }

        if let Some(strict) = parse_var(&lookup, "BOM_STRICT_LETTER_GROUPS", parse_bool)? {
            config.strict_letter_groups = strict;
        }

        Ok(config)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: ClientConfig::default(),
            cache: CacheConfig::default(),
            strict_letter_groups: false,
            navigation_retry: RetryPolicy::navigation(),
            csv_retry: RetryPolicy::monthly_csv(),
        }
    }
}

fn parse_var<L, T>(
    lookup: &L,
    var: &'static str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    parse(value.trim())
        .map(Some)
        .map_err(|reason| ConfigError::Invalid { var, value, reason })
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_number<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse().map_err(|e: T::Err| e.to_string())
}

fn parse_ttl_hours(s: &str) -> Result<Duration, String> {
    let max_hours = MAX_TTL.as_secs() / 3600;
    let hours: u64 = parse_number(s)?;
    if hours > max_hours {
        return Err(format!("must be at most {max_hours} hours"));
    }
    Ok(Duration::from_secs(hours * 3600))
}

fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
