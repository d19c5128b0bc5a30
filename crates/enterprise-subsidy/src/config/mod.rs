use std::env;
use std::fmt;
use std::time::Duration;

use crate::eligibility::ReasonLinks;

const DEFAULT_LIMITS_URL: &str =
    "https://support.example.com/learner/articles/learner-credit-spend-and-enrollment-limits";
const DEFAULT_DEACTIVATION_URL: &str =
    "https://support.example.com/learner/articles/subscription-license-deactivation";
const DEFAULT_STALE_SECONDS: u64 = 20;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the eligibility engine and its CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub support_links: ReasonLinks,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let limits_learn_more_url =
            support_link("APP_LIMITS_LEARN_MORE_URL", DEFAULT_LIMITS_URL)?;
        let deactivation_learn_more_url =
            support_link("APP_DEACTIVATION_LEARN_MORE_URL", DEFAULT_DEACTIVATION_URL)?;

        let stale_seconds = env::var("APP_QUERY_STALE_SECONDS")
            .unwrap_or_else(|_| DEFAULT_STALE_SECONDS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidStaleSeconds)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            support_links: ReasonLinks {
                limits_learn_more_url,
                deactivation_learn_more_url,
            },
            cache: CacheConfig {
                stale_after: (stale_seconds > 0).then(|| Duration::from_secs(stale_seconds)),
            },
        })
    }
}

fn support_link(var: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidLink {
            var,
            value: trimmed.to_string(),
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Query cache freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub stale_after: Option<Duration>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidStaleSeconds,
    InvalidLink { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStaleSeconds => {
                write!(f, "APP_QUERY_STALE_SECONDS must be a non-negative integer")
            }
            ConfigError::InvalidLink { var, value } => {
                write!(f, "{var} must be an http(s) URL, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
        env::remove_var("APP_LIMITS_LEARN_MORE_URL");
        env::remove_var("APP_DEACTIVATION_LEARN_MORE_URL");
        env::remove_var("APP_QUERY_STALE_SECONDS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.support_links.limits_learn_more_url, DEFAULT_LIMITS_URL);
        assert_eq!(
            config.cache.stale_after,
            Some(Duration::from_secs(DEFAULT_STALE_SECONDS))
        );
    }

    #[test]
    fn zero_stale_seconds_disables_staleness() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_QUERY_STALE_SECONDS", "0");
        env::set_var("APP_ENV", "prod");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.cache.stale_after, None);
        reset_env();
    }

    #[test]
    fn rejects_non_http_support_links() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEACTIVATION_LEARN_MORE_URL", "support/deactivation");
        let err = AppConfig::load().expect_err("relative link rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidLink {
                var: "APP_DEACTIVATION_LEARN_MORE_URL",
                ..
            }
        ));
        reset_env();
    }
}
