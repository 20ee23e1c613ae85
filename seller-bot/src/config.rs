use anyhow::{Context as _, anyhow, bail};
use parts_api::{ApiConfig, Credentials, Party, config::DEFAULT_BASE_URL};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logging for development
    Pretty,
    /// Structured JSON logging for production
    Json,
}

/// Startup configuration, read from the environment
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub api: ApiConfig,
    pub credentials: Credentials,
    pub bind_addr: String,
    pub log_format: LogFormat,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} not set", key));
        let seconds = |key: &str, default: u64| -> anyhow::Result<Duration> {
            let Some(value) = lookup(key) else {
                return Ok(Duration::from_secs(default));
            };
            let secs = value
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of seconds", key))?;
            if secs == 0 {
                bail!("{} must be at least one second", key);
            }
            Ok(Duration::from_secs(secs))
        };

        let api = ApiConfig::new(
            lookup("PARTSTECH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )
        .with_timeout(seconds("PARTSTECH_TIMEOUT_SECS", 10)?)
        .with_default_token_ttl(seconds("PARTSTECH_TOKEN_TTL_SECS", 3600)?);

        let credentials = Credentials::new(
            Party::new(
                required("PARTSTECH_PARTNER_ID")?,
                required("PARTSTECH_PARTNER_KEY")?,
            ),
            Party::new(
                required("PARTSTECH_USER_ID")?,
                required("PARTSTECH_USER_KEY")?,
            ),
        );

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            api,
            credentials,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            log_format,
        })
    }
}
