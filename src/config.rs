use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{FarmCategory, InvestmentRequest};
use crate::retry::RetryPolicy;
use crate::risk::RiskLevel;
use crate::webhook::{DEFAULT_EXECUTION_MODE, DEFAULT_WEBHOOK_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Webhook
    pub webhook_url: String,
    pub execution_mode: String,

    // Retry schedule
    pub max_retries: u32,
    pub initial_timeout_ms: u64,
    pub max_timeout_ms: u64,
    pub backoff_base_ms: u64,

    // Alerts
    pub slack_webhook_url: Option<String>,
    pub alert_timeout_ms: u64,

    // Persistence
    pub journal_path: Option<String>,

    // Runtime
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            execution_mode: DEFAULT_EXECUTION_MODE.to_string(),
            max_retries: policy.max_retries,
            initial_timeout_ms: policy.initial_timeout.as_millis() as u64,
            max_timeout_ms: policy.max_timeout.as_millis() as u64,
            backoff_base_ms: policy.backoff_base.as_millis() as u64,
            slack_webhook_url: None,
            alert_timeout_ms: 10_000,
            journal_path: None,
            log_json: false,
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|s| s.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) if v == "1" || v == "true" || v == "yes" || v == "y" || v == "on" => true,
        Some(v) if v == "0" || v == "false" || v == "no" || v == "n" || v == "off" => false,
        Some(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|x| x.trim().parse().ok())
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();

        let cfg = Self {
            webhook_url: env_nonempty("WEBHOOK_URL").unwrap_or(d.webhook_url),
            execution_mode: env_nonempty("ADVISOR_EXECUTION_MODE").unwrap_or(d.execution_mode),
            max_retries: env_parse("ADVISOR_MAX_RETRIES").unwrap_or(d.max_retries),
            initial_timeout_ms: env_parse("ADVISOR_INITIAL_TIMEOUT_MS").unwrap_or(d.initial_timeout_ms),
            max_timeout_ms: env_parse("ADVISOR_MAX_TIMEOUT_MS").unwrap_or(d.max_timeout_ms),
            backoff_base_ms: env_parse("ADVISOR_BACKOFF_BASE_MS").unwrap_or(d.backoff_base_ms),
            slack_webhook_url: env_nonempty("SLACK_WEBHOOK_URL"),
            alert_timeout_ms: env_parse("ADVISOR_ALERT_TIMEOUT_MS").unwrap_or(d.alert_timeout_ms),
            journal_path: env_nonempty("ADVISOR_JOURNAL_PATH"),
            log_json: env_bool("LOG_JSON", d.log_json),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_timeout_ms == 0 || self.max_timeout_ms == 0 || self.alert_timeout_ms == 0 {
            return Err(anyhow!("webhook and alert timeouts must be positive"));
        }
        if self.initial_timeout_ms > self.max_timeout_ms {
            return Err(anyhow!(
                "ADVISOR_INITIAL_TIMEOUT_MS ({}) cannot exceed ADVISOR_MAX_TIMEOUT_MS ({})",
                self.initial_timeout_ms,
                self.max_timeout_ms
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_timeout: Duration::from_millis(self.initial_timeout_ms),
            max_timeout: Duration::from_millis(self.max_timeout_ms),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
        }
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_millis(self.alert_timeout_ms)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request for the CLI run, read from `ADVISOR_*` variables.
pub fn request_from_env() -> Result<InvestmentRequest> {
    let chains = env_nonempty("ADVISOR_CHAINS").map(|v| split_list(&v)).unwrap_or_default();

    let mut categories = Vec::new();
    for raw in env_nonempty("ADVISOR_CATEGORIES").map(|v| split_list(&v)).unwrap_or_default() {
        let cat = FarmCategory::parse(&raw).ok_or_else(|| anyhow!("unknown category: {raw}"))?;
        categories.push(cat);
    }

    let risk_raw = env_nonempty("ADVISOR_RISK").unwrap_or_else(|| "medium".to_string());
    let risk = RiskLevel::parse(&risk_raw);
    if risk.is_none() {
        tracing::warn!(risk = %risk_raw, "config.unknown_risk");
    }

    let amount = env_parse::<f64>("ADVISOR_AMOUNT").ok_or_else(|| anyhow!("ADVISOR_AMOUNT is required"))?;
    let months = env_parse::<u32>("ADVISOR_MONTHS").unwrap_or(12);

    Ok(InvestmentRequest::new(chains, categories, risk, amount, months)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_webhook_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.webhook_url, DEFAULT_WEBHOOK_URL);
        assert_eq!(cfg.execution_mode, "test");
        assert_eq!(cfg.retry_policy(), RetryPolicy::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_or_zero_timeouts() {
        let cfg = Config { initial_timeout_ms: 5_000, max_timeout_ms: 1_000, ..Config::default() };
        assert!(cfg.validate().is_err());
        let cfg = Config { initial_timeout_ms: 0, ..Config::default() };
        assert!(cfg.validate().is_err());
        let cfg = Config { alert_timeout_ms: 0, ..Config::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" ethereum, ,base,"), vec!["ethereum", "base"]);
    }
}
