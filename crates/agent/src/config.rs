//! Agent configuration loaded from environment variables.
//!
//! All fields have defaults suitable for local use. The rule set defaults
//! to the built-in battery + connectivity rules; `RULES_JSON` replaces it
//! wholesale.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use toastd_core::rule::DEFAULT_BATTERY_THRESHOLD;
use toastd_core::{default_rules, rules_from_json, Rule};

/// Where notifications are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyBackend {
    /// Desktop notifications via `notify-send`.
    Desktop,
    /// Structured log lines (headless hosts).
    Log,
}

impl fmt::Display for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyBackend::Desktop => f.write_str("desktop"),
            NotifyBackend::Log => f.write_str("log"),
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Interval between battery probe reads.
    pub battery_poll: Duration,
    /// Interval between connectivity probe reads.
    pub connectivity_poll: Duration,
    /// Notification delivery backend.
    pub notify_backend: NotifyBackend,
    /// Notifier binary used by the desktop backend.
    pub notify_send_bin: String,
    /// The validated rule set, immutable for the process lifetime.
    pub rules: Vec<Rule>,
}

impl AgentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default       |
    /// |--------------------------|---------------|
    /// | `BATTERY_THRESHOLD`      | `90`          |
    /// | `BATTERY_POLL_SECS`      | `30`          |
    /// | `CONNECTIVITY_POLL_SECS` | `5`           |
    /// | `NOTIFY_BACKEND`         | `desktop`     |
    /// | `NOTIFY_SEND_BIN`        | `notify-send` |
    /// | `RULES_JSON`             | --            |
    pub fn from_env() -> anyhow::Result<Self> {
        let battery_threshold: u8 = env_parse("BATTERY_THRESHOLD", DEFAULT_BATTERY_THRESHOLD)?;
        let battery_poll_secs: u64 = env_parse("BATTERY_POLL_SECS", 30)?;
        let connectivity_poll_secs: u64 = env_parse("CONNECTIVITY_POLL_SECS", 5)?;

        let notify_backend = match std::env::var("NOTIFY_BACKEND") {
            Ok(value) => match value.as_str() {
                "desktop" => NotifyBackend::Desktop,
                "log" => NotifyBackend::Log,
                other => anyhow::bail!("NOTIFY_BACKEND must be 'desktop' or 'log', got '{other}'"),
            },
            Err(_) => NotifyBackend::Desktop,
        };

        let notify_send_bin =
            std::env::var("NOTIFY_SEND_BIN").unwrap_or_else(|_| "notify-send".into());

        let rules = match std::env::var("RULES_JSON") {
            Ok(json) => rules_from_json(&json).context("Invalid RULES_JSON")?,
            Err(_) => default_rules(battery_threshold),
        };
        for rule in &rules {
            rule.validate()
                .with_context(|| format!("Invalid rule '{}'", rule.name))?;
        }

        Ok(Self {
            battery_poll: Duration::from_secs(battery_poll_secs),
            connectivity_poll: Duration::from_secs(connectivity_poll_secs),
            notify_backend,
            notify_send_bin,
            rules,
        })
    }
}

/// Read and parse an environment variable, falling back to `default`
/// when unset.
fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} must be a valid number: {e}")),
        Err(_) => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
