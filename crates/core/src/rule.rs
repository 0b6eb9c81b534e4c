//! Threshold rules: predicates over event data paired with the message
//! shown when they fire.
//!
//! Rules are built once at startup (defaults or a JSON rule set), validated,
//! and immutable for the process lifetime.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::EventKind;

/// Battery threshold (percent) for the built-in battery rule.
pub const DEFAULT_BATTERY_THRESHOLD: u8 = 90;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for rule configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A battery threshold outside `0..=100`.
    #[error("Rule '{name}' has battery threshold {threshold}, must be 0-100")]
    ThresholdOutOfRange { name: String, threshold: u8 },

    /// A rule with an empty name.
    #[error("Rule has an empty name")]
    EmptyName,

    /// A rule with an empty message.
    #[error("Rule '{name}' has an empty message")]
    EmptyMessage { name: String },

    /// Two rules sharing a name.
    #[error("Duplicate rule name: '{0}'")]
    DuplicateName(String),

    /// The rule set could not be parsed from JSON.
    #[error("Invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// The condition part of a rule, tagged by the data it applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// Fires when a known battery level is at or above `threshold` percent.
    BatteryLevelAtLeast { threshold: u8 },

    /// Fires when connectivity is observed as connected.
    ConnectivityOnline,
}

impl Predicate {
    /// The event kind this predicate applies to.
    pub fn kind(&self) -> EventKind {
        match self {
            Predicate::BatteryLevelAtLeast { .. } => EventKind::BatteryLevel,
            Predicate::ConnectivityOnline => EventKind::Connectivity,
        }
    }
}

/// A configured notification rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule name, used in logs and cooldown tracking.
    pub name: String,

    /// The condition that must hold for the rule to fire.
    pub predicate: Predicate,

    /// The message shown when the rule fires.
    pub message: String,

    /// Optional minimum interval between firings, in seconds.
    ///
    /// `None` disables suppression: the rule re-fires on every qualifying
    /// event, not just on threshold crossings.
    #[serde(default)]
    pub cooldown_secs: Option<u64>,
}

impl Rule {
    /// The event kind this rule applies to.
    pub fn kind(&self) -> EventKind {
        self.predicate.kind()
    }

    /// Validate the rule's configuration.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        if self.message.is_empty() {
            return Err(RuleError::EmptyMessage {
                name: self.name.clone(),
            });
        }
        if let Predicate::BatteryLevelAtLeast { threshold } = self.predicate {
            if threshold > 100 {
                return Err(RuleError::ThresholdOutOfRange {
                    name: self.name.clone(),
                    threshold,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rule set construction
// ---------------------------------------------------------------------------

/// The built-in rule set: battery at or above `battery_threshold`, and
/// connectivity coming online.
pub fn default_rules(battery_threshold: u8) -> Vec<Rule> {
    vec![
        Rule {
            name: format!("battery-{battery_threshold}"),
            predicate: Predicate::BatteryLevelAtLeast {
                threshold: battery_threshold,
            },
            message: format!("Battery reached {battery_threshold}%"),
            cooldown_secs: None,
        },
        Rule {
            name: "network-online".to_string(),
            predicate: Predicate::ConnectivityOnline,
            message: "Network connected".to_string(),
            cooldown_secs: None,
        },
    ]
}

/// Parse and validate a rule set from a JSON array.
///
/// Expected shape:
///
/// ```json
/// [{"name": "battery-90",
///   "predicate": {"type": "battery_level_at_least", "threshold": 90},
///   "message": "Battery reached 90%"}]
/// ```
///
/// Every rule is validated and names must be unique.
pub fn rules_from_json(json: &str) -> Result<Vec<Rule>, RuleError> {
    let rules: Vec<Rule> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(rules.len());
    for rule in &rules {
        rule.validate()?;
        if !seen.insert(rule.name.as_str()) {
            return Err(RuleError::DuplicateName(rule.name.clone()));
        }
    }

    Ok(rules)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
