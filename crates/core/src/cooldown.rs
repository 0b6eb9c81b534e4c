//! Per-rule notification cooldown tracking.
//!
//! The evaluator itself is level-triggered: a rule fires on every
//! qualifying event. [`CooldownTracker`] sits outside the evaluator and
//! suppresses repeat firings of the same rule within its configured
//! `cooldown_secs` window. Rules without a cooldown are never suppressed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::rule::Rule;

/// Tracks when each rule last fired to suppress repeats within the
/// rule's cooldown window.
///
/// The tracker is updated in place so the caller can hold it across
/// evaluations (e.g. behind a `Mutex` in a dispatcher).
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_fired: HashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    /// Create a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `rule` is allowed to fire at `now` and record the
    /// firing if so.
    ///
    /// Rules with `cooldown_secs: None` always fire and are not recorded.
    pub fn should_fire(&mut self, rule: &Rule, now: DateTime<Utc>) -> bool {
        let Some(secs) = rule.cooldown_secs else {
            return true;
        };

        if let Some(last) = self.last_fired.get(&rule.name) {
            if now.signed_duration_since(*last) < chrono::Duration::seconds(secs as i64) {
                return false;
            }
        }

        self.last_fired.insert(rule.name.clone(), now);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
