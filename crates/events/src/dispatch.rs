//! Rule dispatch: event in, notification out.
//!
//! [`RuleDispatcher`] is the [`EventHandler`] the registry installs per
//! event kind. For each delivered event it evaluates the configured rules,
//! applies the optional per-rule cooldown, and pushes the messages of
//! qualifying rules to the notification sink. Sink failures are logged
//! and swallowed; notification delivery is best-effort and never feeds
//! back into event processing.

use std::sync::Arc;
use std::sync::Mutex;

use chrono::Utc;
use toastd_core::{evaluate, CooldownTracker, Event, Rule};

use crate::delivery::NotificationSink;
use crate::source::EventHandler;

/// Evaluates a set of rules against incoming events and notifies on match.
pub struct RuleDispatcher {
    rules: Vec<Rule>,
    sink: Arc<dyn NotificationSink>,
    cooldown: Mutex<CooldownTracker>,
}

impl RuleDispatcher {
    /// Create a dispatcher for `rules`, delivering through `sink`.
    ///
    /// Rules whose kind differs from the events this dispatcher receives
    /// simply never fire; callers normally group rules by kind first.
    pub fn new(rules: Vec<Rule>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            rules,
            sink,
            cooldown: Mutex::new(CooldownTracker::new()),
        }
    }
}

#[async_trait::async_trait]
impl EventHandler for RuleDispatcher {
    async fn handle(&self, event: Event) {
        for rule in &self.rules {
            if !evaluate(rule, &event) {
                continue;
            }

            // Lock scope kept free of await points.
            let allowed = self
                .cooldown
                .lock()
                .expect("cooldown mutex poisoned")
                .should_fire(rule, Utc::now());
            if !allowed {
                tracing::debug!(rule = %rule.name, "Rule fired but is in cooldown, suppressed");
                continue;
            }

            tracing::info!(rule = %rule.name, kind = %event.kind(), "Rule fired");

            if let Err(e) = self.sink.notify(&rule.message).await {
                tracing::warn!(rule = %rule.name, error = %e, "Notification delivery failed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
