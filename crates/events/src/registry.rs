//! Owner-lifecycle-bound receiver registration.
//!
//! [`ReceiverRegistry`] owns the subscriptions a running agent holds on
//! the event source: one [`RuleDispatcher`](crate::dispatch::RuleDispatcher)
//! registration per distinct event kind in the configured rule set.
//! `start` and `stop` mirror the owner's lifecycle; Drop releases
//! everything the registry still holds, so subscriptions never leak
//! regardless of exit path.

use std::collections::BTreeMap;
use std::sync::Arc;

use toastd_core::{EventKind, Rule};

use crate::delivery::NotificationSink;
use crate::dispatch::RuleDispatcher;
use crate::source::{EventHandler, EventSource, Registration};

/// Lifecycle state of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryState {
    Unregistered,
    Registered,
}

/// Manages the registration lifecycle for a configured rule set.
///
/// Invariant: while `Registered`, the registry holds exactly one live
/// [`Registration`] per distinct event kind appearing in the rules.
/// Double start is coalesced (warn + no-op), double stop is a no-op.
pub struct ReceiverRegistry {
    source: Arc<dyn EventSource>,
    handlers: Vec<(EventKind, Arc<dyn EventHandler>)>,
    registrations: Vec<Registration>,
    state: RegistryState,
}

impl ReceiverRegistry {
    /// Build a registry for `rules`, delivering through `sink`.
    ///
    /// Rules are grouped by event kind; each kind gets a single dispatcher
    /// handler covering all of its rules.
    pub fn new(
        source: Arc<dyn EventSource>,
        rules: Vec<Rule>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        // BTreeMap for a deterministic registration order.
        let mut by_kind: BTreeMap<String, (EventKind, Vec<Rule>)> = BTreeMap::new();
        for rule in rules {
            let kind = rule.kind();
            by_kind
                .entry(kind.to_string())
                .or_insert_with(|| (kind, Vec::new()))
                .1
                .push(rule);
        }

        let handlers = by_kind
            .into_values()
            .map(|(kind, rules)| {
                let handler: Arc<dyn EventHandler> =
                    Arc::new(RuleDispatcher::new(rules, sink.clone()));
                (kind, handler)
            })
            .collect();

        Self {
            source,
            handlers,
            registrations: Vec::new(),
            state: RegistryState::Unregistered,
        }
    }

    /// Subscribe every configured kind. Coalesces a double start.
    pub fn start(&mut self) {
        if self.state == RegistryState::Registered {
            tracing::warn!("Registry already started, ignoring duplicate start");
            return;
        }

        for (kind, handler) in &self.handlers {
            tracing::info!(%kind, "Registering receiver");
            self.registrations
                .push(self.source.subscribe(*kind, handler.clone()));
        }
        self.state = RegistryState::Registered;
    }

    /// Release every live registration. A no-op when already stopped.
    pub fn stop(&mut self) {
        if self.state == RegistryState::Unregistered {
            return;
        }

        for registration in self.registrations.drain(..) {
            tracing::info!(kind = %registration.kind(), "Releasing receiver");
            registration.release();
        }
        self.state = RegistryState::Unregistered;
    }

    /// Whether the registry currently holds live registrations.
    pub fn is_registered(&self) -> bool {
        self.state == RegistryState::Registered
    }

    /// Kinds with a live registration, in registration order.
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        self.registrations.iter().map(|r| r.kind()).collect()
    }
}

impl Drop for ReceiverRegistry {
    fn drop(&mut self) {
        // Registrations release themselves on Drop; this only logs when
        // the owner skipped an explicit stop.
        if self.state == RegistryState::Registered {
            tracing::debug!("Registry dropped while registered, releasing receivers");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use toastd_core::default_rules;

    use super::*;
    use crate::bus::EventBus;
    use crate::test_utils::RecordingSink;

    fn registry() -> (ReceiverRegistry, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        let sink = Arc::new(RecordingSink::new());
        let registry = ReceiverRegistry::new(bus.clone(), default_rules(90), sink);
        (registry, bus)
    }

    #[tokio::test]
    async fn start_registers_one_receiver_per_kind() {
        let (mut registry, _bus) = registry();
        assert!(!registry.is_registered());

        registry.start();

        assert!(registry.is_registered());
        let mut kinds = registry.registered_kinds();
        kinds.sort_by_key(|k| k.to_string());
        assert_eq!(kinds, vec![EventKind::BatteryLevel, EventKind::Connectivity]);
    }

    #[tokio::test]
    async fn double_start_is_coalesced() {
        let (mut registry, _bus) = registry();
        registry.start();
        registry.start();

        // Still exactly one registration per kind.
        assert_eq!(registry.registered_kinds().len(), 2);
    }

    #[tokio::test]
    async fn stop_releases_everything() {
        let (mut registry, _bus) = registry();
        registry.start();
        registry.stop();

        assert!(!registry.is_registered());
        assert!(registry.registered_kinds().is_empty());
    }

    #[tokio::test]
    async fn double_stop_is_noop() {
        let (mut registry, _bus) = registry();
        registry.start();
        registry.stop();
        // Must not panic or change anything.
        registry.stop();
        assert!(!registry.is_registered());
    }

    #[tokio::test]
    async fn stop_before_start_is_noop() {
        let (mut registry, _bus) = registry();
        registry.stop();
        assert!(!registry.is_registered());
    }

    #[tokio::test]
    async fn restart_after_stop_registers_again() {
        let (mut registry, _bus) = registry();
        registry.start();
        registry.stop();
        registry.start();
        assert_eq!(registry.registered_kinds().len(), 2);
    }
}
