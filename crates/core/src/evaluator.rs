//! Threshold evaluation — pure logic, no I/O.
//!
//! [`evaluate`] maps a rule and an event to a notify decision. Battery
//! rules are level-triggered: every qualifying event fires, not just
//! threshold crossings. Connectivity rules fire on every connected
//! observation. Repeat suppression, when wanted, lives in
//! [`CooldownTracker`](crate::cooldown::CooldownTracker) outside this
//! function.

use crate::event::{Event, EventPayload};
use crate::rule::{Predicate, Rule};

/// Decide whether `rule` fires for `event`.
///
/// Pure and deterministic. A kind mismatch between rule and event never
/// fires, and neither does an unknown battery level.
pub fn evaluate(rule: &Rule, event: &Event) -> bool {
    match (&rule.predicate, &event.payload) {
        (
            Predicate::BatteryLevelAtLeast { threshold },
            EventPayload::BatteryLevelChanged { level },
        ) => level.is_some_and(|l| l >= *threshold),
        (Predicate::ConnectivityOnline, EventPayload::ConnectivityChanged { connected }) => {
            *connected
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::default_rules;

    fn battery_rule() -> Rule {
        default_rules(90).remove(0)
    }

    fn connectivity_rule() -> Rule {
        default_rules(90).remove(1)
    }

    #[test]
    fn fires_at_threshold() {
        assert!(evaluate(&battery_rule(), &Event::battery(Some(90))));
    }

    #[test]
    fn fires_above_threshold() {
        assert!(evaluate(&battery_rule(), &Event::battery(Some(95))));
        assert!(evaluate(&battery_rule(), &Event::battery(Some(100))));
    }

    #[test]
    fn does_not_fire_below_threshold() {
        assert!(!evaluate(&battery_rule(), &Event::battery(Some(89))));
        assert!(!evaluate(&battery_rule(), &Event::battery(Some(0))));
    }

    #[test]
    fn unknown_level_never_fires() {
        assert!(!evaluate(&battery_rule(), &Event::battery(None)));
    }

    #[test]
    fn refires_on_every_qualifying_event() {
        // Level-triggered: two qualifying events in sequence both fire.
        let rule = battery_rule();
        assert!(evaluate(&rule, &Event::battery(Some(90))));
        assert!(evaluate(&rule, &Event::battery(Some(95))));
    }

    #[test]
    fn threshold_zero_fires_for_any_known_level() {
        let rule = Rule {
            predicate: Predicate::BatteryLevelAtLeast { threshold: 0 },
            ..battery_rule()
        };
        assert!(evaluate(&rule, &Event::battery(Some(0))));
        assert!(!evaluate(&rule, &Event::battery(None)));
    }

    #[test]
    fn connectivity_online_fires() {
        assert!(evaluate(&connectivity_rule(), &Event::connectivity(true)));
        // Every connected observation fires, not just transitions.
        assert!(evaluate(&connectivity_rule(), &Event::connectivity(true)));
    }

    #[test]
    fn connectivity_offline_never_fires() {
        assert!(!evaluate(&connectivity_rule(), &Event::connectivity(false)));
    }

    #[test]
    fn kind_mismatch_is_false() {
        assert!(!evaluate(&battery_rule(), &Event::connectivity(true)));
        assert!(!evaluate(&connectivity_rule(), &Event::battery(Some(100))));
    }
}
