//! Pure domain logic for toastd — no I/O.
//!
//! - [`event`] — typed events describing observed host state changes.
//! - [`rule`] — threshold rules and rule-set construction/validation.
//! - [`evaluator`] — the pure rule/event notify decision.
//! - [`cooldown`] — optional repeat-notification suppression.

pub mod cooldown;
pub mod evaluator;
pub mod event;
pub mod rule;

pub use cooldown::CooldownTracker;
pub use evaluator::evaluate;
pub use event::{Event, EventKind, EventPayload};
pub use rule::{default_rules, rules_from_json, Predicate, Rule, RuleError};
