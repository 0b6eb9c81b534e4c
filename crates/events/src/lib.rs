//! toastd event bus and notification infrastructure.
//!
//! This crate provides the building blocks between the OS probes and the
//! notification surface:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`source`] — kind-filtered subscriptions with idempotent
//!   [`Registration`] release handles.
//! - [`RuleDispatcher`] — evaluates configured rules against delivered
//!   events and pushes qualifying messages to a sink.
//! - [`delivery`] — notification sinks (desktop notifier, structured log).
//! - [`ReceiverRegistry`] — owner-lifecycle-bound registration of rule
//!   dispatchers, with guaranteed release on teardown.

pub mod bus;
pub mod delivery;
pub mod dispatch;
pub mod registry;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bus::EventBus;
pub use delivery::desktop::DesktopNotifier;
pub use delivery::log::LogNotifier;
pub use delivery::{NotificationSink, SinkError};
pub use dispatch::RuleDispatcher;
pub use registry::ReceiverRegistry;
pub use source::{EventHandler, EventSource, Registration};
