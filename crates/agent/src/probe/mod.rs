//! OS state probes.
//!
//! Each probe polls one piece of host state on an interval and publishes
//! a typed [`Event`](toastd_core::Event) to the bus when the observed
//! value changes. The first observation counts as a change, so current
//! state is announced once at startup.
//!
//! Reads go through the Linux sysfs tree; the root path is injectable so
//! tests can point a probe at a fake tree.

pub mod battery;
pub mod connectivity;

pub use battery::BatteryProbe;
pub use connectivity::ConnectivityProbe;
