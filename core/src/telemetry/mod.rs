//! Telemetry for codec runs: byte counters, per-stage timers and immutable snapshots.
//!
//! A codec call fills `TelemetryCounters` and a `TelemetryTimer`, then freezes them
//! into a `TelemetrySnapshot` that is returned next to the result.

pub mod counters;
pub mod snapshot;
pub mod timers;

pub use counters::*;
pub use snapshot::*;
pub use timers::*;
