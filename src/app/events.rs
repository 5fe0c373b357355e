//! Outbound broadcaster events.
//!
//! The [`Broadcaster`](super::broadcaster::Broadcaster) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them.

use super::broadcaster::BroadcastState;
use crate::error::DriverError;
use crate::timing::Millis;

/// Structured events emitted by the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    /// `setup()` finished; carries the state it left the broadcaster in.
    Ready(BroadcastState),

    /// Radio bring-up failed; the broadcaster stays inert.
    InitFailed(DriverError),

    /// Advertising was (re)armed.
    Started { send_count: u32, interval_ms: u32 },

    /// One advertisement was emitted. `count` is the bounded counter
    /// (0 in unbounded mode), `total` the lifetime emission count.
    Emitted { count: u32, total: u64, at_ms: Millis },

    /// The target count was reached and advertising stopped.
    Completed { count: u32 },

    /// Advertising was stopped.
    Stopped,

    /// A new payload was registered with the radio.
    PayloadUpdated { len: usize },

    /// A radio call failed; the state machine carried on.
    DriverFault(DriverError),
}
