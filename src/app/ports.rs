//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Broadcaster (domain)
//! ```
//!
//! Driven adapters (radio, event sinks, config storage) implement these
//! traits. The [`Broadcaster`](super::broadcaster::Broadcaster) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::config::BroadcastConfig;
use crate::error::DriverError;

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → BLE controller)
// ───────────────────────────────────────────────────────────────

/// The radio the broadcaster emits through.
///
/// Advertisement parameters other than the interval are fixed by the
/// implementation: non-connectable undirected, public address, all
/// channels, no filtering.
pub trait RadioPort {
    /// Bring the radio stack up. Must be idempotent.
    fn initialize(&mut self) -> Result<(), DriverError>;

    /// Register (or replace) the manufacturer-data payload.
    /// The implementation enforces its own length limit.
    fn set_payload(&mut self, payload: &[u8]) -> Result<(), DriverError>;

    /// Trigger one advertisement event at the given interval.
    fn begin_emitting(&mut self, interval_ms: u32) -> Result<(), DriverError>;

    /// Halt advertising. Calling while already stopped is not an error.
    fn end_emitting(&mut self) -> Result<(), DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured
/// [`BroadcastEvent`](super::events::BroadcastEvent)s through this port.
/// Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::BroadcastEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists broadcaster configuration.
///
/// Implementations MUST validate before persisting. Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`BroadcastConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<BroadcastConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &BroadcastConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
