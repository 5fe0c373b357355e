//! Mock radio adapter for integration tests.
//!
//! Records every driver call so tests can assert on the full command
//! history, and can be told to fail any of them.

use blecast::DriverError;
use blecast::app::broadcaster::Broadcaster;
use blecast::app::events::BroadcastEvent;
use blecast::app::init_guard::RadioInitGuard;
use blecast::app::ports::{EventSink, RadioPort};
use blecast::config::BroadcastSettings;
use blecast::payload::ManufacturerData;

// ── Radio call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Initialize,
    SetPayload(Vec<u8>),
    Begin { interval_ms: u32 },
    End,
}

// ── MockRadio ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    pub fail_init: Option<DriverError>,
    pub fail_payload: Option<DriverError>,
    pub fail_begin: Option<DriverError>,
    pub fail_end: Option<DriverError>,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::Begin { .. }))
            .count()
    }

    pub fn end_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == RadioCall::End).count()
    }

    pub fn init_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == RadioCall::Initialize)
            .count()
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::SetPayload(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RadioPort for MockRadio {
    fn initialize(&mut self) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Initialize);
        self.fail_init.map_or(Ok(()), Err)
    }

    fn set_payload(&mut self, payload: &[u8]) -> Result<(), DriverError> {
        self.calls.push(RadioCall::SetPayload(payload.to_vec()));
        self.fail_payload.map_or(Ok(()), Err)
    }

    fn begin_emitting(&mut self, interval_ms: u32) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Begin { interval_ms });
        self.fail_begin.map_or(Ok(()), Err)
    }

    fn end_emitting(&mut self) -> Result<(), DriverError> {
        self.calls.push(RadioCall::End);
        self.fail_end.map_or(Ok(()), Err)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<BroadcastEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps of every `Emitted` event, in order.
    pub fn emission_times(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BroadcastEvent::Emitted { at_ms, .. } => Some(*at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn driver_faults(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BroadcastEvent::DriverFault(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &BroadcastEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub const PAYLOAD: [u8; 4] = [0xFF, 0xFF, 0x12, 0x34];

pub fn settings(send_count: u32, interval_ms: u32) -> BroadcastSettings {
    BroadcastSettings {
        send_count,
        interval_ms,
        payload: ManufacturerData::from_slice(&PAYLOAD).unwrap(),
    }
}

/// A broadcaster that has been through `setup()` against a fresh guard.
pub fn ready_broadcaster(
    send_count: u32,
    interval_ms: u32,
    start_immediately: bool,
) -> (Broadcaster, MockRadio, RecordingSink) {
    let guard = RadioInitGuard::new();
    let mut b = Broadcaster::new(settings(send_count, interval_ms), start_immediately).unwrap();
    let mut radio = MockRadio::new();
    let mut sink = RecordingSink::new();
    b.setup(&guard, &mut radio, &mut sink).unwrap();
    (b, radio, sink)
}
