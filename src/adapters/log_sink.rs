//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing broadcaster events to the ESP-IDF
//! logger (UART / USB-CDC in production), one line per event.

use log::{info, warn};

use crate::app::events::BroadcastEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`BroadcastEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BroadcastEvent) {
        match event {
            BroadcastEvent::Ready(state) => {
                info!("START | state={:?}", state);
            }
            BroadcastEvent::InitFailed(e) => {
                warn!("FAULT | radio init failed: {}", e);
            }
            BroadcastEvent::Started {
                send_count,
                interval_ms,
            } => {
                if *send_count == 0 {
                    info!("STATE | active | count=unbounded interval={}ms", interval_ms);
                } else {
                    info!("STATE | active | count={} interval={}ms", send_count, interval_ms);
                }
            }
            BroadcastEvent::Emitted {
                count,
                total,
                at_ms,
            } => {
                info!("ADV   | #{} (total={}) t={}ms", count, total, at_ms);
            }
            BroadcastEvent::Completed { count } => {
                info!("STATE | target of {} reached", count);
            }
            BroadcastEvent::Stopped => {
                info!("STATE | idle");
            }
            BroadcastEvent::PayloadUpdated { len } => {
                info!("ADV   | payload updated ({} bytes)", len);
            }
            BroadcastEvent::DriverFault(e) => {
                warn!("FAULT | {}", e);
            }
        }
    }
}
