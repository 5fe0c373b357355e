//! Broadcaster: the count-bounded advertising controller.
//!
//! [`Broadcaster`] owns the advertising settings and runtime state and
//! decides, on every host tick, whether to emit one advertisement and
//! whether the target count has been reached. All I/O flows through port
//! traits injected at call sites, so the whole state machine runs against
//! mock adapters on the host.
//!
//! ```text
//!                ┌────────────────────────────┐
//!   tick(now) ──▶│        Broadcaster         │──▶ RadioPort
//!                │ enabled · count · last_tx  │──▶ EventSink
//!                └────────────────────────────┘
//!
//!   Uninitialized ──setup()──▶ Idle ⇄ Active ──(count reached)──▶ Idle
//! ```

use log::{error, info, warn};

use crate::config::{BroadcastConfig, BroadcastSettings, validate_interval};
use crate::error::{Error, Result};
use crate::payload::ManufacturerData;
use crate::timing::{IntervalTimer, Millis};

use super::events::BroadcastEvent;
use super::init_guard::RadioInitGuard;
use super::ports::{EventSink, RadioPort};

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    /// `setup()` has not succeeded; the radio is never touched.
    Uninitialized,
    /// Radio up, not advertising.
    Idle,
    /// Radio up, emitting on every elapsed interval.
    Active,
}

// ───────────────────────────────────────────────────────────────
// Broadcaster
// ───────────────────────────────────────────────────────────────

/// Count-bounded advertising controller: one per radio, driven by `tick`.
pub struct Broadcaster {
    settings: BroadcastSettings,
    start_immediately: bool,
    initialised: bool,
    enabled: bool,
    /// Emissions since the last (re)start; only advanced in bounded mode.
    emitted: u32,
    /// Lifetime emissions, for diagnostics.
    total: u64,
    timer: IntervalTimer,
}

impl Broadcaster {
    /// Construct from decoded settings. Does **not** touch the radio;
    /// call [`setup`](Self::setup) next.
    pub fn new(settings: BroadcastSettings, start_immediately: bool) -> Result<Self> {
        validate_interval(settings.interval_ms)?;
        Ok(Self {
            settings,
            start_immediately,
            initialised: false,
            enabled: false,
            emitted: 0,
            total: 0,
            timer: IntervalTimer::new(),
        })
    }

    /// Validate and decode a stored configuration, then construct.
    ///
    /// A malformed payload string fails here, before any broadcaster exists.
    pub fn from_config(config: &BroadcastConfig) -> Result<Self> {
        let (settings, start_immediately) = config.to_settings()?;
        Self::new(settings, start_immediately)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time radio bring-up and payload registration.
    ///
    /// The radio itself is initialised at most once per process through
    /// `guard`; a second broadcaster sharing the radio skips straight to
    /// payload registration. On failure the broadcaster stays
    /// [`BroadcastState::Uninitialized`] and is not retried.
    pub fn setup(
        &mut self,
        guard: &RadioInitGuard,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.initialised {
            warn!("Broadcaster: setup() called twice, ignoring");
            return Ok(());
        }

        match guard.ensure(|| radio.initialize()) {
            Ok(true) => info!("Broadcaster: radio initialised"),
            Ok(false) => info!("Broadcaster: radio already initialised, sharing it"),
            Err(e) => {
                error!("Broadcaster: radio init failed: {}", e);
                sink.emit(&BroadcastEvent::InitFailed(e));
                return Err(Error::HardwareInit(e));
            }
        }
        self.initialised = true;

        self.push_payload(radio, sink);
        if self.start_immediately {
            self.start_advertising(sink);
        }

        sink.emit(&BroadcastEvent::Ready(self.state()));
        info!("Broadcaster: ready in {:?}", self.state());
        Ok(())
    }

    /// Arm advertising: zero the counter and clear the last-emission
    /// baseline so the next tick emits immediately.
    ///
    /// Calling while already active restarts the count. The radio is not
    /// touched until that tick.
    pub fn start_advertising(&mut self, sink: &mut impl EventSink) {
        if !self.initialised {
            warn!("Broadcaster: start requested before setup, ignoring");
            return;
        }
        self.emitted = 0;
        self.timer.reset();
        self.enabled = true;
        info!(
            "Broadcaster: advertising armed (count={}, interval={}ms)",
            self.settings.send_count, self.settings.interval_ms
        );
        sink.emit(&BroadcastEvent::Started {
            send_count: self.settings.send_count,
            interval_ms: self.settings.interval_ms,
        });
    }

    /// Disable emission and halt the radio. Safe to call when idle.
    pub fn stop_advertising(&mut self, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        self.enabled = false;
        if self.initialised {
            if let Err(e) = radio.end_emitting() {
                warn!("Broadcaster: stop failed: {}", e);
                sink.emit(&BroadcastEvent::DriverFault(e));
            }
        }
        info!("Broadcaster: advertising stopped");
        sink.emit(&BroadcastEvent::Stopped);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Emit one advertisement if an interval has elapsed and the target
    /// count has not been reached.
    ///
    /// `now` must be monotonically non-decreasing; any call cadence is
    /// fine, including faster than the interval.
    pub fn tick(&mut self, now: Millis, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        if !self.initialised || !self.enabled {
            return;
        }
        let target = self.settings.send_count;
        if target != 0 && self.emitted >= target {
            // Target was lowered below progress mid-run.
            info!("Broadcaster: target {} already met ({} sent), stopping", target, self.emitted);
            self.stop_advertising(radio, sink);
            return;
        }
        if !self.timer.is_due(now, self.settings.interval_ms) {
            return;
        }

        // A rejected emission still advances the counters.
        if let Err(e) = radio.begin_emitting(self.settings.interval_ms) {
            warn!("Broadcaster: emit failed: {}", e);
            sink.emit(&BroadcastEvent::DriverFault(e));
        }
        self.timer.mark(now);
        self.total = self.total.saturating_add(1);
        if target != 0 {
            self.emitted += 1;
        }
        sink.emit(&BroadcastEvent::Emitted {
            count: self.emitted,
            total: self.total,
            at_ms: now,
        });

        if target != 0 && self.emitted >= target {
            info!("Broadcaster: sent {} of {}, stopping", self.emitted, target);
            sink.emit(&BroadcastEvent::Completed {
                count: self.emitted,
            });
            self.stop_advertising(radio, sink);
        }
    }

    // ── Configuration mutators ────────────────────────────────

    /// Change the target count (0 = unbounded). Applies from the next tick.
    pub fn set_target_count(&mut self, count: u32) {
        self.settings.send_count = count;
        info!("Broadcaster: send count set to {}", count);
    }

    /// Change the emission interval. Applies from the next tick.
    pub fn set_interval(&mut self, interval_ms: u32) -> Result<()> {
        validate_interval(interval_ms)?;
        self.settings.interval_ms = interval_ms;
        info!("Broadcaster: interval set to {}ms", interval_ms);
        Ok(())
    }

    /// Replace the payload. Once the radio is up the new bytes are
    /// registered immediately, before any further emission.
    pub fn set_payload(
        &mut self,
        payload: ManufacturerData,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) {
        self.settings.payload = payload;
        if self.initialised {
            self.push_payload(radio, sink);
        }
    }

    /// Hot-reload a whole configuration. Nothing changes if it fails to
    /// validate or decode.
    pub fn apply_config(
        &mut self,
        config: &BroadcastConfig,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let (settings, start_immediately) = config.to_settings()?;
        self.set_target_count(settings.send_count);
        self.set_interval(settings.interval_ms)?;
        if settings.payload != self.settings.payload {
            self.set_payload(settings.payload, radio, sink);
        }
        self.start_immediately = start_immediately;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> BroadcastState {
        match (self.initialised, self.enabled) {
            (false, _) => BroadcastState::Uninitialized,
            (true, false) => BroadcastState::Idle,
            (true, true) => BroadcastState::Active,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emissions since the last start (bounded mode only).
    pub fn emitted_count(&self) -> u32 {
        self.emitted
    }

    /// Emissions since construction, in any mode.
    pub fn total_emissions(&self) -> u64 {
        self.total
    }

    pub fn last_emission_ms(&self) -> Option<Millis> {
        self.timer.last()
    }

    pub fn settings(&self) -> &BroadcastSettings {
        &self.settings
    }

    // ── Internal ──────────────────────────────────────────────

    fn push_payload(&self, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        let payload = self.settings.payload.as_bytes();
        match radio.set_payload(payload) {
            Ok(()) => {
                info!("Broadcaster: payload {} ({} bytes)", self.settings.payload, payload.len());
                sink.emit(&BroadcastEvent::PayloadUpdated { len: payload.len() });
            }
            Err(e) => {
                warn!("Broadcaster: payload rejected: {}", e);
                sink.emit(&BroadcastEvent::DriverFault(e));
            }
        }
    }
}
