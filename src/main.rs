//! blecast firmware main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  BleAdvertiser   LogEventSink   NvsAdapter   Esp32Time   │
//! │  (RadioPort)     (EventSink)    (ConfigPort) (clock)     │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │        ┌────────────────────────────────────┐            │
//! │        │   Broadcaster (pure logic)         │            │
//! │        │   setup() once · tick(now) forever │            │
//! │        └────────────────────────────────────┘            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is read from NVS at boot. A device is provisioned by
//! building with any of `BLECAST_SEND_COUNT`, `BLECAST_INTERVAL_MS`,
//! `BLECAST_MANUFACTURER_DATA` or `BLECAST_START_IMMEDIATELY` set; the
//! values are validated, layered over the stored config and saved back.
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use blecast::adapters::ble::BleAdvertiser;
use blecast::adapters::log_sink::LogEventSink;
use blecast::adapters::nvs::NvsAdapter;
use blecast::adapters::time::Esp32TimeAdapter;
use blecast::app::broadcaster::Broadcaster;
use blecast::app::init_guard::BT_RADIO;
use blecast::app::ports::ConfigPort;
use blecast::config::{BroadcastConfig, ConfigOverrides};

/// Main loop period. Shorter than any legal advertising interval.
const LOOP_PERIOD_MS: u64 = 10;

/// Flash-time provisioning, e.g. `BLECAST_MANUFACTURER_DATA=4C000215 cargo build`.
const BUILD_OVERRIDES: ConfigOverrides<'static> = ConfigOverrides {
    send_count: option_env!("BLECAST_SEND_COUNT"),
    interval_ms: option_env!("BLECAST_INTERVAL_MS"),
    manufacturer_data: option_env!("BLECAST_MANUFACTURER_DATA"),
    start_immediately: option_env!("BLECAST_START_IMMEDIATELY"),
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("blecast v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults), then provision ─
    let nvs = NvsAdapter::new()
        .inspect_err(|e| warn!("NVS init failed ({}), running with defaults", e))
        .ok();
    let stored = match nvs.as_ref().map(|n| n.load()) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            BroadcastConfig::default()
        }
        None => BroadcastConfig::default(),
    };
    let config = provision(stored, nvs.as_ref());
    info!(
        "Config: count={} interval={}ms data={} start={}",
        config.send_count, config.interval_ms, config.manufacturer_data, config.start_immediately
    );

    // ── 3. Construct broadcaster (bad payload hex is fatal) ───
    let mut broadcaster = Broadcaster::from_config(&config)?;

    // ── 4. Adapters + radio bring-up ──────────────────────────
    let mut radio = BleAdvertiser::new();
    let mut sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    if let Err(e) = broadcaster.setup(&BT_RADIO, &mut radio, &mut sink) {
        // Not retried this boot; tick() stays a no-op.
        error!("Radio setup failed: {}, broadcaster inert", e);
    }

    info!("System ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        broadcaster.tick(clock.uptime_ms(), &mut radio, &mut sink);
        std::thread::sleep(Duration::from_millis(LOOP_PERIOD_MS));
    }
}

/// Layer the build-time overrides over the stored config and persist the
/// result when it differs. A rejected override keeps the stored config.
fn provision(stored: BroadcastConfig, nvs: Option<&NvsAdapter>) -> BroadcastConfig {
    if BUILD_OVERRIDES.is_empty() {
        return stored;
    }
    let provisioned = match stored.with_overrides(&BUILD_OVERRIDES) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Build-time config override rejected: {}", e);
            return stored;
        }
    };
    if provisioned != stored {
        match nvs.map(|n| n.save(&provisioned)) {
            Some(Ok(())) => info!("Provisioned config written to NVS"),
            Some(Err(e)) => warn!("Provisioned config not persisted: {}", e),
            None => warn!("Provisioned config not persisted: no NVS"),
        }
    }
    provisioned
}
