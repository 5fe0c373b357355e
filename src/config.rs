//! Broadcaster configuration parameters
//!
//! The persisted form of the advertising settings. Values can be
//! overridden via NVS (non-volatile storage); the manufacturer data is
//! stored as the hex string an operator typed and decoded at boot.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payload::{MAX_HEX_LEN, ManufacturerData};

/// Upper bound on the emission interval (the BLE maximum of 10.24 s).
pub const MAX_INTERVAL_MS: u32 = 10_240;

/// Core broadcaster configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Emissions before stopping automatically (0 = until stopped)
    pub send_count: u32,
    /// Spacing between emissions (milliseconds)
    pub interval_ms: u32,
    /// Payload as a hex string, two characters per byte
    pub manufacturer_data: heapless::String<MAX_HEX_LEN>,
    /// Start advertising as soon as the radio is up
    pub start_immediately: bool,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        let mut manufacturer_data = heapless::String::new();
        // 0xFFFF is the Bluetooth SIG company ID reserved for testing.
        let _ = manufacturer_data.push_str("FFFF0001");
        Self {
            send_count: 10,
            interval_ms: 1000,
            manufacturer_data,
            start_immediately: true,
        }
    }
}

impl BroadcastConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.interval_ms)
    }

    /// Decode the configured hex string into payload bytes.
    pub fn decode_payload(&self) -> Result<ManufacturerData> {
        Ok(ManufacturerData::from_hex(&self.manufacturer_data)?)
    }

    /// Validate, decode, and split into runtime settings plus the start flag.
    pub fn to_settings(&self) -> Result<(BroadcastSettings, bool)> {
        self.validate()?;
        let settings = BroadcastSettings {
            send_count: self.send_count,
            interval_ms: self.interval_ms,
            payload: self.decode_payload()?,
        };
        Ok((settings, self.start_immediately))
    }
}

/// Build-time overrides, one optional string per field.
///
/// The firmware fills this from `option_env!("BLECAST_*")` so a device can
/// be provisioned at flash time; unset fields keep the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides<'a> {
    pub send_count: Option<&'a str>,
    pub interval_ms: Option<&'a str>,
    pub manufacturer_data: Option<&'a str>,
    pub start_immediately: Option<&'a str>,
}

impl ConfigOverrides<'_> {
    pub fn is_empty(&self) -> bool {
        self.send_count.is_none()
            && self.interval_ms.is_none()
            && self.manufacturer_data.is_none()
            && self.start_immediately.is_none()
    }
}

impl BroadcastConfig {
    /// Apply `overrides` on top of `self`. The result is fully validated,
    /// payload included; `self` is never modified.
    pub fn with_overrides(&self, overrides: &ConfigOverrides<'_>) -> Result<Self> {
        let mut cfg = self.clone();
        if let Some(v) = overrides.send_count {
            cfg.send_count = v
                .trim()
                .parse()
                .map_err(|_| Error::Config("send_count override is not a number"))?;
        }
        if let Some(v) = overrides.interval_ms {
            cfg.interval_ms = v
                .trim()
                .parse()
                .map_err(|_| Error::Config("interval_ms override is not a number"))?;
        }
        if let Some(v) = overrides.manufacturer_data {
            cfg.manufacturer_data.clear();
            cfg.manufacturer_data
                .push_str(v.trim())
                .map_err(|()| Error::Config("manufacturer_data override too long"))?;
        }
        if let Some(v) = overrides.start_immediately {
            cfg.start_immediately = match v.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(Error::Config("start_immediately override must be true/false")),
            };
        }
        cfg.to_settings()?;
        Ok(cfg)
    }
}

/// Range-check an emission interval. Shared by the stored config and the
/// broadcaster's own constructor and mutator.
pub fn validate_interval(interval_ms: u32) -> Result<()> {
    if interval_ms == 0 {
        return Err(Error::Config("interval_ms must be > 0"));
    }
    if interval_ms > MAX_INTERVAL_MS {
        return Err(Error::Config("interval_ms must be <= 10240"));
    }
    Ok(())
}

/// Decoded settings the broadcaster runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastSettings {
    /// 0 = unbounded
    pub send_count: u32,
    pub interval_ms: u32,
    pub payload: ManufacturerData,
}
