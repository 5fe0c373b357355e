//! BLE advertiser adapter.
//!
//! Implements [`RadioPort`] on top of the Bluedroid GAP API: the payload
//! becomes a Manufacturer Specific Data element in a legacy,
//! non-connectable advertisement.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_ble_gap_*` calls via `esp_idf_svc::sys`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Advertisement layout
//!
//! | Offset | Field                                        |
//! |--------|----------------------------------------------|
//! | 0..3   | Flags AD: `02 01 06` (LE general, no BR/EDR) |
//! | 3      | length = payload + 1                         |
//! | 4      | AD type `0xFF` (manufacturer specific)       |
//! | 5..    | payload bytes, unmodified                    |

use log::info;

use crate::app::ports::RadioPort;
use crate::error::DriverError;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

/// Legacy advertising data limit.
pub const MAX_ADV_DATA_LEN: usize = 31;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;
/// LE General Discoverable | BR/EDR Not Supported.
const ADV_FLAGS: u8 = 0x06;
const FLAGS_AD_LEN: usize = 3;
const AD_HEADER_LEN: usize = 2;

/// Largest payload that fits next to the flags element.
pub const MAX_MANUFACTURER_DATA_LEN: usize = MAX_ADV_DATA_LEN - FLAGS_AD_LEN - AD_HEADER_LEN;

/// Advertising interval bounds in 0.625 ms units (20 ms .. 10.24 s).
pub const ADV_INTERVAL_MIN_UNITS: u16 = 0x0020;
pub const ADV_INTERVAL_MAX_UNITS: u16 = 0x4000;

// ───────────────────────────────────────────────────────────────
// Encoding helpers
// ───────────────────────────────────────────────────────────────

/// Convert milliseconds to 0.625 ms radio units, clamped to the legal range.
pub fn interval_to_units(interval_ms: u32) -> u16 {
    let units = u64::from(interval_ms) * 1000 / 625;
    units.clamp(
        u64::from(ADV_INTERVAL_MIN_UNITS),
        u64::from(ADV_INTERVAL_MAX_UNITS),
    ) as u16
}

/// Build the raw advertising data for `payload`.
pub fn build_adv_data(payload: &[u8]) -> Result<heapless::Vec<u8, MAX_ADV_DATA_LEN>, DriverError> {
    if payload.len() > MAX_MANUFACTURER_DATA_LEN {
        return Err(DriverError::PayloadTooLong {
            len: payload.len(),
            max: MAX_MANUFACTURER_DATA_LEN,
        });
    }

    let mut data = heapless::Vec::new();
    let too_long = |()| DriverError::PayloadTooLong {
        len: payload.len(),
        max: MAX_MANUFACTURER_DATA_LEN,
    };
    data.extend_from_slice(&[2, AD_TYPE_FLAGS, ADV_FLAGS])
        .map_err(too_long)?;
    data.extend_from_slice(&[(payload.len() + 1) as u8, AD_TYPE_MANUFACTURER_DATA])
        .map_err(too_long)?;
    data.extend_from_slice(payload).map_err(too_long)?;
    Ok(data)
}

// ───────────────────────────────────────────────────────────────
// Advertiser state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiserState {
    /// Stack not brought up by this adapter.
    Off,
    /// Stack up, not advertising.
    Ready,
    Advertising,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_RAW_SET_COMPLETE_EVT => {
            let status = unsafe { (*param).adv_data_raw_cmpl.status };
            if status != esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                log::warn!("BLE GAP: raw adv data set failed (status={})", status);
            }
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            let status = unsafe { (*param).adv_start_cmpl.status };
            if status == esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                log::debug!("BLE GAP: advertising started");
            } else {
                log::warn!("BLE GAP: advertising start failed (status={})", status);
            }
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::debug!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdvertiser {
    state: AdvertiserState,
    adv_data: heapless::Vec<u8, MAX_ADV_DATA_LEN>,
    /// Simulation: advertisement events requested so far.
    #[cfg(not(target_os = "espidf"))]
    sim_events: u64,
}

impl Default for BleAdvertiser {
    fn default() -> Self {
        Self::new()
    }
}

impl BleAdvertiser {
    pub fn new() -> Self {
        Self {
            state: AdvertiserState::Off,
            adv_data: heapless::Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_events: 0,
        }
    }

    pub fn state(&self) -> AdvertiserState {
        self.state
    }

    /// Raw advertising data currently registered with the stack.
    pub fn adv_data(&self) -> &[u8] {
        &self.adv_data
    }

    /// Simulation: number of advertisement events started.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_events(&self) -> u64 {
        self.sim_events
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_register(&mut self) {
        use esp_idf_svc::sys::*;
        // SAFETY: registering a static extern "C" handler.
        let ret = unsafe { esp_ble_gap_register_callback(Some(ble_gap_event_handler)) };
        if ret != ESP_OK as i32 {
            log::warn!("BLE: GAP callback registration failed ({})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_register(&mut self) {
        info!("BLE(sim): GAP callbacks registered");
    }

    #[cfg(target_os = "espidf")]
    fn platform_set_adv_data(&mut self, data: &[u8]) -> Result<(), DriverError> {
        use esp_idf_svc::sys::*;
        let mut raw = [0u8; MAX_ADV_DATA_LEN];
        raw[..data.len()].copy_from_slice(data);
        // SAFETY: the stack copies `raw` before returning.
        let ret = unsafe { esp_ble_gap_config_adv_data_raw(raw.as_mut_ptr(), data.len() as u32) };
        if ret != ESP_OK as i32 {
            return Err(DriverError::AdvDataRejected(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_set_adv_data(&mut self, data: &[u8]) -> Result<(), DriverError> {
        info!("BLE(sim): adv data {:02X?}", data);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self, interval_units: u16) -> Result<(), DriverError> {
        use esp_idf_svc::sys::*;
        // SAFETY: adv_params is fully initialised; peer address unused
        // for undirected advertising.
        let ret = unsafe {
            let mut adv_params = esp_ble_adv_params_t {
                adv_int_min: interval_units,
                adv_int_max: interval_units,
                adv_type: esp_ble_adv_type_t_ADV_TYPE_NONCONN_IND,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
                channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
                adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
                ..core::mem::zeroed()
            };
            esp_ble_gap_start_advertising(&mut adv_params)
        };
        if ret != ESP_OK as i32 {
            return Err(DriverError::StartFailed(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self, interval_units: u16) -> Result<(), DriverError> {
        self.sim_events += 1;
        info!(
            "BLE(sim): advertisement #{} (interval {} units)",
            self.sim_events, interval_units
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) -> Result<(), DriverError> {
        // SAFETY: plain GAP call, no pointers.
        let ret = unsafe { esp_idf_svc::sys::esp_ble_gap_stop_advertising() };
        if ret != esp_idf_svc::sys::ESP_OK as i32 {
            return Err(DriverError::StopFailed(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) -> Result<(), DriverError> {
        info!("BLE(sim): advertising stopped");
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// RadioPort implementation
// ───────────────────────────────────────────────────────────────

impl RadioPort for BleAdvertiser {
    fn initialize(&mut self) -> Result<(), DriverError> {
        if self.state != AdvertiserState::Off {
            return Ok(());
        }
        crate::drivers::hw_init::init_bt_stack()?;
        self.platform_register();
        self.state = AdvertiserState::Ready;
        info!("BLE: stack ready");
        Ok(())
    }

    fn set_payload(&mut self, payload: &[u8]) -> Result<(), DriverError> {
        let data = build_adv_data(payload)?;
        self.platform_set_adv_data(&data)?;
        self.adv_data = data;
        info!("BLE: adv data set ({} bytes)", self.adv_data.len());
        Ok(())
    }

    fn begin_emitting(&mut self, interval_ms: u32) -> Result<(), DriverError> {
        self.platform_start(interval_to_units(interval_ms))?;
        self.state = AdvertiserState::Advertising;
        Ok(())
    }

    fn end_emitting(&mut self) -> Result<(), DriverError> {
        if self.state != AdvertiserState::Advertising {
            return Ok(());
        }
        self.platform_stop()?;
        self.state = AdvertiserState::Ready;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
