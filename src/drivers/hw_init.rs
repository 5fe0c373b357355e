//! One-shot Bluetooth stack bring-up.
//!
//! Initialises and enables the BT controller in BLE-only mode, then the
//! Bluedroid host stack, using raw ESP-IDF sys calls. Each step is skipped
//! if the stack reports it already done, so calling twice is harmless.
//! The process-wide "only once" rule lives in
//! [`RadioInitGuard`](crate::app::init_guard::RadioInitGuard).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::error::DriverError;

#[cfg(target_os = "espidf")]
pub fn init_bt_stack() -> Result<(), DriverError> {
    // SAFETY: Called from the main task during setup; the controller and
    // Bluedroid APIs are not used concurrently.
    unsafe {
        init_controller()?;
        init_bluedroid()?;
    }
    info!("hw_init: BT controller + Bluedroid enabled (BLE only)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_bt_stack() -> Result<(), DriverError> {
    info!("hw_init(sim): BT stack init skipped");
    Ok(())
}

// ── Controller ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_controller() -> Result<(), DriverError> {
    let status = unsafe { esp_bt_controller_get_status() };
    if status == esp_bt_controller_status_t_ESP_BT_CONTROLLER_STATUS_IDLE {
        // Release classic BT memory (BLE-only mode saves ~30 KB).
        unsafe { esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT) };

        let mut cfg = esp_bt_controller_config_t::default();
        let ret = unsafe { esp_bt_controller_init(&mut cfg) };
        if ret != ESP_OK as i32 {
            return Err(DriverError::ControllerInit(ret));
        }
    }

    let status = unsafe { esp_bt_controller_get_status() };
    if status != esp_bt_controller_status_t_ESP_BT_CONTROLLER_STATUS_ENABLED {
        let ret = unsafe { esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE) };
        if ret != ESP_OK as i32 {
            return Err(DriverError::ControllerEnable(ret));
        }
    }
    Ok(())
}

// ── Bluedroid host stack ──────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_bluedroid() -> Result<(), DriverError> {
    let status = unsafe { esp_bluedroid_get_status() };
    if status == esp_bluedroid_status_t_ESP_BLUEDROID_STATUS_UNINITIALIZED {
        let ret = unsafe { esp_bluedroid_init() };
        if ret != ESP_OK as i32 {
            return Err(DriverError::StackInit(ret));
        }
    }

    let status = unsafe { esp_bluedroid_get_status() };
    if status != esp_bluedroid_status_t_ESP_BLUEDROID_STATUS_ENABLED {
        let ret = unsafe { esp_bluedroid_enable() };
        if ret != ESP_OK as i32 {
            return Err(DriverError::StackEnable(ret));
        }
    }
    Ok(())
}
