//! Unified error types for the broadcaster firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! firmware entry point handles failures uniformly. All variants are
//! `Copy` and carry no heap data.

use core::fmt;

use crate::payload::DecodeError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The radio stack could not be initialised or enabled.
    HardwareInit(DriverError),
    /// The configured manufacturer-data string is not valid hex.
    ConfigDecode(DecodeError),
    /// A non-fatal radio call failed.
    Driver(DriverError),
    /// A configuration value is out of range.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardwareInit(e) => write!(f, "hardware init: {e}"),
            Self::ConfigDecode(e) => write!(f, "config decode: {e}"),
            Self::Driver(e) => write!(f, "radio: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Radio driver errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`RadioPort`](crate::app::ports::RadioPort)
/// implementation. ESP-IDF return codes are carried verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// `esp_bt_controller_init` failed.
    ControllerInit(i32),
    /// `esp_bt_controller_enable` failed.
    ControllerEnable(i32),
    /// `esp_bluedroid_init` failed.
    StackInit(i32),
    /// `esp_bluedroid_enable` failed.
    StackEnable(i32),
    /// The payload does not fit a legacy advertisement.
    PayloadTooLong { len: usize, max: usize },
    /// Raw advertisement data was rejected by the stack.
    AdvDataRejected(i32),
    /// `esp_ble_gap_start_advertising` failed.
    StartFailed(i32),
    /// `esp_ble_gap_stop_advertising` failed.
    StopFailed(i32),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControllerInit(rc) => write!(f, "BT controller init failed (rc={rc})"),
            Self::ControllerEnable(rc) => write!(f, "BT controller enable failed (rc={rc})"),
            Self::StackInit(rc) => write!(f, "Bluedroid init failed (rc={rc})"),
            Self::StackEnable(rc) => write!(f, "Bluedroid enable failed (rc={rc})"),
            Self::PayloadTooLong { len, max } => {
                write!(f, "payload too long ({len} > {max} bytes)")
            }
            Self::AdvDataRejected(rc) => write!(f, "advertisement data rejected (rc={rc})"),
            Self::StartFailed(rc) => write!(f, "start advertising failed (rc={rc})"),
            Self::StopFailed(rc) => write!(f, "stop advertising failed (rc={rc})"),
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::ConfigDecode(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
