//! Process-wide "radio already initialised" flag.
//!
//! The Bluetooth controller may be brought up once per boot, no matter how
//! many broadcasters share it. The flag starts clear, is set after the
//! first successful bring-up, and is never cleared again; there is no
//! teardown path. A failed bring-up leaves it clear.
//!
//! Firmware uses the [`BT_RADIO`] static. Tests construct their own guard
//! so that they stay independent of each other.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::DriverError;

/// Guard for the single Bluetooth controller of this chip.
pub static BT_RADIO: RadioInitGuard = RadioInitGuard::new();

/// Set-once flag recording that a radio has been initialised.
///
/// Atomic only so it can live in a `static`; callers are expected to run
/// on the main loop like the broadcaster itself.
#[derive(Debug, Default)]
pub struct RadioInitGuard {
    initialised: AtomicBool,
}

impl RadioInitGuard {
    pub const fn new() -> Self {
        Self {
            initialised: AtomicBool::new(false),
        }
    }

    /// Run `init` unless a previous call already succeeded.
    ///
    /// Returns `Ok(true)` if `init` ran now, `Ok(false)` if it was skipped.
    pub fn ensure<F>(&self, init: F) -> Result<bool, DriverError>
    where
        F: FnOnce() -> Result<(), DriverError>,
    {
        if self.is_initialised() {
            return Ok(false);
        }
        init()?;
        self.initialised.store(true, Ordering::Release);
        Ok(true)
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised.load(Ordering::Acquire)
    }
}
