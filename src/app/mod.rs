//! Application core: pure domain logic, zero I/O.
//!
//! The advertising state machine lives in [`broadcaster`]. All interaction
//! with the radio happens through the **port traits** in [`ports`], keeping
//! this layer fully testable without real hardware.

pub mod broadcaster;
pub mod events;
pub mod init_guard;
pub mod ports;
