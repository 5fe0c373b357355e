//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `ble`      | RadioPort    | Bluedroid GAP advertising   |
//! | `log_sink` | EventSink    | Serial log output           |
//! | `nvs`      | ConfigPort   | NVS / in-memory store       |
//! | `time`     | (none)       | ESP32 system timer          |

pub mod ble;
pub mod log_sink;
pub mod nvs;
pub mod time;
