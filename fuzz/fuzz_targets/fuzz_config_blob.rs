//! Fuzz target: stored config blob decoding
//!
//! Treats arbitrary bytes as a postcard-encoded `BroadcastConfig`, the
//! shape NVS hands back after a torn write or flash corruption. Checks:
//! - No panics while decoding or validating
//! - Anything that survives `to_settings` has a legal interval
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use blecast::config::{BroadcastConfig, MAX_INTERVAL_MS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = postcard::from_bytes::<BroadcastConfig>(data) else {
        return;
    };
    if let Ok((settings, _)) = config.to_settings() {
        assert!(settings.interval_ms > 0);
        assert!(settings.interval_ms <= MAX_INTERVAL_MS);
    }
});
