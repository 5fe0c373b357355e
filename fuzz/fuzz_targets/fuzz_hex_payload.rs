//! Fuzz target: `ManufacturerData::from_hex` into `build_adv_data`
//!
//! Feeds arbitrary text through the hex decoder and, when it decodes,
//! through the advertisement builder. Checks:
//! - No panics under any input
//! - A decoded payload is never longer than `MAX_PAYLOAD_LEN`
//! - Built advertisement data never exceeds 31 bytes and always starts
//!   with the flags AD structure
//!
//! cargo fuzz run fuzz_hex_payload

#![no_main]

use blecast::adapters::ble::{MAX_ADV_DATA_LEN, build_adv_data};
use blecast::payload::{MAX_PAYLOAD_LEN, ManufacturerData};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(payload) = ManufacturerData::from_hex(text) else {
        return;
    };
    assert!(payload.len() <= MAX_PAYLOAD_LEN);
    assert_eq!(payload.len() * 2, text.trim().len());

    if let Ok(adv) = build_adv_data(payload.as_bytes()) {
        assert!(adv.len() <= MAX_ADV_DATA_LEN);
        assert_eq!(&adv[..3], &[0x02, 0x01, 0x06]);
        assert_eq!(&adv[5..], payload.as_bytes());
    }
});
