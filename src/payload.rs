//! Manufacturer-data payload and its hex-string decoder.
//!
//! The payload is opaque to the broadcaster: it is decoded once from the
//! configured hex string and handed to the radio byte-for-byte. Length
//! limits of the over-the-air format are enforced by the radio adapter;
//! the container here only bounds it by the legacy advertisement size.

use core::fmt;

/// Capacity of the payload container (one legacy advertising PDU).
pub const MAX_PAYLOAD_LEN: usize = 31;

/// Capacity of the hex string that encodes a full-size payload.
pub const MAX_HEX_LEN: usize = MAX_PAYLOAD_LEN * 2;

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Why a hex string could not be turned into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Input has an odd number of characters (carries the length).
    OddLength(usize),
    /// A character outside `0-9a-fA-F` at the given byte offset.
    InvalidDigit { index: usize, byte: u8 },
    /// More bytes than [`MAX_PAYLOAD_LEN`] (carries the decoded length).
    TooLong(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength(len) => write!(f, "hex string has odd length {len}"),
            Self::InvalidDigit { index, byte } => {
                write!(f, "invalid hex digit 0x{byte:02x} at offset {index}")
            }
            Self::TooLong(len) => {
                write!(f, "payload of {len} bytes exceeds {MAX_PAYLOAD_LEN}")
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Payload
// ───────────────────────────────────────────────────────────────

/// Opaque advertisement payload bytes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ManufacturerData(heapless::Vec<u8, MAX_PAYLOAD_LEN>);

impl ManufacturerData {
    pub const fn new() -> Self {
        Self(heapless::Vec::new())
    }

    /// Decode a human-entered hex string, two characters per byte.
    ///
    /// Surrounding whitespace is ignored; an empty string yields an empty
    /// payload.
    pub fn from_hex(input: &str) -> Result<Self, DecodeError> {
        let raw = input.trim().as_bytes();
        if raw.len() % 2 != 0 {
            return Err(DecodeError::OddLength(raw.len()));
        }
        if raw.len() / 2 > MAX_PAYLOAD_LEN {
            return Err(DecodeError::TooLong(raw.len() / 2));
        }

        let mut bytes = heapless::Vec::new();
        for (pair_idx, pair) in raw.chunks_exact(2).enumerate() {
            let index = pair_idx * 2;
            let hi = nibble(pair[0]).ok_or(DecodeError::InvalidDigit { index, byte: pair[0] })?;
            let lo = nibble(pair[1]).ok_or(DecodeError::InvalidDigit {
                index: index + 1,
                byte: pair[1],
            })?;
            // Capacity was checked above.
            let _ = bytes.push((hi << 4) | lo);
        }
        Ok(Self(bytes))
    }

    /// Copy raw bytes into a payload.
    pub fn from_slice(data: &[u8]) -> Result<Self, DecodeError> {
        heapless::Vec::from_slice(data)
            .map(Self)
            .map_err(|()| DecodeError::TooLong(data.len()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for ManufacturerData {
    /// Upper-case hex, the same form the config string uses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ManufacturerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManufacturerData({self})")
    }
}

impl AsRef<[u8]> for ManufacturerData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
