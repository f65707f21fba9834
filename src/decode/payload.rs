// src/decode/payload.rs
use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use tracing::trace;

use crate::error::PayloadError;

/// Standard alphabet with required padding. Non-zero bits after the last
/// full byte are tolerated, as the gateway's own tooling tolerates them.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a gateway payload field into its byte values.
///
/// The gateway Base64-encodes an ASCII string of hex digits, so the bytes
/// come out of a double decode: Base64 → ASCII text → one byte per
/// two-character hex pair.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, PayloadError> {
    let raw = PAYLOAD_ENGINE.decode(encoded.trim())?;

    if let Some(offset) = raw.iter().position(|b| !b.is_ascii()) {
        return Err(PayloadError::NonAscii {
            offset,
            byte: raw[offset],
        });
    }
    if raw.len() % 2 != 0 {
        return Err(PayloadError::OddLength(raw.len()));
    }

    let bytes = raw
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| hex_pair(pair).ok_or_else(|| non_hex(i * 2, pair)))
        .collect::<Result<Vec<u8>, _>>()?;

    trace!(ascii_len = raw.len(), bytes = bytes.len(), "payload decoded");
    Ok(bytes)
}

/// Decode a payload field into space-separated, zero-padded lowercase hex
/// tokens, e.g. `"01 02 0a"`.
pub fn payload_to_hex_string(encoded: &str) -> Result<String, PayloadError> {
    let bytes = decode_payload(encoded)?;
    Ok(bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" "))
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    let hi = (pair[0] as char).to_digit(16)?;
    let lo = (pair[1] as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn non_hex(offset: usize, pair: &[u8]) -> PayloadError {
    PayloadError::NonHexPair {
        offset,
        pair: String::from_utf8_lossy(pair).into_owned(),
    }
}
