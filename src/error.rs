use thiserror::Error;

/// Why a payload field could not be turned into hex-byte tokens.
///
/// Never fatal: the caller keeps the raw field and leaves the derived
/// columns empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("decoded payload is not ascii (byte 0x{byte:02x} at offset {offset})")]
    NonAscii { offset: usize, byte: u8 },

    #[error("decoded payload has odd length {0}")]
    OddLength(usize),

    #[error("non-hex pair {pair:?} at offset {offset}")]
    NonHexPair { offset: usize, pair: String },
}

/// Why a processed-table row could not become a map point.
#[derive(Error, Debug, PartialEq)]
pub enum PointError {
    #[error("row has no column {index} ({name})")]
    MissingField { index: usize, name: &'static str },

    #[error("{name} {value:?} is not a number")]
    BadCoordinate { name: &'static str, value: String },
}
